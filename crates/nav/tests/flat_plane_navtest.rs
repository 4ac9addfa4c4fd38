//! FlatPlane navtest - a ground walker crosses an open plane end to end.
//!
//! Drives the full loop: plan, tick, apply intents kinematically, arrive.

use glam::DVec3;
use voxelnav_core::{BlockPos, SimTick};
use voxelnav_nav::{AgentState, Locomotion, PathNavigation};
use voxelnav_testkit::{flat_plane, EventRecord, JsonlSink};

const TARGET: BlockPos = BlockPos::new(12, 0, 9);
const MAX_TICKS: u64 = 600;

fn walker() -> AgentState {
    AgentState {
        pos: DVec3::new(0.5, 0.0, 0.5),
        width: 0.6,
        height: 1.8,
        speed: 0.25,
        on_ground: true,
        in_water: false,
        mounted: false,
    }
}

#[test]
fn flat_plane_navtest() {
    let output_path = std::env::temp_dir().join("flat_plane_navtest.jsonl");
    let mut event_log = JsonlSink::create(&output_path).expect("can create event log");

    let world = flat_plane(24);
    let mut agent = walker();
    let mut nav = PathNavigation::new(Locomotion::ground());

    assert!(nav.move_to_pos(TARGET, 1.0, &agent, &world));
    let path = nav.path().expect("path installed");
    assert!(path.reached_target(), "open plane must be fully reachable");
    assert_eq!(path.end_node().unwrap().pos, TARGET);

    event_log
        .write(&EventRecord {
            tick: SimTick::ZERO,
            kind: "PathPlanned",
            payload: "flat plane walk started",
        })
        .expect("can write event");

    let mut arrived_at = None;
    for tick in 0..MAX_TICKS {
        match nav.tick(&agent, &world) {
            Some(intent) => {
                let to = intent.target_vec() - agent.pos;
                agent.pos += to.clamp_length_max(agent.speed * intent.speed);
            }
            None => {
                if nav.is_done() {
                    arrived_at = Some(tick);
                    break;
                }
            }
        }
        assert!(!nav.is_stuck(), "walker must not be flagged stuck in the open");
    }

    let arrived_at = arrived_at.expect("agent arrives within the tick budget");
    event_log
        .write(&EventRecord {
            tick: SimTick(arrived_at),
            kind: "Arrived",
            payload: "flat plane walk finished",
        })
        .expect("can write event");

    let end = TARGET.bottom_center();
    assert!(
        (agent.pos.x - end.x).abs() < 1.0 && (agent.pos.z - end.z).abs() < 1.0,
        "agent stops within one block of the target, got {:?}",
        agent.pos
    );
}
