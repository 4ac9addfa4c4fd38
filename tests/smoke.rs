use glam::DVec3;
use voxelnav_core::{BlockPos, SimTick};
use voxelnav_nav::{AgentState, Locomotion, PathNavigation};
use voxelnav_testkit::{flat_plane, EventRecord, JsonlSink};

#[test]
fn deterministic_event_stream_can_be_written() {
    let mut sink = JsonlSink::create(std::env::temp_dir().join("navlog.jsonl"))
        .expect("can create temp log");
    let tick = SimTick::ZERO.advance(1);
    let record = EventRecord {
        tick,
        kind: "SmokeTest",
        payload: "ok",
    };
    sink.write(&record).expect("can write event");
}

#[test]
fn plan_and_follow_one_short_walk() {
    let world = flat_plane(12);
    let mut agent = AgentState {
        pos: DVec3::new(0.5, 0.0, 0.5),
        width: 0.6,
        height: 1.8,
        speed: 0.25,
        on_ground: true,
        in_water: false,
        mounted: false,
    };
    let mut nav = PathNavigation::new(Locomotion::ground());
    assert!(nav.move_to_pos(BlockPos::new(4, 0, 3), 1.0, &agent, &world));
    for _ in 0..200 {
        let Some(intent) = nav.tick(&agent, &world) else {
            break;
        };
        let to = intent.target_vec() - agent.pos;
        agent.pos += to.clamp_length_max(agent.speed * intent.speed);
    }
    assert!(nav.is_done());
    assert!(!nav.is_stuck());
}
