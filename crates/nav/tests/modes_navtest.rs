//! Modes navtest - swimming and flying agents follow routes their own way.

use glam::DVec3;
use voxelnav_core::BlockPos;
use voxelnav_nav::{AgentState, Locomotion, PathNavigation};
use voxelnav_testkit::{flat_plane, water_channel};

#[test]
fn swimmer_crosses_the_water_channel() {
    let world = water_channel();
    let mut agent = AgentState {
        pos: DVec3::new(0.5, -2.0, 0.5),
        width: 0.6,
        height: 0.6,
        speed: 0.2,
        on_ground: false,
        in_water: true,
        mounted: false,
    };
    let mut nav = PathNavigation::new(Locomotion::swimming());

    assert!(nav.move_to_pos(BlockPos::new(7, -2, 0), 1.0, &agent, &world));
    // Every waypoint stays submerged.
    for node in nav.path().unwrap().nodes() {
        assert!(
            node.pos.x >= 0 && node.pos.x <= 8 && node.pos.y <= 0 && node.pos.z.abs() <= 1,
            "swimmer waypoint left the trench: {}",
            node.pos
        );
    }

    for _ in 0..400 {
        let Some(intent) = nav.tick(&agent, &world) else {
            break;
        };
        let to = intent.target_vec() - agent.pos;
        agent.pos += to.clamp_length_max(agent.speed * intent.speed);
    }
    assert!(nav.is_done());
    assert!(!nav.is_stuck());
    assert!((agent.pos.x - 7.5).abs() < 1.0);
}

#[test]
fn flyer_climbs_to_an_airborne_target() {
    let world = flat_plane(12);
    let mut agent = AgentState {
        pos: DVec3::new(0.5, 0.0, 0.5),
        width: 0.6,
        height: 0.6,
        speed: 0.3,
        on_ground: false,
        in_water: false,
        mounted: false,
    };
    let mut nav = PathNavigation::new(Locomotion::flying());
    // Volume searches expand wide equal-cost plateaus; give them headroom.
    nav.finder_mut().set_max_visited_nodes(8192);

    let target = BlockPos::new(5, 6, 5);
    assert!(nav.move_to_pos(target, 1.0, &agent, &world));
    assert_eq!(nav.path().unwrap().end_node().unwrap().pos, target);

    for _ in 0..400 {
        let Some(intent) = nav.tick(&agent, &world) else {
            break;
        };
        let to = intent.target_vec() - agent.pos;
        agent.pos += to.clamp_length_max(agent.speed * intent.speed);
    }
    assert!(nav.is_done());
    assert!(!nav.is_stuck());
    assert!((agent.pos.y - 6.0).abs() < 1.5, "flyer ends near target height");
}
