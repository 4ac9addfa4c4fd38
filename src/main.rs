//! voxelnav - deterministic voxel navigation demo runner
//!
//! Headless binary that builds a small arena, plans a path, and steps the
//! navigation tick loop with a kinematic stand-in for a motion controller.

mod config;

use anyhow::Result;
use config::NavDemoConfig;
use glam::DVec3;
use std::{env, path::PathBuf};
use tracing::{info, warn};
use voxelnav_core::BlockPos;
use voxelnav_nav::{AgentState, Locomotion, PathNavigation};
use voxelnav_world::{scatter_obstacles, BlockKind, VoxelWorld};

fn main() -> Result<()> {
    // WARN by default, overridable via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting voxelnav v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let cfg = match &cli.config_path {
        Some(path) => NavDemoConfig::load_from_path(path),
        None => NavDemoConfig::load(),
    };

    let world = build_world(&cli.scenario, &cfg, cli.seed)?;
    let target = cli
        .target
        .map(|(x, y, z)| BlockPos::new(x, y, z))
        .unwrap_or(BlockPos::new(10, 0, 10));

    let mut agent = AgentState {
        pos: DVec3::new(0.5, 0.0, 0.5),
        width: cfg.agent_width,
        height: cfg.agent_height,
        speed: cfg.agent_speed,
        on_ground: true,
        in_water: false,
        mounted: false,
    };

    let mut nav = PathNavigation::new(Locomotion::ground());
    nav.set_max_path_len(cfg.max_path_len);
    if !nav.move_to_pos(target, 1.0, &agent, &world) {
        anyhow::bail!("no path from {} to {target}", agent.feet_block());
    }
    info!(
        nodes = nav.path().map(|p| p.node_count()).unwrap_or(0),
        %target,
        scenario = %cli.scenario,
        "path planned"
    );

    let max_ticks = cli.max_ticks.unwrap_or(cfg.max_ticks);
    let mut ticks_used = max_ticks;
    for tick in 0..max_ticks {
        match nav.tick(&agent, &world) {
            Some(intent) => {
                let to = intent.target_vec() - agent.pos;
                agent.pos += to.clamp_length_max(cfg.agent_speed * intent.speed);
            }
            None => {
                if nav.is_done() {
                    ticks_used = tick;
                    break;
                }
            }
        }
        if nav.is_stuck() {
            warn!(tick, pos = ?agent.pos, "agent got stuck, aborting run");
            break;
        }
    }

    let arrived = nav.is_done() && !nav.is_stuck();
    info!(
        arrived,
        ticks_used,
        final_pos = ?agent.pos,
        "demo finished"
    );
    if !arrived {
        anyhow::bail!("agent did not arrive within {max_ticks} ticks");
    }
    Ok(())
}

fn build_world(scenario: &str, cfg: &NavDemoConfig, seed: u64) -> Result<VoxelWorld> {
    let half = cfg.world_half_extent;
    let mut world = VoxelWorld::flat(half, 0);
    match scenario {
        "flat" => {}
        "scatter" => scatter_obstacles(&mut world, seed, cfg.obstacle_density),
        "basin" => world.set(BlockPos::new(3, 0, 0), BlockKind::Cauldron),
        "corridor" => {
            for side in [-2, 2] {
                world.fill(
                    BlockPos::new(0, 0, side),
                    BlockPos::new(10, 2, side),
                    BlockKind::Stone,
                );
            }
        }
        other => anyhow::bail!("unknown scenario '{other}' (flat|scatter|basin|corridor)"),
    }
    Ok(world)
}

struct CliOptions {
    scenario: String,
    seed: u64,
    target: Option<(i32, i32, i32)>,
    max_ticks: Option<u64>,
    config_path: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            scenario: "flat".to_string(),
            seed: 0,
            target: None,
            max_ticks: None,
            config_path: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scenario" => {
                    if let Some(value) = args.next() {
                        opts.scenario = value;
                    }
                }
                "--seed" => {
                    if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                        opts.seed = value;
                    }
                }
                "--target" => {
                    if let Some(value) = args.next() {
                        match parse_target(&value) {
                            Some(triple) => opts.target = Some(triple),
                            None => warn!("--target expects X,Y,Z (got '{value}')"),
                        }
                    }
                }
                "--max-ticks" => {
                    opts.max_ticks = args.next().and_then(|v| v.parse().ok());
                }
                "--config" => {
                    opts.config_path = args.next().map(PathBuf::from);
                }
                other => warn!("Ignoring unknown argument '{other}'"),
            }
        }
        opts
    }
}

fn parse_target(value: &str) -> Option<(i32, i32, i32)> {
    let mut parts = value.split(',').map(|p| p.trim().parse::<i32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y, z))
}
