//! Per-agent tick-driven path following.
//!
//! `PathNavigation` owns the live [`Path`], advances it every simulation
//! tick, decides when to recompute, detects stuck and timeout conditions, and
//! hands desired-position intents to the agent's motion controller. The
//! behavioral states are implicit: idle (no path), following, stuck, and
//! recompute-pending (a replan was requested but rate-limited).

use crate::{
    AgentState, Locomotion, MoveIntent, NavDebugFrame, Path, PathFinder,
};
use glam::DVec3;
use std::collections::BTreeSet;
use tracing::{debug, trace};
use voxelnav_core::{BlockPos, PathType, TerrainQuery, TerrainWindow};

/// Ticks between stuck-detection displacement checks.
const STUCK_CHECK_INTERVAL: u64 = 100;

/// Fraction of the ideal travel distance over one stuck window below which
/// the agent counts as stuck.
const MIN_PROGRESS_FRACTION: f64 = 0.25;

/// Minimum ticks between full replans; earlier requests are deferred.
const RECOMPUTE_INTERVAL: u64 = 20;

/// Grace multiplier on the ideal travel time toward one waypoint.
const TIMEOUT_FACTOR: f64 = 4.0;

/// Floor on the per-waypoint timeout budget, in ticks.
const TIMEOUT_MIN_TICKS: f64 = 100.0;

/// Horizontal radius inside which the corner-cut shortcut may skip a waypoint.
const SHORTCUT_RADIUS: f64 = 2.0;

/// Per-agent navigation state machine.
///
/// One instance per navigating agent, created alongside it and kept for the
/// agent's lifetime. At most one path is live at a time; `stop` clears the
/// path without destroying the navigation.
pub struct PathNavigation {
    finder: PathFinder,
    path: Option<Path>,
    speed_modifier: f64,
    requested_speed: f64,
    tick_count: u64,
    target_pos: Option<BlockPos>,
    reach_range: i32,
    max_path_len: f32,
    budget_multiplier: f32,
    has_delayed_recompute: bool,
    last_recompute_tick: Option<u64>,
    stuck: bool,
    last_stuck_check_tick: u64,
    last_stuck_pos: DVec3,
    timeout_cursor: usize,
    ticks_at_node: u64,
    timeout_limit: f64,
    debug_sink: Option<Box<dyn Fn(&NavDebugFrame<'_>)>>,
}

impl PathNavigation {
    /// Default search distance when no override is given.
    pub const DEFAULT_MAX_PATH_LEN: f32 = 48.0;

    /// Create a navigation for one agent with the given locomotion strategy.
    pub fn new(locomotion: Locomotion) -> Self {
        Self::with_finder(PathFinder::new(crate::NodeEvaluator::new(locomotion)))
    }

    /// Create a navigation around a preconfigured searcher.
    pub fn with_finder(finder: PathFinder) -> Self {
        Self {
            finder,
            path: None,
            speed_modifier: 1.0,
            requested_speed: 1.0,
            tick_count: 0,
            target_pos: None,
            reach_range: 0,
            max_path_len: Self::DEFAULT_MAX_PATH_LEN,
            budget_multiplier: 1.0,
            has_delayed_recompute: false,
            last_recompute_tick: None,
            stuck: false,
            last_stuck_check_tick: 0,
            last_stuck_pos: DVec3::ZERO,
            timeout_cursor: usize::MAX,
            ticks_at_node: 0,
            timeout_limit: f64::INFINITY,
            debug_sink: None,
        }
    }

    /// The searcher, for budget or malus tuning.
    pub fn finder_mut(&mut self) -> &mut PathFinder {
        &mut self.finder
    }

    /// The locomotion strategy in effect.
    pub fn locomotion(&self) -> Locomotion {
        *self.finder.evaluator().locomotion()
    }

    /// The live path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Last successfully resolved target cell.
    pub fn target_pos(&self) -> Option<BlockPos> {
        self.target_pos
    }

    /// Whether following was aborted because the agent stopped progressing.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Whether no unfinished path is live.
    pub fn is_done(&self) -> bool {
        self.path.as_ref().map_or(true, |p| p.is_done())
    }

    /// Whether a path is live and being followed.
    pub fn is_in_progress(&self) -> bool {
        !self.is_done()
    }

    /// Scale the node-visit budget (e.g. halved during combat to bound CPU).
    pub fn set_budget_multiplier(&mut self, multiplier: f32) {
        self.budget_multiplier = multiplier.max(0.0);
    }

    /// Override the maximum path length used to size searches and windows.
    pub fn set_max_path_len(&mut self, max_path_len: f32) {
        self.max_path_len = max_path_len.max(1.0);
    }

    /// Change the follow speed of the live path.
    pub fn set_speed_modifier(&mut self, speed: f64) {
        self.speed_modifier = speed;
    }

    /// Attach a fire-and-forget telemetry sink.
    pub fn set_debug_sink(&mut self, sink: Box<dyn Fn(&NavDebugFrame<'_>)>) {
        self.debug_sink = Some(sink);
    }

    /// Request movement toward a single target cell.
    pub fn move_to_pos(
        &mut self,
        target: BlockPos,
        speed: f64,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> bool {
        self.move_to(&BTreeSet::from([target]), 0, speed, agent, terrain)
    }

    /// Request movement toward any of `targets`, reaching within
    /// `reach_range` blocks.
    ///
    /// If the live path is unfinished and its target is still in the
    /// requested set, it is reused unchanged rather than replaced.
    pub fn move_to(
        &mut self,
        targets: &BTreeSet<BlockPos>,
        reach_range: i32,
        speed: f64,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> bool {
        self.requested_speed = speed;
        if self.reusable_for(targets) {
            self.speed_modifier = speed;
            trace!("reusing live path for repeated request");
            return true;
        }
        match self.compute_path(targets, reach_range, agent, terrain) {
            Some(path) => self.start_path(path, speed, agent, terrain),
            None => false,
        }
    }

    /// Run the search without installing the result.
    ///
    /// Rejects empty target sets, out-of-world agents, and locomotion states
    /// that forbid pathing right now; failures are `None`, never errors.
    /// When the live path is unfinished and still aimed at one of `targets`,
    /// a copy of it is handed back instead of running a new search;
    /// [`recompute_path`](Self::recompute_path) always searches fresh.
    pub fn create_path(
        &mut self,
        targets: &BTreeSet<BlockPos>,
        reach_range: i32,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Option<Path> {
        if self.reusable_for(targets) {
            return self.path.clone();
        }
        self.compute_path(targets, reach_range, agent, terrain)
    }

    fn reusable_for(&self, targets: &BTreeSet<BlockPos>) -> bool {
        match (self.target_pos, self.path.as_ref()) {
            (Some(current), Some(path)) => !path.is_done() && targets.contains(&current),
            _ => false,
        }
    }

    fn compute_path(
        &mut self,
        targets: &BTreeSet<BlockPos>,
        reach_range: i32,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Option<Path> {
        if targets.is_empty() {
            return None;
        }
        let (world_min, _) = terrain.bounds();
        if agent.pos.y < world_min.y as f64 {
            return None;
        }
        if !self.locomotion().can_update_path(agent) {
            return None;
        }
        let radius = self.max_path_len.ceil() as i32 + reach_range;
        let window = TerrainWindow::new(terrain, agent.feet_block(), radius).ok()?;
        let path = self.finder.find_path(
            &window,
            agent,
            targets,
            self.max_path_len,
            reach_range,
            self.budget_multiplier,
        )?;
        self.target_pos = Some(path.target());
        self.reach_range = reach_range;
        Some(path)
    }

    /// Install a path and begin following it at `speed`.
    ///
    /// Leading nodes sitting in basin blocks are raised onto the rim before
    /// following starts.
    pub fn start_path(
        &mut self,
        mut path: Path,
        speed: f64,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> bool {
        if path.node_count() == 0 {
            return false;
        }
        raise_basin_nodes(&mut path);
        self.path = Some(path);
        self.speed_modifier = speed;
        self.stuck = false;
        self.reset_progress_bookkeeping(agent, terrain);
        true
    }

    /// Drop the live path. The navigation itself stays usable.
    pub fn stop(&mut self) {
        self.path = None;
        self.has_delayed_recompute = false;
    }

    /// Replan toward the last resolved target.
    ///
    /// Rate-limited: requests arriving within the replan interval set a
    /// delayed-recompute flag consumed on a later tick instead.
    pub fn recompute_path(&mut self, agent: &AgentState, terrain: &impl TerrainQuery) {
        let Some(target) = self.target_pos else {
            return;
        };
        if let Some(last) = self.last_recompute_tick {
            if self.tick_count.saturating_sub(last) < RECOMPUTE_INTERVAL {
                self.has_delayed_recompute = true;
                return;
            }
        }
        self.last_recompute_tick = Some(self.tick_count);
        self.has_delayed_recompute = false;
        let targets = BTreeSet::from([target]);
        let reach = self.reach_range;
        if let Some(path) = self.compute_path(&targets, reach, agent, terrain) {
            let same = self.path.as_ref().is_some_and(|p| p.same_as(&path));
            if !same {
                let speed = self.requested_speed;
                self.start_path(path, speed, agent, terrain);
            }
        }
    }

    /// Drive the navigation one simulation tick.
    ///
    /// Returns the desired-position intent for the agent's motion controller,
    /// or `None` while idle.
    pub fn tick(
        &mut self,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Option<MoveIntent> {
        self.tick_count += 1;
        if self.has_delayed_recompute {
            self.recompute_path(agent, terrain);
        }
        let locomotion = self.locomotion();
        if !self.is_done() {
            if locomotion.can_update_path(agent) {
                self.follow_the_path(agent, terrain);
            } else if let Some(path) = self.path.as_mut() {
                // Degraded fallback when the mode cannot properly follow this
                // tick (e.g. a walker mid-air): keep coasting at the next
                // waypoint and count it reached when close.
                if let Some(waypoint) = path.next_entity_pos(agent) {
                    if agent.pos.distance_squared(waypoint) < 1.0 {
                        path.advance();
                    }
                }
            }
        }
        self.emit_debug(agent);

        let path = self.path.as_ref()?;
        if path.is_done() {
            return None;
        }
        let waypoint = path.next_entity_pos(agent)?;
        let y = locomotion.ground_y(waypoint, terrain);
        Some(MoveIntent::new(
            DVec3::new(waypoint.x, y, waypoint.z),
            self.speed_modifier,
        ))
    }

    /// Waypoint-advance logic: tolerance advance plus corner cutting.
    fn follow_the_path(&mut self, agent: &AgentState, terrain: &impl TerrainQuery) {
        let locomotion = self.locomotion();
        let tolerance = waypoint_tolerance(agent);
        if let Some(path) = self.path.as_mut() {
            if path.is_done() {
                return;
            }
            // Corner cutting: when the waypoint after next is close and the
            // straight line to it is clear, skip the intermediate one.
            let lookahead = path.next_node_index() + 1;
            if lookahead < path.node_count() {
                let ahead = path.node(lookahead).pos.bottom_center();
                let horizontal_sq = (ahead.x - agent.pos.x).powi(2) + (ahead.z - agent.pos.z).powi(2);
                if horizontal_sq < SHORTCUT_RADIUS * SHORTCUT_RADIUS
                    && locomotion.can_move_directly(agent.pos, ahead, agent, terrain)
                {
                    path.advance();
                }
            }
            if let Some(waypoint) = path.next_entity_pos(agent) {
                if (waypoint.x - agent.pos.x).abs() < tolerance
                    && (waypoint.z - agent.pos.z).abs() < tolerance
                    && (agent.pos.y - waypoint.y).abs() < 1.0
                {
                    path.advance();
                }
            }
        }
        self.check_timeout(agent);
        self.do_stuck_detection(agent, terrain);
    }

    /// Abort when the agent barely moved over a full detection window.
    fn do_stuck_detection(&mut self, agent: &AgentState, terrain: &impl TerrainQuery) {
        if self.tick_count.saturating_sub(self.last_stuck_check_tick) < STUCK_CHECK_INTERVAL {
            return;
        }
        let pos = self.locomotion().progress_pos(agent, terrain);
        let moved_sq = pos.distance_squared(self.last_stuck_pos);
        let ideal = agent.speed * self.speed_modifier * STUCK_CHECK_INTERVAL as f64;
        let min_sq = (ideal * MIN_PROGRESS_FRACTION).powi(2);
        if moved_sq < min_sq {
            debug!(
                moved = moved_sq.sqrt(),
                expected = ideal,
                "agent made no meaningful progress, aborting path"
            );
            self.stuck = true;
            self.stop();
        }
        self.last_stuck_check_tick = self.tick_count;
        self.last_stuck_pos = pos;
    }

    /// Abort when a single waypoint stays "next" far beyond its ideal travel
    /// time at the configured speed.
    fn check_timeout(&mut self, agent: &AgentState) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let cursor = path.next_node_index();
        if cursor != self.timeout_cursor {
            self.timeout_cursor = cursor;
            self.ticks_at_node = 0;
            let distance = path
                .next_node_pos()
                .map(|p| p.distance(agent.feet_block()))
                .unwrap_or(1.0);
            let speed = (agent.speed * self.speed_modifier).max(1e-4);
            self.timeout_limit = (distance / speed * TIMEOUT_FACTOR).max(TIMEOUT_MIN_TICKS);
            return;
        }
        self.ticks_at_node += 1;
        if self.ticks_at_node as f64 > self.timeout_limit {
            debug!(cursor, limit = self.timeout_limit, "waypoint timeout, aborting path");
            self.stuck = true;
            self.stop();
        }
    }

    fn reset_progress_bookkeeping(&mut self, agent: &AgentState, terrain: &impl TerrainQuery) {
        self.last_stuck_check_tick = self.tick_count;
        self.last_stuck_pos = self.locomotion().progress_pos(agent, terrain);
        self.timeout_cursor = usize::MAX;
        self.ticks_at_node = 0;
        self.timeout_limit = f64::INFINITY;
    }

    fn emit_debug(&self, agent: &AgentState) {
        if let Some(sink) = &self.debug_sink {
            let frame = NavDebugFrame {
                tick: self.tick_count,
                path: self.path.as_ref(),
                tolerance: waypoint_tolerance(agent),
            };
            sink(&frame);
        }
    }
}

/// Per-agent waypoint tolerance derived from bounding-box width.
fn waypoint_tolerance(agent: &AgentState) -> f64 {
    if agent.width > 0.75 {
        agent.width / 2.0
    } else {
        0.75 - agent.width / 2.0
    }
}

/// Raise nodes sitting in basin blocks onto the rim; when the following node
/// is at or below the basin, raise it to match so the step stays monotonic.
fn raise_basin_nodes(path: &mut Path) {
    for i in 0..path.node_count() {
        let node = *path.node(i);
        if node.path_type != PathType::StickyBasin {
            continue;
        }
        path.replace_node(i, node.cloned_move_to(node.pos.above()));
        if i + 1 < path.node_count() {
            let next = *path.node(i + 1);
            if next.pos.y <= node.pos.y {
                let lifted =
                    BlockPos::new(next.pos.x, node.pos.y + 1, next.pos.z);
                path.replace_node(i + 1, next.cloned_move_to(lifted));
            }
        }
    }
}
