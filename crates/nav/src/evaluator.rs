//! Locomotion-specific node evaluation: start/goal mapping and neighbor
//! expansion with per-agent costs baked in.

use crate::locomotion::has_adjacent_face;
use crate::{AgentState, Locomotion, MobilityFlags, MobilityMode, Node};
use std::collections::BTreeMap;
use voxelnav_core::{BlockPos, PathType, TerrainQuery, MALUS_IMPASSABLE};

/// Cardinal XZ offsets in fixed expansion order.
const CARDINALS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal XZ offsets, each paired with the indices of the two cardinal
/// steps that must also be passable (corner-clipping rule).
const DIAGONALS: [((i32, i32), (usize, usize)); 4] = [
    ((-1, -1), (0, 2)),
    ((-1, 1), (0, 3)),
    ((1, -1), (1, 2)),
    ((1, 1), (1, 3)),
];

/// How far a ground start position may scan upward out of solid terrain.
const START_UNSTICK_RANGE: i32 = 4;

/// Enumerates reachable neighbor cells for one agent's locomotion strategy.
///
/// Door handling, water avoidance, and similar capability rules are folded
/// into the malus table at construction so the expansion code only has to ask
/// one question: is this cell's malus non-negative?
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    locomotion: Locomotion,
    malus: BTreeMap<PathType, f32>,
}

impl NodeEvaluator {
    /// Build an evaluator for the given locomotion strategy.
    pub fn new(locomotion: Locomotion) -> Self {
        let mut malus = BTreeMap::new();
        if locomotion.mode == MobilityMode::Swimming {
            malus.insert(PathType::Water, 0.0);
            malus.insert(PathType::Open, MALUS_IMPASSABLE);
            malus.insert(PathType::Walkable, MALUS_IMPASSABLE);
        }
        if locomotion.flags.contains(MobilityFlags::AVOIDS_WATER) {
            malus.insert(PathType::Water, MALUS_IMPASSABLE);
        }
        if locomotion.flags.contains(MobilityFlags::AVOIDS_FIRE) {
            malus.insert(PathType::DangerFire, MALUS_IMPASSABLE);
        }
        if locomotion.flags.contains(MobilityFlags::CAN_OPEN_DOORS) {
            malus.insert(PathType::DoorWoodClosed, 0.0);
        }
        if !locomotion
            .flags
            .intersects(MobilityFlags::CAN_PASS_DOORS | MobilityFlags::CAN_OPEN_DOORS)
        {
            malus.insert(PathType::DoorOpen, MALUS_IMPASSABLE);
        }
        Self { locomotion, malus }
    }

    /// The locomotion strategy this evaluator encodes.
    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    /// Override the malus for one terrain classification.
    pub fn set_malus(&mut self, path_type: PathType, malus: f32) {
        self.malus.insert(path_type, malus);
    }

    /// Agent-specific malus for a terrain classification.
    ///
    /// A negative value forbids the terrain regardless of geometry.
    pub fn cost_malus(&self, path_type: PathType) -> f32 {
        self.malus
            .get(&path_type)
            .copied()
            .unwrap_or_else(|| path_type.default_malus())
    }

    fn make_node(&self, pos: BlockPos, terrain: &impl TerrainQuery) -> Node {
        let path_type = terrain.classify(pos);
        Node::new(pos, path_type, self.cost_malus(path_type))
    }

    fn passable(&self, pos: BlockPos, terrain: &impl TerrainQuery) -> bool {
        self.cost_malus(terrain.classify(pos)) >= 0.0
    }

    /// Whether the cells above `pos` leave room for the agent's height.
    fn headroom(&self, pos: BlockPos, agent: &AgentState, terrain: &impl TerrainQuery) -> bool {
        let cells = height_cells(agent);
        (1..cells).all(|dy| !terrain.is_solid(pos.offset(0, dy, 0)))
    }

    /// Node for the agent's current feet position.
    ///
    /// Returns `None` when no valid start exists (agent below the world floor
    /// or buried beyond recovery), which the pathfinder surfaces as "no path".
    pub fn start_node(&self, agent: &AgentState, terrain: &impl TerrainQuery) -> Option<Node> {
        let feet = agent.feet_block();
        let (world_min, _) = terrain.bounds();
        if feet.y < world_min.y {
            return None;
        }
        match self.locomotion.mode {
            MobilityMode::Ground | MobilityMode::WallClimbing => {
                let mut pos = feet;
                // Unstick from solids (partial embedding after knockback).
                let mut lift = 0;
                while terrain.is_solid(pos) {
                    if lift >= START_UNSTICK_RANGE {
                        return None;
                    }
                    pos = pos.above();
                    lift += 1;
                }
                // Snap down to the surface when starting mid-air.
                while terrain.classify(pos) == PathType::Open && pos.y > world_min.y {
                    pos = pos.below();
                }
                Some(self.make_node(pos, terrain))
            }
            MobilityMode::Swimming => [feet, feet.above(), feet.below()]
                .into_iter()
                .find(|&pos| terrain.classify(pos) == PathType::Water)
                .map(|pos| self.make_node(pos, terrain)),
            MobilityMode::Flying => {
                let mut pos = feet;
                let mut lift = 0;
                while terrain.is_solid(pos) {
                    if lift >= START_UNSTICK_RANGE {
                        return None;
                    }
                    pos = pos.above();
                    lift += 1;
                }
                Some(self.make_node(pos, terrain))
            }
        }
    }

    /// Locomotion-specific discretization of a requested target cell.
    ///
    /// Targets buried in solids lift out a bounded distance, and ground-agent
    /// targets hanging in the open snap down to the surface beneath them. A
    /// cell the locomotion mode has no footing at resolves to `None`, so the
    /// search never spends its budget chasing an unusable goal.
    pub fn goal_node(&self, target: BlockPos, terrain: &impl TerrainQuery) -> Option<Node> {
        let mut pos = target;
        let mut lift = 0;
        while terrain.is_solid(pos) {
            if lift >= START_UNSTICK_RANGE {
                return None;
            }
            pos = pos.above();
            lift += 1;
        }
        if let MobilityMode::Ground | MobilityMode::WallClimbing = self.locomotion.mode {
            let (world_min, _) = terrain.bounds();
            while terrain.classify(pos) == PathType::Open && pos.y > world_min.y {
                pos = pos.below();
            }
        }
        if !self.locomotion.is_stable_destination(pos, terrain) {
            return None;
        }
        Some(self.make_node(pos, terrain))
    }

    /// Reachable neighbors of `node`, costs baked in, impassables filtered.
    ///
    /// Expansion order is fixed so the same inputs always produce the same
    /// candidate sequence.
    pub fn neighbors(
        &self,
        node: &Node,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Vec<Node> {
        match self.locomotion.mode {
            MobilityMode::Ground => self.ground_neighbors(node, agent, terrain),
            MobilityMode::WallClimbing => {
                let mut out = self.ground_neighbors(node, agent, terrain);
                self.push_climb_neighbors(node, agent, terrain, &mut out);
                out
            }
            MobilityMode::Flying | MobilityMode::Swimming => {
                self.volume_neighbors(node, agent, terrain)
            }
        }
    }

    fn ground_neighbors(
        &self,
        node: &Node,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Vec<Node> {
        let mut out = Vec::with_capacity(8);
        let mut cardinal_ok = [false; 4];
        for (i, &(dx, dz)) in CARDINALS.iter().enumerate() {
            if let Some(neighbor) = self.ground_step(node.pos, dx, dz, agent, terrain) {
                cardinal_ok[i] = true;
                out.push(neighbor);
            }
        }
        for &((dx, dz), (a, b)) in &DIAGONALS {
            if cardinal_ok[a] && cardinal_ok[b] {
                if let Some(neighbor) = self.ground_step(node.pos, dx, dz, agent, terrain) {
                    out.push(neighbor);
                }
            }
        }
        out
    }

    /// One horizontal ground move: same level, one-block step-up, or a
    /// bounded fall.
    fn ground_step(
        &self,
        from: BlockPos,
        dx: i32,
        dz: i32,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Option<Node> {
        let target = from.offset(dx, 0, dz);
        if let Some(node) = self.standing_node(target, agent, terrain) {
            return Some(node);
        }
        // Step up one block, provided there is headroom above the current cell.
        if terrain.is_solid(target) && self.headroom(from.above(), agent, terrain) {
            let up = target.above();
            if !terrain.is_solid(up) && self.headroom(up, agent, terrain) {
                let node = self.make_node(up, terrain);
                if node.cost_malus >= 0.0 && node.path_type != PathType::Open {
                    return Some(node);
                }
            }
        }
        None
    }

    /// Resolve a candidate cell into a standable node, falling up to
    /// `max_fall` blocks when the cell hangs in the open.
    fn standing_node(
        &self,
        target: BlockPos,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Option<Node> {
        let path_type = terrain.classify(target);
        if self.cost_malus(path_type) < 0.0 || !self.headroom(target, agent, terrain) {
            return None;
        }
        if path_type != PathType::Open {
            return Some(self.make_node(target, terrain));
        }
        // Open cell with nothing underneath: drop edge.
        let mut drop = target;
        for _ in 0..self.locomotion.max_fall {
            drop = drop.below();
            let below_type = terrain.classify(drop);
            if below_type == PathType::Open {
                continue;
            }
            if self.cost_malus(below_type) >= 0.0 {
                return Some(self.make_node(drop, terrain));
            }
            return None;
        }
        None
    }

    /// Full 3-D shell used by flyers and swimmers. Offsets iterate in a fixed
    /// nested order (x, then y, then z).
    fn volume_neighbors(
        &self,
        node: &Node,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
    ) -> Vec<Node> {
        let mut out = Vec::with_capacity(26);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let pos = node.pos.offset(dx, dy, dz);
                    if terrain.is_solid(pos) || !self.passable(pos, terrain) {
                        continue;
                    }
                    if !self.headroom(pos, agent, terrain) {
                        continue;
                    }
                    out.push(self.make_node(pos, terrain));
                }
            }
        }
        out
    }

    /// Vertical moves along solid faces for wall climbers.
    fn push_climb_neighbors(
        &self,
        node: &Node,
        agent: &AgentState,
        terrain: &impl TerrainQuery,
        out: &mut Vec<Node>,
    ) {
        for pos in [node.pos.above(), node.pos.below()] {
            if terrain.is_solid(pos) || !self.passable(pos, terrain) {
                continue;
            }
            if !self.headroom(pos, agent, terrain) {
                continue;
            }
            if has_adjacent_face(pos, terrain) && !out.iter().any(|n| n.pos == pos) {
                out.push(self.make_node(pos, terrain));
            }
        }
    }
}

fn height_cells(agent: &AgentState) -> i32 {
    agent.height.ceil().max(1.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use voxelnav_core::TerrainWindow;
    use voxelnav_world::{BlockKind, VoxelWorld};

    fn walker_agent(pos: DVec3) -> AgentState {
        AgentState {
            pos,
            width: 0.6,
            height: 1.8,
            speed: 0.25,
            on_ground: true,
            in_water: false,
            mounted: false,
        }
    }

    #[test]
    fn ground_start_snaps_to_the_surface() {
        let world = VoxelWorld::flat(16, 0);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 5.0, 0.5));
        let start = evaluator.start_node(&agent, &world).unwrap();
        assert_eq!(start.pos, BlockPos::new(0, 0, 0));
        assert_eq!(start.path_type, PathType::Walkable);
    }

    #[test]
    fn below_world_agents_have_no_start() {
        let world = VoxelWorld::flat(16, 0);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, -10.0, 0.5));
        assert!(evaluator.start_node(&agent, &world).is_none());
    }

    #[test]
    fn flat_ground_has_eight_neighbors() {
        let world = VoxelWorld::flat(16, 0);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert_eq!(neighbors.len(), 8);
        // Cardinals come first, in the documented order.
        assert_eq!(neighbors[0].pos, BlockPos::new(-1, 0, 0));
        assert_eq!(neighbors[1].pos, BlockPos::new(1, 0, 0));
    }

    #[test]
    fn one_block_step_up_is_reachable() {
        let mut world = VoxelWorld::flat(16, 0);
        world.set(BlockPos::new(1, 0, 0), BlockKind::Stone);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert!(neighbors.iter().any(|n| n.pos == BlockPos::new(1, 1, 0)));
    }

    #[test]
    fn two_block_wall_is_not_reachable() {
        let mut world = VoxelWorld::flat(16, 0);
        world.set(BlockPos::new(1, 0, 0), BlockKind::Stone);
        world.set(BlockPos::new(1, 1, 0), BlockKind::Stone);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert!(neighbors.iter().all(|n| n.pos.x != 1 || n.pos.z != 0));
    }

    #[test]
    fn falls_are_bounded_by_max_fall() {
        // Floor at y=0 next to a pit 5 deep at x=1.
        let mut world = VoxelWorld::new(
            BlockPos::new(-16, -8, -16),
            BlockPos::new(16, 32, 16),
            0,
        );
        for y in -5..0 {
            world.set(BlockPos::new(1, y, 0), BlockKind::Air);
        }
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert!(
            neighbors.iter().all(|n| n.pos != BlockPos::new(1, -5, 0)),
            "a 5-block drop exceeds max_fall"
        );
    }

    #[test]
    fn closed_wood_door_needs_the_open_doors_flag() {
        let mut world = VoxelWorld::flat(16, 0);
        world.set(BlockPos::new(1, 0, 0), BlockKind::WoodDoor { open: false });
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));

        let plain = NodeEvaluator::new(Locomotion::ground());
        let node = plain.start_node(&agent, &world).unwrap();
        assert!(plain
            .neighbors(&node, &agent, &world)
            .iter()
            .all(|n| n.pos != BlockPos::new(1, 0, 0)));

        let opener = NodeEvaluator::new(
            Locomotion::ground().with_flags(MobilityFlags::CAN_OPEN_DOORS),
        );
        let node = opener.start_node(&agent, &world).unwrap();
        assert!(opener
            .neighbors(&node, &agent, &world)
            .iter()
            .any(|n| n.pos == BlockPos::new(1, 0, 0)));
    }

    #[test]
    fn fire_avoiders_refuse_tainted_cells() {
        let mut world = VoxelWorld::flat(16, 0);
        world.set(BlockPos::new(2, 0, 0), BlockKind::Fire);
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));

        // The cell next to the fire is tainted but still passable by default.
        let plain = NodeEvaluator::new(Locomotion::ground());
        let node = plain.start_node(&agent, &world).unwrap();
        assert!(plain
            .neighbors(&node, &agent, &world)
            .iter()
            .any(|n| n.pos == BlockPos::new(1, 0, 0)));

        let avoider = NodeEvaluator::new(
            Locomotion::ground().with_flags(MobilityFlags::AVOIDS_FIRE),
        );
        let node = avoider.start_node(&agent, &world).unwrap();
        assert!(avoider
            .neighbors(&node, &agent, &world)
            .iter()
            .all(|n| n.pos != BlockPos::new(1, 0, 0)));
    }

    #[test]
    fn midair_ground_goal_snaps_to_the_surface() {
        let world = VoxelWorld::flat(16, 0);
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let goal = evaluator
            .goal_node(BlockPos::new(5, 6, 5), &world)
            .expect("open column above walkable floor");
        assert_eq!(goal.pos, BlockPos::new(5, 0, 5));
        assert_eq!(goal.path_type, PathType::Walkable);
        // Flyers keep the airborne cell as-is.
        let flyer = NodeEvaluator::new(Locomotion::flying());
        let goal = flyer.goal_node(BlockPos::new(5, 6, 5), &world).unwrap();
        assert_eq!(goal.pos, BlockPos::new(5, 6, 5));
    }

    #[test]
    fn deep_water_goal_has_no_footing_for_walkers() {
        let mut world = VoxelWorld::flat(16, 4);
        world.fill(
            BlockPos::new(4, 1, 4),
            BlockPos::new(6, 4, 6),
            BlockKind::Water,
        );
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        assert!(evaluator.goal_node(BlockPos::new(5, 4, 5), &world).is_none());
    }

    #[test]
    fn swimmer_expands_only_into_water() {
        let mut world = VoxelWorld::flat(16, 4);
        world.fill(
            BlockPos::new(-3, 4, -3),
            BlockPos::new(3, 6, 3),
            BlockKind::Water,
        );
        let evaluator = NodeEvaluator::new(Locomotion::swimming());
        let agent = AgentState {
            pos: DVec3::new(0.5, 5.0, 0.5),
            width: 0.6,
            height: 0.6,
            speed: 0.25,
            on_ground: false,
            in_water: true,
            mounted: false,
        };
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert!(!neighbors.is_empty());
        assert!(neighbors
            .iter()
            .all(|n| world.classify(n.pos) == PathType::Water));
    }

    #[test]
    fn climber_moves_up_a_wall_face() {
        let mut world = VoxelWorld::flat(16, 0);
        world.fill(
            BlockPos::new(1, 0, -1),
            BlockPos::new(1, 6, 1),
            BlockKind::Stone,
        );
        let evaluator = NodeEvaluator::new(Locomotion::wall_climbing());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &world).unwrap();
        let neighbors = evaluator.neighbors(&node, &agent, &world);
        assert!(
            neighbors.iter().any(|n| n.pos == BlockPos::new(0, 1, 0)),
            "wall face next to the start should permit a vertical move"
        );
    }

    #[test]
    fn windowed_terrain_restricts_expansion() {
        let world = VoxelWorld::flat(16, 0);
        let window = TerrainWindow::new(&world, BlockPos::new(0, 0, 0), 1).unwrap();
        let evaluator = NodeEvaluator::new(Locomotion::ground());
        let agent = walker_agent(DVec3::new(0.5, 0.0, 0.5));
        let node = evaluator.start_node(&agent, &window).unwrap();
        let edge = Node::new(BlockPos::new(1, 0, 0), PathType::Walkable, 0.0);
        let neighbors = evaluator.neighbors(&edge, &agent, &window);
        assert!(neighbors.iter().all(|n| n.pos.x <= 1));
        let _ = node;
    }
}
