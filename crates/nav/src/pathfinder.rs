//! Bounded best-first search over evaluator-expanded nodes.

use crate::{AgentState, Node, NodeEvaluator, Path, SearchDebug};
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::trace;
use voxelnav_core::{BlockPos, TerrainQuery};

/// Heuristic/cost distance strategy.
///
/// Some agents (flyers chasing ground targets, for one) prefer a
/// horizontal-only distance so altitude differences do not distort the
/// search; this is pluggable rather than hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Full 3-D Euclidean distance.
    Euclidean,
    /// XZ-plane distance only.
    Horizontal,
}

impl DistanceMetric {
    fn between(self, a: BlockPos, b: BlockPos) -> f32 {
        match self {
            DistanceMetric::Euclidean => a.distance(b) as f32,
            DistanceMetric::Horizontal => a.horizontal_distance_sqr(b).sqrt() as f32,
        }
    }
}

/// Entry in the open heap. `BinaryHeap` is a max-heap; comparisons are
/// inverted so the smallest `(f, h, pos)` is popped first. Among equal-f
/// entries the one closer to a goal (smaller h) wins, then coordinate order
/// keeps the tie-break total and stable.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenEntry {
    f: f32,
    h: f32,
    pos: BlockPos,
    index: usize,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dense per-search bookkeeping for one grid cell.
#[derive(Debug, Clone)]
struct SearchNode {
    node: Node,
    g: f32,
    h: f32,
    came_from: Option<usize>,
    closed: bool,
}

/// Best-first (A*-family) searcher producing [`Path`]s.
///
/// The search is deterministic: same terrain, agent, targets, and budget
/// always yield the same node sequence.
#[derive(Debug)]
pub struct PathFinder {
    evaluator: NodeEvaluator,
    max_visited_nodes: u32,
    metric: DistanceMetric,
    capture_debug: bool,
    last_visited: Cell<u32>,
}

impl PathFinder {
    /// Default node-visit budget before a search degrades to a partial path.
    pub const DEFAULT_MAX_VISITED_NODES: u32 = 512;

    /// Build a searcher around a node evaluator.
    pub fn new(evaluator: NodeEvaluator) -> Self {
        Self {
            evaluator,
            max_visited_nodes: Self::DEFAULT_MAX_VISITED_NODES,
            metric: DistanceMetric::Euclidean,
            capture_debug: false,
            last_visited: Cell::new(0),
        }
    }

    /// Replace the distance strategy.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Capture open/closed sets into the produced path (diagnostics).
    pub fn with_debug_capture(mut self, capture: bool) -> Self {
        self.capture_debug = capture;
        self
    }

    /// Set the node-visit budget.
    pub fn set_max_visited_nodes(&mut self, budget: u32) {
        self.max_visited_nodes = budget.max(1);
    }

    /// The evaluator driving expansion.
    pub fn evaluator(&self) -> &NodeEvaluator {
        &self.evaluator
    }

    /// Mutable access for per-agent malus tuning.
    pub fn evaluator_mut(&mut self) -> &mut NodeEvaluator {
        &mut self.evaluator
    }

    /// Nodes expanded by the most recent search (test instrumentation).
    pub fn last_visited(&self) -> u32 {
        self.last_visited.get()
    }

    /// Search for a path from the agent's position to any of `targets`.
    ///
    /// Returns `None` when no start/goal resolves or the open set exhausts
    /// without reaching a goal. When the node budget runs out first, the best
    /// partial path found so far is returned instead (its
    /// [`Path::reached_target`] is false).
    pub fn find_path(
        &self,
        terrain: &impl TerrainQuery,
        agent: &AgentState,
        targets: &BTreeSet<BlockPos>,
        max_path_len: f32,
        reach_range: i32,
        budget_multiplier: f32,
    ) -> Option<Path> {
        self.last_visited.set(0);
        if targets.is_empty() {
            return None;
        }
        let start = self.evaluator.start_node(agent, terrain)?;
        let goals: Vec<(BlockPos, Node)> = targets
            .iter()
            .filter_map(|&t| self.evaluator.goal_node(t, terrain).map(|g| (t, g)))
            .collect();
        if goals.is_empty() {
            return None;
        }

        let budget = ((self.max_visited_nodes as f32) * budget_multiplier).max(1.0) as u32;
        let heuristic = |pos: BlockPos| -> f32 {
            goals
                .iter()
                .map(|(_, goal)| self.metric.between(pos, goal.pos))
                .fold(f32::INFINITY, f32::min)
        };

        let mut arena: Vec<SearchNode> = Vec::new();
        let mut index_of: BTreeMap<BlockPos, usize> = BTreeMap::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();

        let start_pos = start.pos;
        let start_h = heuristic(start_pos);
        arena.push(SearchNode {
            node: start,
            g: 0.0,
            h: start_h,
            came_from: None,
            closed: false,
        });
        index_of.insert(start_pos, 0);
        open.push(OpenEntry {
            f: start_h,
            h: start_h,
            pos: start_pos,
            index: 0,
        });

        let mut best_index = 0usize;
        let mut visited = 0u32;
        let mut budget_exhausted = false;

        while let Some(entry) = open.pop() {
            let index = entry.index;
            if arena[index].closed {
                continue;
            }
            arena[index].closed = true;
            visited += 1;

            let current = arena[index].node;
            let reached = goals.iter().any(|(_, goal)| {
                current.pos == goal.pos
                    || (reach_range > 0 && current.pos.manhattan(goal.pos) <= reach_range)
            });
            if reached {
                self.last_visited.set(visited);
                let mut path = self.reconstruct(&arena, index, &goals, true);
                if self.capture_debug {
                    path.set_debug(capture_debug(&arena));
                }
                trace!(nodes = path.node_count(), visited, "path search reached goal");
                return Some(path);
            }

            // Keep the closest expanded node as the partial-path candidate.
            let (best_h, best_g) = (arena[best_index].h, arena[best_index].g);
            if (arena[index].h, arena[index].g) < (best_h, best_g) {
                best_index = index;
            }

            if visited >= budget {
                budget_exhausted = true;
                break;
            }

            let current_g = arena[index].g;
            for neighbor in self.evaluator.neighbors(&current, agent, terrain) {
                if neighbor.cost_malus < 0.0 {
                    continue;
                }
                if start_pos.distance(neighbor.pos) as f32 > max_path_len {
                    continue;
                }
                let step = current.distance_to(&neighbor) + neighbor.cost_malus;
                let tentative_g = current_g + step;
                match index_of.get(&neighbor.pos) {
                    Some(&existing) => {
                        if arena[existing].closed || tentative_g >= arena[existing].g {
                            continue;
                        }
                        arena[existing].g = tentative_g;
                        arena[existing].came_from = Some(index);
                        let h = arena[existing].h;
                        open.push(OpenEntry {
                            f: tentative_g + h,
                            h,
                            pos: neighbor.pos,
                            index: existing,
                        });
                    }
                    None => {
                        let h = heuristic(neighbor.pos);
                        let new_index = arena.len();
                        arena.push(SearchNode {
                            node: neighbor,
                            g: tentative_g,
                            h,
                            came_from: Some(index),
                            closed: false,
                        });
                        index_of.insert(neighbor.pos, new_index);
                        open.push(OpenEntry {
                            f: tentative_g + h,
                            h,
                            pos: neighbor.pos,
                            index: new_index,
                        });
                    }
                }
            }
        }

        self.last_visited.set(visited);
        if !budget_exhausted {
            // Open set exhausted without reaching a goal: the target is
            // unreachable from here.
            trace!(visited, "path search exhausted open set");
            return None;
        }
        let mut path = self.reconstruct(&arena, best_index, &goals, false);
        if self.capture_debug {
            path.set_debug(capture_debug(&arena));
        }
        trace!(
            nodes = path.node_count(),
            visited,
            "path search hit node budget, returning partial path"
        );
        Some(path)
    }

    fn reconstruct(
        &self,
        arena: &[SearchNode],
        end_index: usize,
        goals: &[(BlockPos, Node)],
        reached: bool,
    ) -> Path {
        let mut nodes = Vec::new();
        let mut cursor = Some(end_index);
        while let Some(i) = cursor {
            nodes.push(arena[i].node);
            cursor = arena[i].came_from;
        }
        nodes.reverse();

        let end_pos = arena[end_index].node.pos;
        let target = goals
            .iter()
            .min_by(|(_, a), (_, b)| {
                self.metric
                    .between(end_pos, a.pos)
                    .total_cmp(&self.metric.between(end_pos, b.pos))
                    .then_with(|| a.pos.cmp(&b.pos))
            })
            .map(|(t, _)| *t)
            .expect("goals are non-empty");
        Path::new(nodes, target, reached)
    }
}

fn capture_debug(arena: &[SearchNode]) -> SearchDebug {
    let mut debug = SearchDebug::default();
    for entry in arena {
        if entry.closed {
            debug.closed.push(entry.node.pos);
        } else {
            debug.open.push(entry.node.pos);
        }
    }
    debug
}
