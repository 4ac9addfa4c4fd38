//! An ordered, cursor-tracked sequence of nodes representing a planned route.

use crate::{AgentState, Node, SearchDebug};
use glam::DVec3;
use serde::Serialize;
use voxelnav_core::BlockPos;

/// A planned route: nodes in traversal order plus a cursor marking progress.
///
/// Plain data with a cursor; the owning navigation drives `advance` and the
/// occasional in-place node correction. The cursor never moves backward.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    nodes: Vec<Node>,
    next_node_index: usize,
    target: BlockPos,
    reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<SearchDebug>,
}

impl Path {
    /// Assemble a path from search output.
    pub(crate) fn new(nodes: Vec<Node>, target: BlockPos, reached: bool) -> Self {
        Self {
            nodes,
            next_node_index: 0,
            target,
            reached,
            debug: None,
        }
    }

    pub(crate) fn set_debug(&mut self, debug: SearchDebug) {
        self.debug = Some(debug);
    }

    /// Move the cursor to the next node. No-op once the path is done.
    pub fn advance(&mut self) {
        if self.next_node_index < self.nodes.len() {
            self.next_node_index += 1;
        }
    }

    /// Whether the cursor has walked off the end.
    pub fn is_done(&self) -> bool {
        self.next_node_index >= self.nodes.len()
    }

    /// Current cursor position.
    pub fn next_node_index(&self) -> usize {
        self.next_node_index
    }

    /// The node the cursor points at, if any.
    pub fn next_node(&self) -> Option<&Node> {
        self.nodes.get(self.next_node_index)
    }

    /// Grid cell of the next waypoint.
    pub fn next_node_pos(&self) -> Option<BlockPos> {
        self.next_node().map(|node| node.pos)
    }

    /// Next waypoint as a concrete movement target for `agent`.
    ///
    /// Wide agents aim for an offset matching their bounding box so their
    /// center crosses the cell correctly.
    pub fn next_entity_pos(&self, agent: &AgentState) -> Option<DVec3> {
        let node = self.next_node()?;
        let offset = (agent.width + 1.0).floor() * 0.5;
        Some(DVec3::new(
            node.pos.x as f64 + offset,
            node.pos.y as f64,
            node.pos.z as f64 + offset,
        ))
    }

    /// Node at index `i`.
    pub fn node(&self, i: usize) -> &Node {
        &self.nodes[i]
    }

    /// Number of nodes in the route.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in traversal order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Final node of the route, if any.
    pub fn end_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// The originally requested target cell.
    pub fn target(&self) -> BlockPos {
        self.target
    }

    /// Whether the search actually reached a goal (vs. a best-effort partial).
    pub fn reached_target(&self) -> bool {
        self.reached
    }

    /// Structural equality over the full node sequence.
    ///
    /// Used to avoid discarding and replacing an identical route every replan.
    pub fn same_as(&self, other: &Path) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(other.nodes.iter())
                .all(|(a, b)| a.pos == b.pos)
    }

    /// Replace the node at `i` in place.
    ///
    /// The replacement must keep the same (x, z) column; only y may shift, as
    /// with the basin step-up correction. A mismatch is an internal invariant
    /// break, not bad input.
    pub fn replace_node(&mut self, i: usize, node: Node) {
        let old = &self.nodes[i];
        assert_eq!(
            (old.pos.x, old.pos.z),
            (node.pos.x, node.pos.z),
            "replace_node must stay in the same column"
        );
        self.nodes[i] = node;
    }

    /// Search diagnostics, when captured.
    pub fn debug_data(&self) -> Option<&SearchDebug> {
        self.debug.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelnav_core::PathType;

    fn walk_node(x: i32, y: i32, z: i32) -> Node {
        Node::new(BlockPos::new(x, y, z), PathType::Walkable, 0.0)
    }

    fn three_step() -> Path {
        Path::new(
            vec![walk_node(0, 0, 0), walk_node(1, 0, 0), walk_node(2, 0, 0)],
            BlockPos::new(2, 0, 0),
            true,
        )
    }

    #[test]
    fn cursor_is_monotonic_and_saturates() {
        let mut path = three_step();
        assert!(!path.is_done());
        path.advance();
        path.advance();
        path.advance();
        assert!(path.is_done());
        path.advance();
        assert!(path.is_done());
        assert_eq!(path.next_node_index(), 3);
    }

    #[test]
    fn same_as_compares_full_sequences() {
        let a = three_step();
        let mut b = three_step();
        assert!(a.same_as(&b));
        b.replace_node(1, walk_node(1, 1, 0));
        assert!(!a.same_as(&b));
        let short = Path::new(vec![walk_node(0, 0, 0)], BlockPos::new(0, 0, 0), true);
        assert!(!a.same_as(&short));
    }

    #[test]
    fn replace_node_allows_vertical_shift() {
        let mut path = three_step();
        let raised = path.node(1).cloned_move_to(BlockPos::new(1, 1, 0));
        path.replace_node(1, raised);
        assert_eq!(path.node(1).pos, BlockPos::new(1, 1, 0));
    }

    #[test]
    #[should_panic(expected = "same column")]
    fn replace_node_rejects_column_change() {
        let mut path = three_step();
        path.replace_node(1, walk_node(5, 0, 0));
    }

    #[test]
    fn entity_pos_centers_narrow_agents() {
        let path = three_step();
        let agent = AgentState {
            pos: DVec3::ZERO,
            width: 0.6,
            height: 1.8,
            speed: 0.25,
            on_ground: true,
            in_water: false,
            mounted: false,
        };
        let target = path.next_entity_pos(&agent).unwrap();
        assert_eq!(target, DVec3::new(0.5, 0.0, 0.5));
    }
}
