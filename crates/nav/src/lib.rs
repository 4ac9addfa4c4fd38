#![warn(missing_docs)]
//! Per-agent pathfinding and navigation over a voxel grid.
//!
//! The crate is built from leaves up: [`Node`] is one searchable grid cell,
//! [`PathFinder`] runs a bounded best-first search producing a [`Path`], and
//! [`PathNavigation`] is the tick-driven state machine that owns the live path,
//! follows it, and decides when to replan. Locomotion differences (ground,
//! flying, swimming, wall-climbing) are carried by [`Locomotion`] and consumed
//! by the evaluator and the navigation state machine.

mod agent;
mod debug;
mod evaluator;
mod locomotion;
mod navigation;
mod node;
mod path;
mod pathfinder;

pub use agent::{AgentState, MoveIntent};
pub use debug::{NavDebugFrame, SearchDebug};
pub use evaluator::NodeEvaluator;
pub use locomotion::{Locomotion, MobilityFlags, MobilityMode};
pub use navigation::PathNavigation;
pub use node::Node;
pub use path::Path;
pub use pathfinder::{DistanceMetric, PathFinder};
