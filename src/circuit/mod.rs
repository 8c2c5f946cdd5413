//! Circuit graph representation and path enumeration.
//!
//! Nodes and gates live in flat arenas addressed by [`NodeId`] and
//! [`GateId`]. A node records its single driver and its set of listeners
//! as plain indices, so the graph holds no reference cycles.

mod graph;
mod paths;
mod types;

pub use graph::{Circuit, CircuitBuilder, Node, PlacedGate};
pub use paths::{check_acyclic, enumerate_paths, group_by_output, paths_from, OutputPaths, Path};
pub use types::*;
