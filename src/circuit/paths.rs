//! Input-to-output path enumeration.
//!
//! Every directed walk from a primary input to a primary output is a path;
//! a node with several listeners forks the walk once per listener. The walk
//! uses an explicit stack and tracks the nodes on the current branch, so a
//! combinational loop is reported instead of recursing without bound.
//! Loops no primary input reaches are caught by [`check_acyclic`] before
//! any walk starts.

use std::collections::{HashSet, VecDeque};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::graph::Circuit;
use super::types::{GateId, NodeId};
use crate::error::{DelayError, Result};

/// An ordered gate sequence from a primary input to a primary output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub input: NodeId,
    pub output: NodeId,
    pub gates: Vec<GateId>,
}

/// All paths ending at one primary output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub output: NodeId,
    pub paths: Vec<Path>,
}

struct Frame {
    node: NodeId,
    /// Position of the next listener to explore
    next: usize,
}

/// Enumerate every path starting at one primary input.
pub fn paths_from(circuit: &Circuit, input: NodeId) -> Result<Vec<Path>> {
    let start = circuit.node(input);
    if start.listeners.is_empty() {
        return Err(DelayError::DanglingInput {
            node: start.name.clone(),
        });
    }

    let mut paths = Vec::new();
    let mut gates: Vec<GateId> = Vec::new();
    let mut on_branch: HashSet<NodeId> = HashSet::from([input]);
    let mut stack = vec![Frame { node: input, next: 0 }];

    while let Some(frame) = stack.last_mut() {
        let node = circuit.node(frame.node);

        if node.listeners.is_empty() {
            paths.push(Path {
                input,
                output: frame.node,
                gates: gates.clone(),
            });
        } else if let Some(&gate) = node.listeners.iter().nth(frame.next) {
            frame.next += 1;
            let out = circuit.gate(gate).output;
            if !on_branch.insert(out) {
                return Err(DelayError::CombinationalLoop {
                    node: circuit.node_name(out).to_string(),
                    gate: circuit.gate(gate).gate.name().to_string(),
                });
            }
            gates.push(gate);
            stack.push(Frame { node: out, next: 0 });
            continue;
        }

        // Branch exhausted: step back to the previous node.
        let done = stack.pop().map(|f| f.node);
        if let Some(node) = done {
            on_branch.remove(&node);
        }
        if !stack.is_empty() {
            gates.pop();
        }
    }

    Ok(paths)
}

/// Reject any combinational loop in the gate set, reachable or not.
///
/// Kahn's algorithm over gate-to-gate edges. Gates left with a driven,
/// unresolved input afterwards sit on or behind a loop; the error names a
/// gate on the loop itself.
pub fn check_acyclic(circuit: &Circuit) -> Result<()> {
    let gates = circuit.gates();
    let mut pending: Vec<usize> = gates
        .iter()
        .map(|g| {
            g.inputs
                .iter()
                .collect::<HashSet<_>>()
                .into_iter()
                .filter(|&&n| circuit.node(n).driver.is_some())
                .count()
        })
        .collect();

    let mut ready: VecDeque<usize> = (0..gates.len()).filter(|&g| pending[g] == 0).collect();
    let mut resolved = 0;
    while let Some(g) = ready.pop_front() {
        resolved += 1;
        for &listener in &circuit.node(gates[g].output).listeners {
            pending[listener.0] -= 1;
            if pending[listener.0] == 0 {
                ready.push_back(listener.0);
            }
        }
    }
    if resolved == gates.len() {
        return Ok(());
    }

    // Step back through unresolved drivers until a gate repeats.
    let Some(mut current) = (0..gates.len()).find(|&g| pending[g] > 0) else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    while seen.insert(current) {
        let upstream = gates[current]
            .inputs
            .iter()
            .filter_map(|&n| circuit.node(n).driver)
            .find(|d| pending[d.0] > 0);
        match upstream {
            Some(driver) => current = driver.0,
            None => break,
        }
    }

    let gate = &gates[current];
    Err(DelayError::CombinationalLoop {
        node: circuit.node_name(gate.output).to_string(),
        gate: gate.gate.name().to_string(),
    })
}

/// Enumerate paths from every primary input, in primary-input order.
pub fn enumerate_paths(circuit: &Circuit) -> Result<Vec<Path>> {
    check_acyclic(circuit)?;

    #[cfg(feature = "parallel")]
    let per_input: Vec<Vec<Path>> = circuit
        .primary_inputs()
        .par_iter()
        .map(|&input| paths_from(circuit, input))
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let per_input: Vec<Vec<Path>> = circuit
        .primary_inputs()
        .iter()
        .map(|&input| paths_from(circuit, input))
        .collect::<Result<_>>()?;

    let paths: Vec<Path> = per_input.into_iter().flatten().collect();
    info!(
        inputs = circuit.primary_inputs().len(),
        paths = paths.len(),
        "enumerated paths"
    );
    Ok(paths)
}

/// Partition paths by the primary output they end at.
///
/// Groups follow primary-output order; paths keep their relative order.
pub fn group_by_output(circuit: &Circuit, paths: Vec<Path>) -> Vec<OutputPaths> {
    let mut groups: Vec<OutputPaths> = circuit
        .primary_outputs()
        .iter()
        .map(|&output| OutputPaths {
            output,
            paths: Vec::new(),
        })
        .collect();

    for path in paths {
        if let Some(group) = groups.iter_mut().find(|g| g.output == path.output) {
            group.paths.push(path);
        }
    }
    groups
}
