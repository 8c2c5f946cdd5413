//! Circuit graph structure.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use super::types::{GateId, NodeId};
use crate::components::{Gate, Technology};
use crate::error::{DelayError, Result};
use crate::netlist::{GateDef, LoadDef, Netlist, Statement};

/// A named connection point.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Gate driving this node; `None` for a primary input
    pub driver: Option<GateId>,
    /// Gates with an input on this node; empty for a primary output
    pub listeners: BTreeSet<GateId>,
    /// Explicit load annotation (F)
    pub capacitance: f64,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            driver: None,
            listeners: BTreeSet::new(),
            capacitance: 0.0,
        }
    }

    pub fn is_primary_input(&self) -> bool {
        self.driver.is_none()
    }

    pub fn is_primary_output(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// A gate together with the nodes it connects.
#[derive(Debug, Clone)]
pub struct PlacedGate {
    pub gate: Gate,
    pub inputs: Vec<NodeId>,
    pub output: NodeId,
}

/// A fully built, classified circuit.
#[derive(Debug)]
pub struct Circuit {
    nodes: Vec<Node>,
    node_map: HashMap<String, NodeId>,
    gates: Vec<PlacedGate>,
    primary_inputs: Vec<NodeId>,
    primary_outputs: Vec<NodeId>,
    supply_voltage: Option<f64>,
}

impl Circuit {
    /// Build a circuit from a parsed netlist.
    ///
    /// Records are applied in order; any failure aborts the build.
    pub fn from_netlist(netlist: &Netlist, tech: &Technology) -> Result<Self> {
        let mut builder = CircuitBuilder::new(tech);
        for statement in &netlist.statements {
            match statement {
                Statement::Gate(def) => {
                    builder.add_gate(def)?;
                }
                Statement::Load(def) => builder.annotate_load(def)?,
            }
        }
        if let Some(vcc) = netlist.supply_voltage {
            builder.set_supply_voltage(vcc);
        }
        Ok(builder.build())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Find a node ID by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    /// Get the name of a node.
    pub fn node_name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn gates(&self) -> &[PlacedGate] {
        &self.gates
    }

    pub fn gate(&self, id: GateId) -> &PlacedGate {
        &self.gates[id.0]
    }

    /// Find a gate ID by instance name.
    pub fn find_gate(&self, name: &str) -> Option<GateId> {
        self.gates
            .iter()
            .position(|g| g.gate.name() == name)
            .map(GateId)
    }

    /// Nodes without a driver, in first-reference order.
    pub fn primary_inputs(&self) -> &[NodeId] {
        &self.primary_inputs
    }

    /// Nodes without listeners, in first-reference order.
    pub fn primary_outputs(&self) -> &[NodeId] {
        &self.primary_outputs
    }

    /// Supply voltage declared by the netlist, if any.
    pub fn supply_voltage(&self) -> Option<f64> {
        self.supply_voltage
    }
}

/// Incremental circuit construction.
///
/// Nodes are created on first reference. The classified [`Circuit`] is only
/// available through [`CircuitBuilder::build`].
pub struct CircuitBuilder<'t> {
    tech: &'t Technology,
    nodes: Vec<Node>,
    node_map: HashMap<String, NodeId>,
    gates: Vec<PlacedGate>,
    gate_names: HashSet<String>,
    supply_voltage: Option<f64>,
}

impl<'t> CircuitBuilder<'t> {
    pub fn new(tech: &'t Technology) -> Self {
        Self {
            tech,
            nodes: Vec::new(),
            node_map: HashMap::new(),
            gates: Vec::new(),
            gate_names: HashSet::new(),
            supply_voltage: None,
        }
    }

    /// Look up a node by name, creating it on first reference.
    pub fn node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_map.get(name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.to_string()));
        self.node_map.insert(name.to_string(), id);
        id
    }

    /// Instantiate a gate and wire it to its nodes.
    pub fn add_gate(&mut self, def: &GateDef) -> Result<GateId> {
        if self.gate_names.contains(&def.name) {
            return Err(DelayError::DuplicateGate {
                name: def.name.clone(),
            });
        }

        if let Some(&out) = self.node_map.get(&def.output) {
            if let Some(existing) = self.nodes[out.0].driver {
                return Err(DelayError::DriverConflict {
                    node: def.output.clone(),
                    existing: self.gates[existing.0].gate.name().to_string(),
                    gate: def.name.clone(),
                });
            }
        }

        let gate = Gate::new(def.kind, &def.name, &def.inputs, &def.output, self.tech)?;

        let id = GateId(self.gates.len());
        let inputs: Vec<NodeId> = def.inputs.iter().map(|name| self.node(name)).collect();
        let output = self.node(&def.output);

        self.nodes[output.0].driver = Some(id);
        for &input in &inputs {
            self.nodes[input.0].listeners.insert(id);
        }

        debug!(
            gate = %def.name,
            kind = def.kind.keyword(),
            output = %def.output,
            "registered gate"
        );

        self.gate_names.insert(def.name.clone());
        self.gates.push(PlacedGate {
            gate,
            inputs,
            output,
        });
        Ok(id)
    }

    /// Set the explicit load capacitance of a node.
    pub fn annotate_load(&mut self, def: &LoadDef) -> Result<()> {
        if !(def.capacitance.is_finite() && def.capacitance >= 0.0) {
            return Err(DelayError::domain(
                &def.node,
                format!(
                    "load capacitance must be non-negative, got {} (line {})",
                    def.capacitance, def.line
                ),
            ));
        }
        let id = self.node(&def.node);
        self.nodes[id.0].capacitance = def.capacitance;
        Ok(())
    }

    pub fn set_supply_voltage(&mut self, vcc: f64) {
        self.supply_voltage = Some(vcc);
    }

    /// Classify primary inputs and outputs and freeze the circuit.
    pub fn build(self) -> Circuit {
        let primary_inputs = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_primary_input())
            .map(NodeId)
            .collect();
        let primary_outputs = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_primary_output())
            .map(NodeId)
            .collect();

        Circuit {
            nodes: self.nodes,
            node_map: self.node_map,
            gates: self.gates,
            primary_inputs,
            primary_outputs,
            supply_voltage: self.supply_voltage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::netlist;

    fn build(input: &str) -> Result<Circuit> {
        Circuit::from_netlist(&netlist::parse(input)?, &Technology::default())
    }

    #[test]
    fn test_nodes_created_on_first_reference() {
        let circuit = build("nand A B N1 G1\ninv N1 OUT I1\n").unwrap();
        let names: Vec<&str> = circuit.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "N1", "OUT"]);

        let n1 = circuit.node(circuit.find_node("N1").unwrap());
        assert_eq!(n1.driver, circuit.find_gate("G1"));
        assert_eq!(n1.listeners.len(), 1);
    }

    #[test]
    fn test_classification() {
        let circuit = build("nand A B N1 G1\ninv N1 OUT I1\n").unwrap();
        let inputs: Vec<&str> = circuit
            .primary_inputs()
            .iter()
            .map(|&n| circuit.node_name(n))
            .collect();
        let outputs: Vec<&str> = circuit
            .primary_outputs()
            .iter()
            .map(|&n| circuit.node_name(n))
            .collect();
        assert_eq!(inputs, vec!["A", "B"]);
        assert_eq!(outputs, vec!["OUT"]);
    }

    #[test]
    fn test_fanout_registers_each_listener() {
        let circuit = build("inv A X I1\ninv A Y I2\nnand A A Z G1\n").unwrap();
        let a = circuit.node(circuit.find_node("A").unwrap());
        assert_eq!(a.listeners.len(), 3);
    }

    #[test]
    fn test_second_driver_is_conflict() {
        let err = build("inv A OUT I1\ninv B OUT I2\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        match err {
            DelayError::DriverConflict {
                node,
                existing,
                gate,
            } => {
                assert_eq!(node, "OUT");
                assert_eq!(existing, "I1");
                assert_eq!(gate, "I2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_gate_name() {
        let err = build("inv A X I1\ninv B Y I1\n").unwrap_err();
        assert!(matches!(err, DelayError::DuplicateGate { .. }));
    }

    #[test]
    fn test_load_annotation_before_gate() {
        let circuit = build("cload OUT 20f\ninv A OUT I1\n").unwrap();
        let out = circuit.node(circuit.find_node("OUT").unwrap());
        assert!((out.capacitance - 20e-15).abs() < 1e-27);
        assert!(out.driver.is_some());
    }

    #[test]
    fn test_negative_load_is_domain_error() {
        let err = build("cload OUT -5f\ninv A OUT I1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        match err {
            DelayError::DomainError { context, .. } => assert_eq!(context, "OUT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_supply_carried_from_netlist() {
        let circuit = build("vcc 5\ninv A OUT I1\n").unwrap();
        assert_eq!(circuit.supply_voltage(), Some(5.0));
    }
}
