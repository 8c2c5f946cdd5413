//! Parsed netlist records.

use crate::components::GateKind;

/// A parsed netlist, with records kept in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    /// Supply voltage from the last `vcc` line
    pub supply_voltage: Option<f64>,
    /// Gate and load records in the order they appeared
    pub statements: Vec<Statement>,
}

impl Netlist {
    /// Create a new empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate the gate records only.
    pub fn gates(&self) -> impl Iterator<Item = &GateDef> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Gate(g) => Some(g),
            Statement::Load(_) => None,
        })
    }
}

/// One connectivity record.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Gate(GateDef),
    Load(LoadDef),
}

/// A gate instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDef {
    pub kind: GateKind,
    /// Instance name
    pub name: String,
    /// Input node names, in terminal order
    pub inputs: Vec<String>,
    /// Output node name
    pub output: String,
    /// Source line number for error reporting
    pub line: usize,
}

/// An explicit load capacitance annotation on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDef {
    pub node: String,
    /// Capacitance in farads, SI prefix already applied
    pub capacitance: f64,
    pub line: usize,
}
