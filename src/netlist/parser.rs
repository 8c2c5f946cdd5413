//! Parser for the netlist format.

use tracing::warn;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token};
use crate::components::GateKind;
use crate::error::{DelayError, Result};

/// Parser for gate netlists.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<Netlist> {
        let mut netlist = Netlist::new();

        for tokens in self.lexer.by_ref() {
            let keyword = &tokens[0];
            let line = keyword.line;
            let lower = keyword.text.to_ascii_lowercase();

            if lower == "vcc" {
                let [value] = operands::<1>(&tokens, "vcc <value>")?;
                let vcc = value_of(value)?;
                if let Some(previous) = netlist.supply_voltage.replace(vcc) {
                    warn!(line, previous, vcc, "supply voltage redefined");
                }
            } else if let Some(kind) = GateKind::from_keyword(&lower) {
                netlist.statements.push(Statement::Gate(parse_gate(kind, &tokens)?));
            } else if lower.starts_with('c') {
                let [node, value] = operands::<2>(&tokens, "c<name> <node> <value>")?;
                netlist.statements.push(Statement::Load(LoadDef {
                    node: node.text.clone(),
                    capacitance: value_of(value)?,
                    line,
                }));
            } else {
                return Err(DelayError::UnknownDirective {
                    directive: keyword.text.clone(),
                    line,
                });
            }
        }

        Ok(netlist)
    }
}

fn parse_gate(kind: GateKind, tokens: &[Token]) -> Result<GateDef> {
    let line = tokens[0].line;
    let n = kind.input_count();
    let expected = n + 2;
    if tokens.len() - 1 != expected {
        return Err(DelayError::parse(
            line,
            format!(
                "'{}' expects {} inputs, an output and an instance name ({} operands), got {}",
                kind.keyword(),
                n,
                expected,
                tokens.len() - 1
            ),
        ));
    }

    let operands = &tokens[1..];
    Ok(GateDef {
        kind,
        inputs: operands[..n].iter().map(|t| t.text.clone()).collect(),
        output: operands[n].text.clone(),
        name: operands[n + 1].text.clone(),
        line,
    })
}

/// Exactly `N` operands after the keyword.
fn operands<'t, const N: usize>(tokens: &'t [Token], usage: &str) -> Result<[&'t Token; N]> {
    let rest = &tokens[1..];
    if rest.len() != N {
        return Err(DelayError::parse(
            tokens[0].line,
            format!("expected '{}', got {} operand(s)", usage, rest.len()),
        ));
    }
    Ok(std::array::from_fn(|i| &rest[i]))
}

fn value_of(token: &Token) -> Result<f64> {
    parse_value(&token.text).ok_or_else(|| DelayError::InvalidValue {
        value: token.text.clone(),
        line: token.line,
    })
}
