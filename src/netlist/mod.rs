//! Gate-level netlist format.
//!
//! The format is line-oriented with whitespace-separated tokens. Keywords
//! are case-insensitive and `#` or `;` start a comment.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist   = { line }
//! line      = supply | gate | load | comment | empty
//! supply    = "vcc" value
//! gate      = "inv" node node name
//!           | ("nand" | "and" | "or" | "xor") node node node name
//! load      = "c" { any_char } node value
//!
//! value     = number [si_prefix]
//! si_prefix = 'y' | 'z' | 'a' | 'f' | 'p' | 'n' | 'u' | 'm' | 'c' | 'd'
//!           | 'k' | 'M' | 'G' | 'T' | 'P' | 'E' | 'Z' | 'Y'
//! ```
//!
//! Gate operands are the inputs, then the output node, then the instance
//! name.
//!
//! # Example
//!
//! ```text
//! # Half adder
//! vcc 5
//! xor A B SUM X1
//! and A B CARRY A1
//! cload SUM 20f
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, si_prefix, Lexer, Token};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist string.
pub fn parse(input: &str) -> Result<Netlist> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist file.
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::DelayError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
