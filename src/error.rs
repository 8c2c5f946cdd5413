//! Error types for the gate delay estimator.
//!
//! This module provides a unified error type [`DelayError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! construction, device evaluation and path analysis.

use thiserror::Error;

/// Result type alias using [`DelayError`].
pub type Result<T> = std::result::Result<T, DelayError>;

/// Unified error type for all delay estimation operations.
#[derive(Error, Debug)]
pub enum DelayError {
    // ============ Netlist Parsing Errors ============
    /// Malformed netlist line
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown directive keyword
    #[error("Unknown directive '{directive}' at line {line}")]
    UnknownDirective { directive: String, line: usize },

    /// Numeric value that cannot be resolved, including unknown SI suffixes
    #[error("Invalid value '{value}' at line {line}")]
    InvalidValue { value: String, line: usize },

    // ============ Circuit Construction Errors ============
    /// A node driven by more than one gate
    #[error("Node '{node}' is already driven by gate '{existing}', cannot also be driven by '{gate}'")]
    DriverConflict {
        node: String,
        existing: String,
        gate: String,
    },

    /// Duplicate gate instance name
    #[error("Duplicate gate name '{name}'")]
    DuplicateGate { name: String },

    /// Gate built with the wrong terminal list
    #[error("Invalid gate '{name}': {message}")]
    InvalidGate { name: String, message: String },

    // ============ Physical Model Errors ============
    /// Parameter combination with no physical meaning (undefined log/sqrt,
    /// non-positive geometry or doping, supply too low for the delay model)
    #[error("Domain error in '{context}': {message}")]
    DomainError { context: String, message: String },

    /// No supply voltage from either the netlist or the configuration
    #[error("No supply voltage specified (use 'vcc <value>' or --vcc)")]
    MissingSupply,

    // ============ Structural Errors ============
    /// Feedback loop found while walking paths
    #[error("Combinational loop through node '{node}' (re-entered via gate '{gate}')")]
    CombinationalLoop { node: String, gate: String },

    /// Primary input that reaches no primary output
    #[error("Primary input '{node}' does not reach any primary output")]
    DanglingInput { node: String },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

/// Coarse classification of a [`DelayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Conflict,
    Domain,
    Structural,
    Io,
}

impl DelayError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a domain error
    pub fn domain(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DomainError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid gate error
    pub fn invalid_gate(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ParseError { .. } | Self::UnknownDirective { .. } | Self::InvalidValue { .. } => {
                ErrorKind::Parse
            }
            Self::DriverConflict { .. } | Self::DuplicateGate { .. } | Self::InvalidGate { .. } => {
                ErrorKind::Conflict
            }
            Self::DomainError { .. } | Self::MissingSupply => ErrorKind::Domain,
            Self::CombinationalLoop { .. } | Self::DanglingInput { .. } => ErrorKind::Structural,
            Self::FileReadError { .. } => ErrorKind::Io,
            #[cfg(feature = "wasm")]
            Self::WasmError { .. } => ErrorKind::Io,
        }
    }
}
