//! Error types for the Spicelet circuit simulator.
//!
//! This module provides a unified error type [`SpiceletError`] that covers
//! every failure that can occur while reading a netlist, configuring an
//! analysis and solving a circuit. Each variant belongs to exactly one
//! [`ErrorKind`], which decides the scope the error is fatal for:
//!
//! - [`ErrorKind::Syntax`] aborts the netlist being read,
//! - [`ErrorKind::Structural`] aborts the run of one environment variant,
//! - [`ErrorKind::Configuration`] aborts before any solve happens.

use thiserror::Error;

/// Result type alias using [`SpiceletError`].
pub type Result<T> = std::result::Result<T, SpiceletError>;

/// Broad classification of a [`SpiceletError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed netlist or element text.
    Syntax,
    /// Singular or empty system at solve time.
    Structural,
    /// Missing or invalid simulation options.
    Configuration,
    /// Failure reading input.
    Io,
}

/// Unified error type for all Spicelet operations.
#[derive(Error, Debug)]
pub enum SpiceletError {
    // ============ Syntax Errors ============
    /// Error during lexical analysis of a line
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Malformed element line (wrong argument count, bad number, ...)
    #[error("Syntax error at line {line} in element '{element}': {message}\n    {text}")]
    InvalidElement {
        line: usize,
        element: String,
        text: String,
        message: String,
    },

    /// Element prefix or source type that no element kind claims
    #[error("Unknown element type '{element_type}' at line {line}")]
    UnknownElementType { element_type: String, line: usize },

    /// Directive that the netlist reader does not understand
    #[error("Unknown directive '{directive}' at line {line}")]
    UnknownDirective { directive: String, line: usize },

    /// Directive with missing or malformed arguments
    #[error("Invalid directive '{directive}' at line {line}: {message}")]
    InvalidDirective {
        line: usize,
        directive: String,
        message: String,
    },

    /// Two elements registered under the same id
    #[error("Duplicate element id '{id}'")]
    DuplicateElement { id: String },

    // ============ Structural Errors ============
    /// Matrix is singular and cannot be solved
    #[error(
        "Singular matrix in variant {variant} at step {step} (t = {time:.6e}s) - \
         circuit may have a floating node or conflicting sources"
    )]
    SingularMatrix {
        variant: usize,
        step: usize,
        time: f64,
    },

    /// Nothing to solve for
    #[error("Variant {variant} has no unknowns to solve for")]
    EmptyCircuit { variant: usize },

    // ============ Configuration Errors ============
    /// Transient analysis without a step size or end time
    #[error("Transient analysis requires {missing}")]
    MissingTransientParam { missing: &'static str },

    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    /// Probe text that is neither `V(x)` nor `I(x)`
    #[error("Invalid probe '{text}' (expected V(node) or I(element))")]
    InvalidProbe { text: String },

    // ============ I/O Errors ============
    /// Error reading the netlist file
    #[error("Failed to read netlist '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SpiceletError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an invalid element error
    pub fn invalid_element(
        line: usize,
        element: impl Into<String>,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidElement {
            line,
            element: element.into(),
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create an invalid simulation parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidSimulationParam {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LexerError { .. }
            | Self::InvalidElement { .. }
            | Self::UnknownElementType { .. }
            | Self::UnknownDirective { .. }
            | Self::InvalidDirective { .. }
            | Self::DuplicateElement { .. } => ErrorKind::Syntax,
            Self::SingularMatrix { .. } | Self::EmptyCircuit { .. } => ErrorKind::Structural,
            Self::MissingTransientParam { .. }
            | Self::InvalidSimulationParam { .. }
            | Self::InvalidProbe { .. } => ErrorKind::Configuration,
            Self::FileReadError { .. } => ErrorKind::Io,
        }
    }
}
