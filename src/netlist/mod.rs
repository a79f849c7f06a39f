//! Netlist reader for SPICE-style circuit descriptions.
//!
//! The format is line-oriented. Everything after a `*` is a comment, lines
//! starting with `.` are directives and every other non-empty line is an
//! element.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist   = { line }
//! line      = [ directive | element ] [ '*' { any_char } ]
//! directive = ".tran" step end
//!           | ".op"
//!           | ".print" probe { probe }
//!           | ".option" key '=' value { key '=' value }
//!           | ".alter"
//!           | ".end"
//! probe     = ('V' | 'I') '(' name ')'
//! ```
//!
//! Element lines are described in [`grammar`], numbers in [`value`].
//!
//! # Example
//!
//! ```text
//! * RC low-pass
//! V1 in 0 PULSE(0 5 0 1n 1n 5m 10m)
//! R1 in out 1k
//! C1 out 0 1u
//! .tran 10u 20m
//! .print V(out) I(V1)
//! .alter
//! R1 in out 2k
//! .end
//! ```

pub mod grammar;
mod lexer;
mod parser;
pub mod value;

pub use grammar::{fold_ground, parse_element_line, ElementKind, ElementLine};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use value::parse_value;

use std::path::Path;

use crate::error::{Result, SpiceletError};
use crate::session::Session;

/// Parse netlist text into a session.
pub fn parse(input: &str) -> Result<Session> {
    Parser::new(input).parse()
}

/// Read and parse a netlist file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Session> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| SpiceletError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    parse(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_file("/nonexistent/spicelet/netlist.cir").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
