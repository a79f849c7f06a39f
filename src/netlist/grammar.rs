//! Per-kind element grammar.
//!
//! Every element kind is described by one [`ElementGrammar`] entry: the id
//! prefix that selects it, and the shape of the rest of the line. Two shapes
//! exist:
//!
//! | Shape | Syntax |
//! |-------|--------|
//! | Columns | `<id> <node>... <value>...` |
//! | Bracketed | `<id> <node> <node> KEYWORD(<arg>, <arg> ...)` |
//!
//! | Kind | Syntax |
//! |------|--------|
//! | Resistor | `R<id> <n+> <n-> <resistance>` |
//! | Capacitor | `C<id> <n+> <n-> <capacitance>` |
//! | DC source | `V<id> <n+> <n-> <voltage>` |
//! | VCCS | `G<id> <out+> <out-> <ctrl+> <ctrl-> <g>` |
//! | Pulse source | `V<id> <n+> <n-> PULSE(v1 v2 td tr tf pw per)` |
//! | PWL source | `V<id> <n+> <n-> PWL(t1 v1 t2 v2 ...)` |
//! | Sine source | `V<id> <n+> <n-> SIN(vo va freq td damp phase)` |

use super::lexer::{Lexer, Token, TokenKind};
use super::value::parse_value;
use crate::circuit::GROUND_NAME;
use crate::error::{Result, SpiceletError};

/// Element kinds understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Resistor,
    Capacitor,
    DcSource,
    PulseSource,
    PwlSource,
    SinSource,
    Vccs,
}

/// How many bracketed arguments a kind takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// A non-empty list of (time, value) pairs
    Pairs,
}

/// Shape of an element line after the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Columns { nodes: usize, values: usize },
    Bracketed { keyword: &'static str, arity: Arity },
}

/// One row of the grammar table.
#[derive(Debug, Clone, Copy)]
pub struct ElementGrammar {
    pub kind: ElementKind,
    pub prefix: char,
    pub shape: Shape,
}

/// Nodes before the keyword of a bracketed source.
const BRACKETED_NODES: usize = 2;

/// The grammar table.
pub const GRAMMAR: &[ElementGrammar] = &[
    ElementGrammar {
        kind: ElementKind::Resistor,
        prefix: 'R',
        shape: Shape::Columns { nodes: 2, values: 1 },
    },
    ElementGrammar {
        kind: ElementKind::Capacitor,
        prefix: 'C',
        shape: Shape::Columns { nodes: 2, values: 1 },
    },
    ElementGrammar {
        kind: ElementKind::DcSource,
        prefix: 'V',
        shape: Shape::Columns { nodes: 2, values: 1 },
    },
    ElementGrammar {
        kind: ElementKind::PulseSource,
        prefix: 'V',
        shape: Shape::Bracketed {
            keyword: "PULSE",
            arity: Arity::Exactly(7),
        },
    },
    ElementGrammar {
        kind: ElementKind::PwlSource,
        prefix: 'V',
        shape: Shape::Bracketed {
            keyword: "PWL",
            arity: Arity::Pairs,
        },
    },
    ElementGrammar {
        kind: ElementKind::SinSource,
        prefix: 'V',
        shape: Shape::Bracketed {
            keyword: "SIN",
            arity: Arity::Exactly(6),
        },
    },
    ElementGrammar {
        kind: ElementKind::Vccs,
        prefix: 'G',
        shape: Shape::Columns { nodes: 4, values: 1 },
    },
];

/// An element line split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementLine {
    pub kind: ElementKind,
    pub id: String,
    /// User-visible terminals, ground aliases folded to "0"
    pub nodes: Vec<String>,
    pub args: Vec<f64>,
}

/// Split one comment-free element line according to the grammar table.
pub fn parse_element_line(text: &str, line: usize) -> Result<ElementLine> {
    let tokens = Lexer::new(text, line).tokenize()?;

    let id = match tokens.first() {
        Some(tok) if tok.kind == TokenKind::Word => tok.text.clone(),
        _ => {
            return Err(SpiceletError::UnknownElementType {
                element_type: text.to_string(),
                line,
            })
        }
    };
    let invalid = |message: String| SpiceletError::invalid_element(line, &id, text, message);

    let prefix = id
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    let bracket_keyword = bracketed_keyword(&tokens);

    let grammar = GRAMMAR
        .iter()
        .filter(|g| g.prefix == prefix)
        .find(|g| match (g.shape, bracket_keyword) {
            (Shape::Columns { .. }, None) => true,
            (Shape::Bracketed { keyword, .. }, Some(found)) => keyword.eq_ignore_ascii_case(found),
            _ => false,
        })
        .ok_or_else(|| SpiceletError::UnknownElementType {
            element_type: bracket_keyword.unwrap_or(id.as_str()).to_string(),
            line,
        })?;

    match grammar.shape {
        Shape::Columns { nodes, values } => {
            let words = tokens[1..]
                .iter()
                .map(|tok| {
                    if tok.kind == TokenKind::Word {
                        Ok(tok.text.as_str())
                    } else {
                        Err(invalid(format!("unexpected '{}'", tok.text)))
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            if words.len() != nodes + values {
                return Err(invalid(format!(
                    "mismatch in number of arguments ({} given, {} required)",
                    words.len(),
                    nodes + values
                )));
            }

            let args = words[nodes..]
                .iter()
                .map(|word| parse_number(word).map_err(&invalid))
                .collect::<Result<Vec<_>>>()?;

            Ok(ElementLine {
                kind: grammar.kind,
                id: id.clone(),
                nodes: words[..nodes].iter().map(|w| fold_ground(w)).collect(),
                args,
            })
        }

        Shape::Bracketed { keyword, arity } => {
            let nodes = tokens[1..=BRACKETED_NODES]
                .iter()
                .map(|tok| fold_ground(&tok.text))
                .collect();

            // tokens: id n+ n- KEYWORD ( ... )
            let inner = &tokens[BRACKETED_NODES + 3..tokens.len() - 1];
            let args = inner
                .iter()
                .filter(|tok| tok.kind != TokenKind::Comma)
                .map(|tok| {
                    if tok.kind == TokenKind::Word {
                        parse_number(&tok.text).map_err(&invalid)
                    } else {
                        Err(invalid(format!("unexpected '{}' in {} options", tok.text, keyword)))
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            match arity {
                Arity::Exactly(n) if args.len() != n => {
                    return Err(invalid(format!(
                        "the number of options for {} must be {} ({} given)",
                        keyword,
                        n,
                        args.len()
                    )));
                }
                Arity::Pairs if args.is_empty() || args.len() % 2 != 0 => {
                    return Err(invalid(format!(
                        "the number of options for {} must be even and non-zero ({} given)",
                        keyword,
                        args.len()
                    )));
                }
                _ => {}
            }

            Ok(ElementLine {
                kind: grammar.kind,
                id: id.clone(),
                nodes,
                args,
            })
        }
    }
}

/// If the tokens have the form `id n+ n- KEYWORD ( ... )`, return KEYWORD.
fn bracketed_keyword(tokens: &[Token]) -> Option<&str> {
    let keyword_pos = BRACKETED_NODES + 1;
    if tokens.len() < keyword_pos + 3 {
        return None;
    }
    let all_words = tokens[..=keyword_pos]
        .iter()
        .all(|tok| tok.kind == TokenKind::Word);
    let opens = tokens[keyword_pos + 1].kind == TokenKind::OpenParen;
    let closes = tokens.last().map(|tok| tok.kind) == Some(TokenKind::CloseParen);

    if all_words && opens && closes {
        Some(tokens[keyword_pos].text.as_str())
    } else {
        None
    }
}

fn parse_number(word: &str) -> std::result::Result<f64, String> {
    parse_value(word).ok_or_else(|| format!("argument '{}' is not a valid numeric format", word))
}

/// Map ground aliases onto the ground node name.
pub fn fold_ground(name: &str) -> String {
    if name.eq_ignore_ascii_case("gnd") {
        GROUND_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_line() {
        let line = parse_element_line("R1 in gnd 10k", 1).unwrap();
        assert_eq!(line.kind, ElementKind::Resistor);
        assert_eq!(line.id, "R1");
        assert_eq!(line.nodes, vec!["in", "0"]);
        assert_eq!(line.args, vec![10_000.0]);
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let line = parse_element_line("c2 a b 1u", 1).unwrap();
        assert_eq!(line.kind, ElementKind::Capacitor);
    }

    #[test]
    fn test_vccs_line() {
        let line = parse_element_line("G1 out 0 ctl 0 2m", 1).unwrap();
        assert_eq!(line.kind, ElementKind::Vccs);
        assert_eq!(line.nodes.len(), 4);
        assert_eq!(line.args, vec![2e-3]);
    }

    #[test]
    fn test_bracketed_sources() {
        let line = parse_element_line("V1 a 0 PULSE(0 5 0 1n 1n 5m 10m)", 1).unwrap();
        assert_eq!(line.kind, ElementKind::PulseSource);
        assert_eq!(line.args.len(), 7);

        let line = parse_element_line("V2 a 0 pwl (0, 0, 1, 10)", 1).unwrap();
        assert_eq!(line.kind, ElementKind::PwlSource);
        assert_eq!(line.args, vec![0.0, 0.0, 1.0, 10.0]);

        let line = parse_element_line("V3 a 0 SIN(0 1 50 0 0 0)", 1).unwrap();
        assert_eq!(line.kind, ElementKind::SinSource);
    }

    #[test]
    fn test_dc_source_line() {
        let line = parse_element_line("VDD vdd 0 5", 1).unwrap();
        assert_eq!(line.kind, ElementKind::DcSource);
        assert_eq!(line.args, vec![5.0]);
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = parse_element_line("R1 a b", 12).unwrap_err();
        match err {
            SpiceletError::InvalidElement {
                line,
                element,
                text,
                message,
            } => {
                assert_eq!(line, 12);
                assert_eq!(element, "R1");
                assert_eq!(text, "R1 a b");
                assert!(message.contains("2 given, 3 required"));
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(parse_element_line("V1 a 0 SIN(0 1 50)", 1).is_err());
        assert!(parse_element_line("V1 a 0 PWL(0 1 2)", 1).is_err());
    }

    #[test]
    fn test_bad_number() {
        let err = parse_element_line("C1 a b 1x", 3).unwrap_err();
        assert!(matches!(err, SpiceletError::InvalidElement { line: 3, .. }));
        assert!(parse_element_line("V1 a 0 PULSE(0 5 0 1n 1n 5m abc)", 1).is_err());
    }

    #[test]
    fn test_unknown_kinds() {
        assert!(matches!(
            parse_element_line("Q1 c b e model", 2).unwrap_err(),
            SpiceletError::UnknownElementType { line: 2, .. }
        ));
        assert!(matches!(
            parse_element_line("V1 a 0 EXP(0 1 2 3)", 2).unwrap_err(),
            SpiceletError::UnknownElementType { .. }
        ));
    }
}
