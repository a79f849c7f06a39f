//! Line-oriented netlist reader.

use super::grammar::parse_element_line;
use super::lexer::{Lexer, Token, TokenKind};
use super::value::parse_value;
use crate::elements::Element;
use crate::error::{Result, SpiceletError};
use crate::session::Session;
use crate::solver::{Mode, ProbeRequest};

/// Reads a whole netlist into a [`Session`].
pub struct Parser<'a> {
    input: &'a str,
    session: Session,
}

impl<'a> Parser<'a> {
    /// Create a parser over the netlist text.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            session: Session::new(),
        }
    }

    /// Parse every line, stopping early at `.end`.
    pub fn parse(mut self) -> Result<Session> {
        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            let text = strip_comment(raw).trim();
            if text.is_empty() {
                continue;
            }

            if text.starts_with('.') {
                let tokens = Lexer::new(text, line).tokenize()?;
                if !self.parse_directive(&tokens, line)? {
                    break;
                }
            } else {
                let parsed = parse_element_line(text, line)?;
                let element = Element::from_line(parsed, text, line)?;
                self.session.add_element(element)?;
            }
        }

        Ok(self.session)
    }

    /// Apply one directive. Returns false when reading should stop.
    fn parse_directive(&mut self, tokens: &[Token], line: usize) -> Result<bool> {
        let name = tokens[0].text.to_ascii_lowercase();
        let args = &tokens[1..];
        let invalid = |message: &str| SpiceletError::InvalidDirective {
            line,
            directive: name.clone(),
            message: message.to_string(),
        };

        match name.as_str() {
            ".tran" => {
                let values = args
                    .iter()
                    .map(|tok| match tok.kind {
                        TokenKind::Word => parse_value(&tok.text),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid("expected numeric step and end time"))?;
                match values.as_slice() {
                    [step_size, end_time] => {
                        let options = self.session.options_mut();
                        *options = options.clone().with_transient(*step_size, *end_time);
                    }
                    [] => {
                        return Err(SpiceletError::MissingTransientParam {
                            missing: "a step size",
                        })
                    }
                    [_] => {
                        return Err(SpiceletError::MissingTransientParam {
                            missing: "an end time",
                        })
                    }
                    _ => return Err(invalid("expected exactly a step size and an end time")),
                }
            }

            ".op" => {
                let options = self.session.options_mut();
                *options = options.clone().with_mode(Mode::OperatingPoint);
            }

            ".print" => {
                if args.is_empty() {
                    return Err(invalid("expected at least one probe"));
                }
                for probe in parse_probes(args)? {
                    self.session.add_probe(probe);
                }
            }

            ".option" | ".options" => {
                self.parse_options(args, line)?;
            }

            ".alter" => self.session.alter(),

            ".end" => return Ok(false),

            _ => {
                return Err(SpiceletError::UnknownDirective {
                    directive: tokens[0].text.clone(),
                    line,
                })
            }
        }

        Ok(true)
    }

    fn parse_options(&mut self, args: &[Token], line: usize) -> Result<()> {
        let invalid = |message: String| SpiceletError::InvalidDirective {
            line,
            directive: ".option".to_string(),
            message,
        };

        if args.is_empty() || args.len() % 3 != 0 {
            return Err(invalid("expected key=value pairs".to_string()));
        }

        for chunk in args.chunks_exact(3) {
            let [key, eq, value] = chunk else {
                continue;
            };
            if key.kind != TokenKind::Word || eq.kind != TokenKind::Equals {
                return Err(invalid(format!("expected key=value near '{}'", key.text)));
            }

            match key.text.to_ascii_lowercase().as_str() {
                "gmin" => {
                    let gmin = parse_value(&value.text)
                        .ok_or_else(|| invalid(format!("invalid gmin '{}'", value.text)))?;
                    let options = self.session.options_mut();
                    *options = options.clone().with_gmin(gmin);
                }
                other => log::warn!("line {}: ignoring unknown option '{}'", line, other),
            }
        }

        Ok(())
    }
}

/// Everything before the first `*` on a line.
fn strip_comment(raw: &str) -> &str {
    raw.split('*').next().unwrap_or("")
}

/// Split `.print` arguments into probes: `V(a) I(V1) ...`.
fn parse_probes(args: &[Token]) -> Result<Vec<ProbeRequest>> {
    let mut probes: Vec<ProbeRequest> = Vec::new();
    let mut rest = args;

    while !rest.is_empty() {
        match rest {
            [tag, open, inner, close, tail @ ..]
                if tag.kind == TokenKind::Word
                    && open.kind == TokenKind::OpenParen
                    && inner.kind == TokenKind::Word
                    && close.kind == TokenKind::CloseParen =>
            {
                probes.push(format!("{}({})", tag.text, inner.text).parse()?);
                rest = tail;
            }
            _ => {
                return Err(SpiceletError::InvalidProbe {
                    text: rest[0].text.clone(),
                })
            }
        }
    }

    Ok(probes)
}
