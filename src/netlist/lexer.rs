//! Lexer (tokenizer) for netlist lines.
//!
//! The reader strips comments and splits the netlist into lines before
//! lexing, so the lexer works on one line at a time and never sees a
//! newline.

use crate::error::{SpiceletError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word: element id, node name, number or keyword
    Word,
    /// A directive (starts with '.')
    Directive,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Comma separating bracketed arguments
    Comma,
    /// Equals sign '='
    Equals,
}

/// Lexer for tokenizing a single netlist line.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for one line of input.
    pub fn new(input: &'a str, line: usize) -> Self {
        Self {
            chars: input.chars().peekable(),
            line,
            column: 1,
        }
    }

    /// Tokenize the whole line.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get the next token, or None at end of line.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        let column = self.column;

        let single = |kind: TokenKind, text: &str| Token {
            kind,
            text: text.to_string(),
            column,
        };

        let token = match ch {
            '(' => {
                self.advance();
                single(TokenKind::OpenParen, "(")
            }
            ')' => {
                self.advance();
                single(TokenKind::CloseParen, ")")
            }
            ',' => {
                self.advance();
                single(TokenKind::Comma, ",")
            }
            '=' => {
                self.advance();
                single(TokenKind::Equals, "=")
            }
            '.' if column == 1 => {
                self.advance();
                let text = self.read_word();
                if text.is_empty() {
                    return Err(SpiceletError::lexer(self.line, column, "empty directive"));
                }
                Token {
                    kind: TokenKind::Directive,
                    text: format!(".{}", text),
                    column,
                }
            }
            _ if is_word_char(ch) => Token {
                kind: TokenKind::Word,
                text: self.read_word(),
                column,
            },
            _ => {
                return Err(SpiceletError::lexer(
                    self.line,
                    column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(Some(token))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_word_char(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

/// Characters allowed in ids, node names and numbers.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '+' | '-' | 'µ')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_columns() {
        let tokens = Lexer::new("R1 in out 10k", 1).tokenize().unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Word));
        assert_eq!(tokens[0].text, "R1");
        assert_eq!(tokens[3].text, "10k");
        assert_eq!(tokens[1].column, 4);
    }

    #[test]
    fn test_lexer_bracketed_source() {
        let tokens = Lexer::new("V1 a 0 PULSE(0, 5 1e-3)", 1).tokenize().unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::OpenParen,
                TokenKind::Word,
                TokenKind::Comma,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::CloseParen,
            ]
        );
        assert_eq!(tokens[8].text, "1e-3");
    }

    #[test]
    fn test_lexer_directive() {
        let tokens = Lexer::new(".option gmin=1e-12", 1).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, ".option");
        assert_eq!(tokens[2].kind, TokenKind::Equals);
    }

    #[test]
    fn test_lexer_rejects_reserved_character() {
        let err = Lexer::new("R1 a#branch 0 1k", 4).tokenize().unwrap_err();
        assert!(matches!(err, SpiceletError::LexerError { line: 4, column: 5, .. }));
    }
}
