// Formula parser - converts formula text (without the leading '=') into an AST
// Supports: numbers, cell refs (A1), #REF!, parentheses, unary +/-, and + - * /

use super::ParseError;
use super::ast::{BinaryOp, Expr, UnaryOp};
use crate::engine::Position;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

pub(crate) fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty formula", 0));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: input.len(),
    };
    let expr = parser.parse_expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ParseError::new(
            format!("unexpected {:?} after expression", extra.token),
            extra.offset,
        ));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'#' => {
                if input[i..].starts_with("#REF!") {
                    i += "#REF!".len();
                    tokens.push(Spanned {
                        token: Token::Cell(Position::NONE),
                        offset: start,
                    });
                    continue;
                }
                return Err(ParseError::new("unknown error literal", start));
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &input[start..i];
                let n: f64 = text
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid number '{}'", text), start))?;
                if !n.is_finite() {
                    return Err(ParseError::new(format!("number out of range '{}'", text), start));
                }
                tokens.push(Spanned {
                    token: Token::Number(n),
                    offset: start,
                });
                continue;
            }
            b'A'..=b'Z' => {
                while i < bytes.len() && bytes[i].is_ascii_uppercase() {
                    i += 1;
                }
                let letters_end = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i == letters_end {
                    return Err(ParseError::new(
                        format!("expected row number after '{}'", &input[start..i]),
                        i,
                    ));
                }
                // Out-of-range references parse but resolve to #REF!.
                let pos = Position::from_a1(&input[start..i]).unwrap_or(Position::NONE);
                tokens.push(Spanned {
                    token: Token::Cell(pos),
                    offset: start,
                });
                continue;
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(ParseError::new(format!("unexpected character '{}'", ch), start));
            }
        };
        tokens.push(Spanned {
            token,
            offset: start,
        });
        i += 1;
    }

    Ok(tokens)
}

/// Returns the end offset of a numeric literal starting at `i`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.eat(&Token::Plus) {
                BinaryOp::Add
            } else if self.eat(&Token::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.eat(&Token::Star) {
                BinaryOp::Mul
            } else if self.eat(&Token::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = if self.eat(&Token::Plus) {
            UnaryOp::Plus
        } else if self.eat(&Token::Minus) {
            UnaryOp::Minus
        } else {
            return self.parse_primary();
        };
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let end = self.end;
        let Some(spanned) = self.advance() else {
            return Err(ParseError::new("unexpected end of formula", end));
        };
        let offset = spanned.offset;
        match spanned.token.clone() {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Cell(pos) => Ok(Expr::Cell(pos)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    let at = self.peek().map_or(self.end, |t| t.offset);
                    Err(ParseError::new("expected ')'", at))
                }
            }
            other => Err(ParseError::new(format!("unexpected {:?}", other), offset)),
        }
    }
}
