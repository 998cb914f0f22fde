use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::types::ParsingError;

use std::error::Error;
use std::fmt::{self, Display};

/// A custom error type for the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    pub message: String,
    pub position: Option<usize>,
}

impl ParserError {
    fn new<S: Into<String>>(message: S, position: Option<usize>) -> Self {
        ParserError {
            message: message.into(),
            position,
        }
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "ParserError at position {}: {}", pos, self.message)
        } else {
            write!(f, "ParserError: {}", self.message)
        }
    }
}

impl Error for ParserError {}

/// Binary arithmetic operators, conventional precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Precedence level; higher binds tighter. All four are
    /// left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Add | BinaryOp::Sub => 1,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        })
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
}

/// A node in the formula AST.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Literal(f64),
    Variable(String),
    UnaryOp {
        op: UnaryOp,
        expr: Box<AstNode>,
    },
    BinaryOp {
        op: BinaryOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
}

/// Recursive-descent parser (precedence climbing) over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<AstNode, ParserError> {
        if self.tokens.is_empty() {
            return Err(ParserError::new("empty expression", None));
        }
        let node = self.parse_expression(0)?;
        if let Some(tok) = self.peek() {
            return Err(ParserError::new(
                format!("unexpected token '{}'", tok.kind),
                Some(tok.start),
            ));
        }
        Ok(node)
    }

    fn parse_expression(&mut self, min_precedence: u8) -> Result<AstNode, ParserError> {
        let mut left = self.parse_prefix()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_precedence {
                break;
            }
            self.advance();
            // Left-associative: the right-hand side must bind strictly
            // tighter.
            let right = self.parse_expression(prec + 1)?;
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<AstNode, ParserError> {
        let tok = self
            .peek()
            .cloned()
            .ok_or_else(|| ParserError::new("unexpected end of expression", None))?;

        match tok.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(AstNode::Literal(n))
            }
            TokenKind::Ident(ref name) => {
                self.advance();
                Ok(AstNode::Variable(name.clone()))
            }
            TokenKind::Plus => {
                self.advance();
                let expr = self.parse_prefix()?;
                Ok(AstNode::UnaryOp {
                    op: UnaryOp::Plus,
                    expr: Box::new(expr),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let expr = self.parse_prefix()?;
                Ok(AstNode::UnaryOp {
                    op: UnaryOp::Neg,
                    expr: Box::new(expr),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression(0)?;
                match self.peek() {
                    Some(t) if t.kind == TokenKind::RParen => {
                        self.advance();
                        Ok(expr)
                    }
                    Some(t) => Err(ParserError::new(
                        format!("expected ')', found '{}'", t.kind),
                        Some(t.start),
                    )),
                    None => Err(ParserError::new("unbalanced parenthesis", Some(tok.start))),
                }
            }
            TokenKind::RParen | TokenKind::Star | TokenKind::Slash => Err(ParserError::new(
                format!("unexpected token '{}'", tok.kind),
                Some(tok.start),
            )),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Plus) => Some(BinaryOp::Add),
            Some(TokenKind::Minus) => Some(BinaryOp::Sub),
            Some(TokenKind::Star) => Some(BinaryOp::Mul),
            Some(TokenKind::Slash) => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn advance(&mut self) {
        self.current += 1;
    }
}

/// Sanitize, tokenize and parse `expr` in one step.
pub fn parse(expr: &str) -> Result<AstNode, ParsingError> {
    let sanitized = crate::tokenizer::sanitize(expr);
    let tokenizer = Tokenizer::new(&sanitized)?;
    let mut parser = Parser::new(tokenizer.items);
    Ok(parser.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(op: BinaryOp, left: AstNode, right: AstNode) -> AstNode {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn parses_precedence() {
        // 1 + 2 * 3 => 1 + (2 * 3)
        let ast = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            ast,
            bin(
                BinaryOp::Add,
                AstNode::Literal(1.0),
                bin(BinaryOp::Mul, AstNode::Literal(2.0), AstNode::Literal(3.0)),
            )
        );
    }

    #[test]
    fn parses_left_associativity() {
        // 10 - 4 - 3 => (10 - 4) - 3
        let ast = parse("10 - 4 - 3").unwrap();
        assert_eq!(
            ast,
            bin(
                BinaryOp::Sub,
                bin(
                    BinaryOp::Sub,
                    AstNode::Literal(10.0),
                    AstNode::Literal(4.0)
                ),
                AstNode::Literal(3.0),
            )
        );
    }

    #[test]
    fn parses_parentheses_and_variables() {
        let ast = parse("(a + b) * iva").unwrap();
        assert_eq!(
            ast,
            bin(
                BinaryOp::Mul,
                bin(
                    BinaryOp::Add,
                    AstNode::Variable("a".into()),
                    AstNode::Variable("b".into())
                ),
                AstNode::Variable("iva".into()),
            )
        );
    }

    #[test]
    fn parses_unary_minus() {
        let ast = parse("-a + 3").unwrap();
        assert_eq!(
            ast,
            bin(
                BinaryOp::Add,
                AstNode::UnaryOp {
                    op: UnaryOp::Neg,
                    expr: Box::new(AstNode::Variable("a".into())),
                },
                AstNode::Literal(3.0),
            )
        );
    }

    #[test]
    fn rejects_adjacent_operands() {
        // What "(a || b)" degrades into after sanitization.
        assert!(parse("(a  b)").is_err());
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert!(parse("(1 + 2").is_err());
        assert!(parse("1 + 2)").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("&&").is_err()); // sanitizes to nothing
    }

    #[test]
    fn rejects_trailing_operator() {
        assert!(parse("1 +").is_err());
        assert!(parse("* 2").is_err());
    }

    mod properties {
        use super::super::parse;
        use proptest::prelude::*;

        proptest! {
            // Arbitrary input, hostile or not, must never panic: it either
            // parses or returns an error.
            #[test]
            fn parse_never_panics(input in ".{0,64}") {
                let _ = parse(&input);
            }

            #[test]
            fn numeric_literals_round_trip(n in 0.0f64..1e9) {
                let ast = parse(&format!("{n}")).unwrap();
                prop_assert_eq!(ast, super::super::AstNode::Literal(n));
            }
        }
    }
}
