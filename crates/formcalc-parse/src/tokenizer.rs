use std::error::Error;
use std::fmt::{self, Display};

const ALLOWED_PUNCT: &str = "+-*/()._ \t\r\n";

const fn build_allowed_table() -> [bool; 256] {
    let mut tbl = [false; 256];
    let mut c = b'0';
    while c <= b'9' {
        tbl[c as usize] = true;
        c += 1;
    }
    let mut c = b'a';
    while c <= b'z' {
        tbl[c as usize] = true;
        c += 1;
    }
    let mut c = b'A';
    while c <= b'Z' {
        tbl[c as usize] = true;
        c += 1;
    }
    let bytes = ALLOWED_PUNCT.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        tbl[bytes[i] as usize] = true;
        i += 1;
    }
    tbl
}
static ALLOWED_TABLE: [bool; 256] = build_allowed_table();

#[inline(always)]
fn is_allowed(c: u8) -> bool {
    ALLOWED_TABLE[c as usize]
}

/// Strip every character outside the formula allow-list (letters, digits,
/// `_`, `+ - * / ( ) .` and whitespace).
///
/// Stripping is not validation: it can leave a malformed expression
/// behind (`a || b` becomes `a  b`), which the parser then rejects.
/// Non-ASCII characters are stripped wholesale.
pub fn sanitize(expr: &str) -> String {
    expr.chars()
        .filter(|c| c.is_ascii() && is_allowed(*c as u8))
        .collect()
}

/// A custom error type for the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerError {
    pub message: String,
    pub pos: usize,
}

impl Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenizerError at {}: {}", self.pos, self.message)
    }
}

impl Error for TokenizerError {}

/// The kind of a token, carrying its payload where one exists.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Ident(s) => write!(f, "{s}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

/// A token with its byte span in the sanitized source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token { kind, start, end }
    }
}

/// Tokenizer over a sanitized formula string.
#[derive(Debug)]
pub struct Tokenizer {
    pub items: Vec<Token>,
}

impl Tokenizer {
    /// Tokenize `source`. The input is expected to be pre-sanitized; any
    /// byte outside the allow-list is reported as an error rather than
    /// skipped, so callers that bypass [`sanitize`] still get a defined
    /// outcome.
    pub fn new(source: &str) -> Result<Self, TokenizerError> {
        let bytes = source.as_bytes();
        let mut items = Vec::new();
        let mut pos = 0usize;

        while pos < bytes.len() {
            let b = bytes[pos];
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
                b'+' => {
                    items.push(Token::new(TokenKind::Plus, pos, pos + 1));
                    pos += 1;
                }
                b'-' => {
                    items.push(Token::new(TokenKind::Minus, pos, pos + 1));
                    pos += 1;
                }
                b'*' => {
                    items.push(Token::new(TokenKind::Star, pos, pos + 1));
                    pos += 1;
                }
                b'/' => {
                    items.push(Token::new(TokenKind::Slash, pos, pos + 1));
                    pos += 1;
                }
                b'(' => {
                    items.push(Token::new(TokenKind::LParen, pos, pos + 1));
                    pos += 1;
                }
                b')' => {
                    items.push(Token::new(TokenKind::RParen, pos, pos + 1));
                    pos += 1;
                }
                b'0'..=b'9' | b'.' => {
                    let start = pos;
                    while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                        pos += 1;
                    }
                    let text = &source[start..pos];
                    let value = text.parse::<f64>().map_err(|_| TokenizerError {
                        message: format!("invalid number literal '{text}'"),
                        pos: start,
                    })?;
                    items.push(Token::new(TokenKind::Number(value), start, pos));
                }
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                    let start = pos;
                    while pos < bytes.len()
                        && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                    {
                        pos += 1;
                    }
                    items.push(Token::new(
                        TokenKind::Ident(source[start..pos].to_string()),
                        start,
                        pos,
                    ));
                }
                other => {
                    return Err(TokenizerError {
                        message: format!("unexpected character '{}'", other as char),
                        pos,
                    });
                }
            }
        }

        Ok(Tokenizer { items })
    }
}
