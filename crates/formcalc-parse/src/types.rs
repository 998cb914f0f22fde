use std::fmt::{self, Display};

use crate::parser::ParserError;
use crate::tokenizer::TokenizerError;

/// Either stage of the sanitize → tokenize → parse pipeline can fail;
/// [`crate::parse`] funnels both into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsingError {
    Tokenizer(TokenizerError),
    Parser(ParserError),
}

impl From<TokenizerError> for ParsingError {
    fn from(e: TokenizerError) -> Self {
        ParsingError::Tokenizer(e)
    }
}

impl From<ParserError> for ParsingError {
    fn from(e: ParserError) -> Self {
        ParsingError::Parser(e)
    }
}

impl Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingError::Tokenizer(e) => write!(f, "{e}"),
            ParsingError::Parser(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ParsingError {}
