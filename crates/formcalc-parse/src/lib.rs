pub mod parser;
pub mod tokenizer;
pub mod types;

pub use parser::{AstNode, BinaryOp, Parser, ParserError, UnaryOp, parse};
pub use tokenizer::{Token, TokenKind, Tokenizer, TokenizerError, sanitize};
pub use types::ParsingError;

// Re-export common types
pub use formcalc_common::{EvalError, EvalErrorKind};
