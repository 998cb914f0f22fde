//! Evaluation-pipeline error representation.
//!
//! - **`EvalErrorKind`** : which stage of the pipeline rejected the input
//! - **`EvalError`**     : kind + optional human explanation
//!
//! These errors are internal to formula evaluation: the public evaluator
//! collapses every one of them to `0.0` (the engine's fail-to-zero
//! contract), so they only surface through the checked API and in logs.

use std::{error::Error, fmt};

/// The stage (or cause) of an evaluation failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    /// The expression could not be tokenized.
    Tokenize,
    /// The token stream is not a well-formed arithmetic expression.
    Parse,
    /// An identifier could not be resolved (currently unused: unknown
    /// names coerce to zero, but ports of stricter dialects need it).
    Name,
    /// The result was not representable as a finite number.
    Value,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tokenize => "tokenize",
            Self::Parse => "parse",
            Self::Name => "name",
            Self::Value => "value",
        })
    }
}

/// The single error struct the evaluation pipeline passes around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: Option<String>,
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }
}

impl EvalError {
    /// Basic constructor (no message).
    pub fn new(kind: EvalErrorKind) -> Self {
        kind.into()
    }

    /// Attach a human-readable explanation.
    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl Error for EvalError {}
