//! Error types shared by the parsing pipeline.
//!
//! Line-level failures ([`ParseError`]) are turned into `Error` commands by
//! the parser so the rest of a section still parses. Block-structure
//! failures ([`FoldError`]) need cross-line state and invalidate the whole
//! section. [`ScriptError`] covers loading script files from disk.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::command::CommandKind;

/// Allowed argument count of a command or sub-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
    /// One of two exact counts, e.g. `Math,Rand`.
    Either(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => min <= count && count <= max,
            Arity::AtLeast(min) => min <= count,
            Arity::Either(a, b) => count == a || count == b,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "must have [{}] arguments", n),
            Arity::Range(min, max) => write!(f, "can have [{}] ~ [{}] arguments", min, max),
            Arity::AtLeast(min) => write!(f, "must have at least [{}] arguments", min),
            Arity::Either(a, b) => write!(f, "must have [{}] or [{}] arguments", a, b),
        }
    }
}

/// Errors raised while tokenizing or parsing a single statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A quoted argument has no closing quote.
    #[error("Double-quote's number should be an even number")]
    UnterminatedQuote,

    /// The raw line contains an odd number of `"` characters.
    #[error("Double-quote's number should be even")]
    OddQuoteCount,

    /// Something other than whitespace follows a closing quote.
    #[error("Syntax error")]
    TrailingAfterQuote,

    #[error("Invalid CodeType [{0}], Only alphabet, number and underscore can be used as CodeType")]
    InvalidKindToken(String),

    #[error("Last command of a section cannot end with '\\'")]
    DanglingContinuation,

    #[error("Valid command should be placed after '\\'")]
    EmptyContinuation,

    /// Argument count outside the allowed range.
    #[error("Command [{command}] {arity}")]
    Arity { command: String, arity: Arity },

    #[error("Flag [{0}] cannot be duplicated")]
    DuplicateFlag(String),

    #[error("Argument <{0}> cannot be duplicated")]
    DuplicateKeyword(String),

    /// A trailing token is neither a known flag nor a known `Key=` argument.
    #[error("Invalid optional argument or flag [{0}]")]
    UnknownOption(String),

    #[error("[{0}] is not a valid variable name")]
    InvalidVariable(String),

    #[error("[{0}] is not a valid bit size")]
    InvalidBitSize(String),

    #[error("[{0}] is not a valid number")]
    InvalidNumber(String),

    /// A sub-kind or enumeration token contains forbidden characters.
    #[error("Wrong {label} [{token}], Only alphabet and underscore can be used as {label}")]
    InvalidKeywordToken { label: &'static str, token: String },

    /// A sub-kind or enumeration token is not a member of its table.
    #[error("Invalid {label} [{token}]")]
    UnknownKeyword { label: &'static str, token: String },

    #[error("Unable to parse BranchCondition from empty arguments")]
    EmptyCondition,

    #[error("BranchCondition [{predicate}] must have at least [{min}] arguments")]
    ConditionArity { predicate: String, min: usize },

    #[error("Branch condition [Not] cannot be duplicated")]
    DuplicateNot,

    #[error("Incorrect branch condition [{0}]")]
    UnknownOperator(String),

    #[error("Incorrect branch condition")]
    IncorrectCondition,

    /// Any other command-specific semantic check.
    #[error("{0}")]
    Invalid(String),
}

impl ParseError {
    pub(crate) fn arity(command: impl Into<String>, arity: Arity) -> Self {
        ParseError::Arity { command: command.into(), arity }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ParseError::Invalid(message.into())
    }
}

/// Errors raised while folding `If`/`Else`/`Begin`/`End` into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    #[error("[Begin] must be matched with [End]")]
    UnmatchedBegin { raw: String, line: usize },

    #[error("[Else] must be used after [If]")]
    OrphanElse { raw: String, line: usize },

    /// `Else`, `End` or `Comment` used as the body of an `If`/`Else`.
    #[error("{kind} cannot be used with [{parent}]")]
    InvalidEmbedded {
        kind: CommandKind,
        parent: CommandKind,
        raw: String,
        line: usize,
    },
}

impl FoldError {
    /// Raw text of the command that broke the block structure.
    pub fn raw(&self) -> &str {
        match self {
            FoldError::UnmatchedBegin { raw, .. }
            | FoldError::OrphanElse { raw, .. }
            | FoldError::InvalidEmbedded { raw, .. } => raw,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            FoldError::UnmatchedBegin { line, .. }
            | FoldError::OrphanElse { line, .. }
            | FoldError::InvalidEmbedded { line, .. } => *line,
        }
    }
}

/// Errors raised while loading a script file.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Script file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Section [{0}] does not exist")]
    SectionNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        let err = ParseError::arity("FileCopy", Arity::Range(2, 5));
        assert_eq!(err.to_string(), "Command [FileCopy] can have [2] ~ [5] arguments");

        let err = ParseError::arity("Math,Rand", Arity::Either(1, 3));
        assert_eq!(err.to_string(), "Command [Math,Rand] must have [1] or [3] arguments");

        let err = ParseError::arity("Run", Arity::AtLeast(2));
        assert_eq!(err.to_string(), "Command [Run] must have at least [2] arguments");
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::Range(1, 3).accepts(1));
        assert!(Arity::Range(1, 3).accepts(3));
        assert!(!Arity::Range(1, 3).accepts(0));
        assert!(Arity::AtLeast(4).accepts(40));
        assert!(Arity::Either(1, 3).accepts(3));
        assert!(!Arity::Either(1, 3).accepts(2));
    }

    #[test]
    fn test_fold_error_location() {
        let err = FoldError::OrphanElse { raw: "Else,Echo,A".to_string(), line: 7 };
        assert_eq!(err.raw(), "Else,Echo,A");
        assert_eq!(err.line(), 7);
        assert_eq!(err.to_string(), "[Else] must be used after [If]");
    }
}
