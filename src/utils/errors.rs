//! Error types for the analyzer.
//!
//! Each stage has its own error struct plus a kind enum. Stage errors are
//! diagnostics, not failures: they are collected and the pipeline keeps
//! going. The only fatal condition is [`AnalyzeError::ResourceExceeded`].

use crate::utils::location::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fatal analyzer failure. Stage diagnostics never take this path.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// A token or node count bound was exceeded on pathological input.
    #[error("resource limit exceeded: {0}")]
    ResourceExceeded(String),

    /// I/O error (CLI file handling only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline entry points.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// The analysis stage a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Lexical scanning
    Lexical,
    /// Parsing
    Syntactic,
    /// Semantic checking
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexical => write!(f, "lexical"),
            Stage::Syntactic => write!(f, "syntactic"),
            Stage::Semantic => write!(f, "semantic"),
        }
    }
}

/// Error found during lexical scanning.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct LexicalError {
    /// Human-readable message
    pub message: String,
    /// Location in source
    pub span: Span,
    /// The kind of lexical error
    pub kind: LexicalErrorKind,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

/// Kinds of lexical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    /// Character that starts no token
    InvalidCharacter,
    /// String literal with no closing quote on its line
    UnterminatedString,
    /// Character literal with no closing quote
    UnterminatedChar,
    /// Block comment with no closing marker
    UnterminatedComment,
}

/// Error found during parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// Human-readable message
    pub message: String,
    /// Location in source
    pub span: Span,
    /// The kind of syntax error
    pub kind: SyntaxErrorKind,
    /// The construct that was expected, if known
    pub expected: Option<String>,
    /// What was found instead
    pub found: Option<String>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)?;
        if let Some(ref expected) = self.expected {
            write!(f, " (expected {})", expected)?;
        }
        if let Some(ref found) = self.found {
            write!(f, " (found {})", found)?;
        }
        Ok(())
    }
}

/// Kinds of syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Token that no production accepts here
    UnexpectedToken,
    /// A specific token was required
    ExpectedToken,
    /// An expression was required
    ExpectedExpression,
    /// A statement was required
    ExpectedStatement,
    /// Input ended mid-construct
    UnexpectedEof,
}

/// Error found during semantic analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct SemanticError {
    /// Human-readable message
    pub message: String,
    /// Location in source
    pub span: Span,
    /// The kind of semantic error
    pub kind: SemanticErrorKind,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

/// Kinds of semantic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// Name already declared in the same scope
    DuplicateDeclaration,
    /// Name not found in any enclosing scope
    UndeclaredIdentifier,
    /// Read of a symbol that was declared but never assigned
    UsedBeforeAssignment,
    /// Operand or assignment types do not match
    TypeMismatch,
    /// Non-void method with no value-returning statement
    MissingReturn,
}

/// A positioned, stage-tagged problem report. Non-fatal to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stage that produced the diagnostic
    pub stage: Stage,
    /// Line number (1-indexed, 0 when unknown)
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown)
    pub column: usize,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from a stage, a span, and a message.
    pub fn new(stage: Stage, span: Span, message: impl Into<String>) -> Self {
        Self {
            stage,
            line: span.start_line,
            column: span.start_column,
            message: message.into(),
        }
    }
}

impl From<&LexicalError> for Diagnostic {
    fn from(err: &LexicalError) -> Self {
        Diagnostic::new(Stage::Lexical, err.span, err.message.clone())
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(err: &SyntaxError) -> Self {
        let mut message = err.message.clone();
        if let Some(ref found) = err.found {
            message.push_str(&format!(", found {}", found));
        }
        Diagnostic::new(Stage::Syntactic, err.span, message)
    }
}

impl From<&SemanticError> for Diagnostic {
    fn from(err: &SemanticError) -> Self {
        Diagnostic::new(Stage::Semantic, err.span, err.message.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}:{}: {}", self.stage, self.line, self.column, self.message)
    }
}
