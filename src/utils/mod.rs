//! Shared utilities: error taxonomy and source location tracking.

pub mod errors;
pub mod location;

pub use errors::{AnalyzeError, AnalyzeResult, Diagnostic, Stage};
pub use location::{SourceLocation, Span};
