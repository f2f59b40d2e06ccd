//! # MiniCS - Source Code Analyzer
//!
//! A three-stage analyzer for a small statically-typed, C#-flavored
//! teaching language:
//! - Lexical: classify every token, flag characters that start none
//! - Syntactic: recursive-descent parse with statement-level recovery
//! - Semantic: scope tree, symbol table, declaration and type checks
//!
//! ## Architecture
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Semantic → Symbols
//! ```
//!
//! Every stage collects diagnostics instead of stopping, so one request
//! reports everything wrong with the input at once. The [`api`] module
//! wraps the pipeline in serializable request/response types, one
//! operation per depth.
//!
//! ## Example
//!
//! ```rust
//! use minics::api::{analyze_all, AnalyzeRequest};
//!
//! let request = AnalyzeRequest::new(
//!     "int contador = 0;\n\
//!      while (contador < 3) {\n\
//!          contador = contador + 1;\n\
//!      }",
//! );
//! let response = analyze_all(&request);
//! assert!(response.success);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod frontend;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::api::{
        analyze_all, analyze_lexical, analyze_semantic, analyze_syntactic, AnalyzeRequest,
        FullResponse, LexicalResponse, SemanticResponse, SyntacticResponse,
    };
    pub use crate::frontend::ast::{Program, Type};
    pub use crate::frontend::symbols::{ScopeTree, Symbol, SymbolStatus};
    pub use crate::frontend::{analyze, parse_tokens, render_program, tokenize};
    pub use crate::utils::errors::*;
    pub use crate::utils::location::{SourceLocation, Span};
}

use utils::AnalyzeResult;

/// Tokenize source code.
pub fn tokenize(source: &str) -> AnalyzeResult<frontend::LexOutput> {
    frontend::lexer::tokenize(source)
}

/// Tokenize and parse source code.
pub fn parse(source: &str) -> AnalyzeResult<frontend::ParseOutput> {
    let lex = tokenize(source)?;
    frontend::parser::parse_tokens(lex.tokens)
}

/// Run the full pipeline on source code.
pub fn analyze(source: &str) -> AnalyzeResult<frontend::SemanticOutput> {
    let parse = parse(source)?;
    Ok(frontend::semantic::analyze(&parse.program))
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
