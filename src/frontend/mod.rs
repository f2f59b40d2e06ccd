//! The analysis pipeline: lexer, parser, and semantic checker.
//!
//! The three stages are independent functions wired together by the
//! caller. Each stage consumes the previous stage's output and collects
//! its own diagnostics rather than failing:
//!
//! ```
//! use minics::frontend::{lexer, parser, semantic};
//!
//! let source = "int cantidad = 10;\ndouble precio = cantidad * 2.5;";
//! let lex = lexer::tokenize(source)?;
//! let parse = parser::parse_tokens(lex.tokens.clone())?;
//! let sem = semantic::analyze(&parse.program);
//! assert!(lex.errors.is_empty() && parse.errors.is_empty() && sem.errors.is_empty());
//! # Ok::<(), minics::utils::AnalyzeError>(())
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod semantic;
pub mod symbols;
pub mod token;

pub use ast::{Program, Type};
pub use lexer::{tokenize, LexOutput};
pub use parser::{parse_tokens, ParseOutput};
pub use render::render_program;
pub use semantic::{analyze, SemanticOutput};
pub use symbols::{ScopeTree, Symbol, SymbolStatus};
pub use token::{Token, TokenKind};
