//! Request/response boundary for the analyzer.
//!
//! Each depth is a pure function from an [`AnalyzeRequest`] to a
//! serializable response. The single-depth operations fold the
//! shallower stages' diagnostics into their error list, so a caller
//! asking for semantic results sees every problem in one place. The
//! combined operation instead keeps each nested payload's error list
//! stage-pure, so the caller may concatenate the three lists without
//! counting any diagnostic twice. Exceeding a resource bound yields
//! `success: false` with whatever payload the completed stages
//! produced.

use crate::frontend::lexer::{self, LexOutput};
use crate::frontend::parser::{self, ParseOutput};
use crate::frontend::render::render_program;
use crate::frontend::semantic::{self, SemanticOutput};
use crate::frontend::token::Token;
use crate::utils::errors::{Diagnostic, LexicalError, SemanticError, SyntaxError};
use log::debug;
use serde::{Deserialize, Serialize};

/// A request to analyze one piece of source code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// The source code to analyze.
    pub code: String,
}

impl AnalyzeRequest {
    /// Create a request from source text.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// One token in a lexical report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Token class: `keyword`, `identifier`, `int_literal`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Exact source text
    pub lexeme: String,
    /// 1-indexed line
    pub line: usize,
    /// 1-indexed column
    pub column: usize,
}

/// One positioned problem in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// 1-indexed line, 0 when unknown
    pub line: usize,
    /// 1-indexed column, 0 when unknown
    pub column: usize,
    /// Human-readable message
    pub message: String,
}

impl From<&Diagnostic> for ErrorEntry {
    fn from(diag: &Diagnostic) -> Self {
        Self { line: diag.line, column: diag.column, message: diag.message.clone() }
    }
}

/// One declared symbol in a semantic report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Owning scope label, e.g. `global` or `class Persona`
    pub scope: String,
    /// Declared name
    pub name: String,
    /// Declared or inferred type
    #[serde(rename = "type")]
    pub kind: String,
    /// `Declared` or `Assigned`
    pub status: String,
}

/// Response to a lexical-depth request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalResponse {
    /// True when scanning produced no diagnostics.
    pub success: bool,
    /// One-line outcome summary.
    pub message: String,
    /// Tokens in source order, end-of-input marker excluded.
    pub tokens: Vec<TokenEntry>,
    /// Lexical diagnostics.
    pub errors: Vec<ErrorEntry>,
}

/// Response to a syntactic-depth request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntacticResponse {
    /// True when this response's error list is empty.
    pub success: bool,
    /// One-line outcome summary.
    pub message: String,
    /// Indented textual rendering of the recovered program.
    pub ast: String,
    /// Diagnostics in source order. The single-depth operation folds
    /// lexical diagnostics in; inside a combined response the list
    /// holds syntactic diagnostics only.
    pub errors: Vec<ErrorEntry>,
}

/// Response to a semantic-depth request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticResponse {
    /// True when this response's error list is empty.
    pub success: bool,
    /// One-line outcome summary.
    pub message: String,
    /// Declared symbols in declaration order.
    pub symbols: Vec<SymbolEntry>,
    /// Diagnostics in source order. The single-depth operation folds
    /// all three stages in; inside a combined response the list holds
    /// semantic diagnostics only.
    pub errors: Vec<ErrorEntry>,
}

/// Response to a full-pipeline request. Each nested report carries its
/// own stage's diagnostics, so concatenating the three error lists
/// reproduces the unified list without duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullResponse {
    /// True when every stage succeeded.
    pub success: bool,
    /// One-line outcome summary.
    pub message: String,
    /// The lexical report.
    pub lexical: LexicalResponse,
    /// The syntactic report.
    pub syntactic: SyntacticResponse,
    /// The semantic report.
    pub semantic: SemanticResponse,
}

/// Run the lexer only.
pub fn analyze_lexical(request: &AnalyzeRequest) -> LexicalResponse {
    match lexer::tokenize(&request.code) {
        Ok(lex) => lexical_response(&lex),
        Err(err) => LexicalResponse {
            success: false,
            message: err.to_string(),
            tokens: Vec::new(),
            errors: Vec::new(),
        },
    }
}

/// Run the lexer and parser.
pub fn analyze_syntactic(request: &AnalyzeRequest) -> SyntacticResponse {
    let lex = match lexer::tokenize(&request.code) {
        Ok(lex) => lex,
        Err(err) => return syntactic_failure(err.to_string()),
    };
    match parser::parse_tokens(lex.tokens.clone()) {
        Ok(parse) => {
            syntactic_response(&parse, error_entries(&lex.errors, &parse.errors, &[]))
        }
        Err(err) => syntactic_failure(err.to_string()),
    }
}

/// Run the full pipeline, reporting symbols.
pub fn analyze_semantic(request: &AnalyzeRequest) -> SemanticResponse {
    let lex = match lexer::tokenize(&request.code) {
        Ok(lex) => lex,
        Err(err) => return semantic_failure(err.to_string()),
    };
    let parse = match parser::parse_tokens(lex.tokens.clone()) {
        Ok(parse) => parse,
        Err(err) => return semantic_failure(err.to_string()),
    };
    let sem = semantic::analyze(&parse.program);
    semantic_response(&sem, error_entries(&lex.errors, &parse.errors, &sem.errors))
}

/// Run the full pipeline, reporting every stage.
pub fn analyze_all(request: &AnalyzeRequest) -> FullResponse {
    debug!("analyzing {} bytes at full depth", request.code.len());

    let lex = match lexer::tokenize(&request.code) {
        Ok(lex) => lex,
        Err(err) => {
            let message = err.to_string();
            return FullResponse {
                success: false,
                message: message.clone(),
                lexical: LexicalResponse {
                    success: false,
                    message: message.clone(),
                    tokens: Vec::new(),
                    errors: Vec::new(),
                },
                syntactic: syntactic_failure(message.clone()),
                semantic: semantic_failure(message),
            };
        }
    };
    let lexical = lexical_response(&lex);

    let parse = match parser::parse_tokens(lex.tokens.clone()) {
        Ok(parse) => parse,
        Err(err) => {
            let message = err.to_string();
            return FullResponse {
                success: false,
                message: message.clone(),
                lexical,
                syntactic: syntactic_failure(message.clone()),
                semantic: semantic_failure(message),
            };
        }
    };
    // Stage-pure lists here: the caller concatenates them.
    let syntactic = syntactic_response(&parse, error_entries(&[], &parse.errors, &[]));

    let sem = semantic::analyze(&parse.program);
    let semantic = semantic_response(&sem, error_entries(&[], &[], &sem.errors));

    let success = lexical.success && syntactic.success && semantic.success;
    let total = lexical.errors.len() + parse.errors.len() + sem.errors.len();
    FullResponse {
        success,
        message: outcome("analysis", total),
        lexical,
        syntactic,
        semantic,
    }
}

// Response construction

fn lexical_response(lex: &LexOutput) -> LexicalResponse {
    let errors = error_entries(&lex.errors, &[], &[]);
    LexicalResponse {
        success: errors.is_empty(),
        message: outcome("lexical analysis", errors.len()),
        tokens: token_entries(&lex.tokens),
        errors,
    }
}

fn syntactic_response(parse: &ParseOutput, errors: Vec<ErrorEntry>) -> SyntacticResponse {
    SyntacticResponse {
        success: errors.is_empty(),
        message: outcome("syntactic analysis", errors.len()),
        ast: render_program(&parse.program),
        errors,
    }
}

fn semantic_response(sem: &SemanticOutput, errors: Vec<ErrorEntry>) -> SemanticResponse {
    SemanticResponse {
        success: errors.is_empty(),
        message: outcome("semantic analysis", errors.len()),
        symbols: symbol_entries(sem),
        errors,
    }
}

fn syntactic_failure(message: String) -> SyntacticResponse {
    SyntacticResponse { success: false, message, ast: String::new(), errors: Vec::new() }
}

fn semantic_failure(message: String) -> SemanticResponse {
    SemanticResponse { success: false, message, symbols: Vec::new(), errors: Vec::new() }
}

fn token_entries(tokens: &[Token]) -> Vec<TokenEntry> {
    tokens
        .iter()
        .filter(|t| !t.is_eof())
        .map(|t| TokenEntry {
            kind: t.kind.category().to_string(),
            lexeme: t.lexeme.clone(),
            line: t.line(),
            column: t.column(),
        })
        .collect()
}

fn error_entries(
    lexical: &[LexicalError],
    syntactic: &[SyntaxError],
    semantic: &[SemanticError],
) -> Vec<ErrorEntry> {
    let mut entries = Vec::new();
    entries.extend(lexical.iter().map(|e| ErrorEntry::from(&Diagnostic::from(e))));
    entries.extend(syntactic.iter().map(|e| ErrorEntry::from(&Diagnostic::from(e))));
    entries.extend(semantic.iter().map(|e| ErrorEntry::from(&Diagnostic::from(e))));
    entries
}

fn symbol_entries(sem: &SemanticOutput) -> Vec<SymbolEntry> {
    sem.table
        .symbols()
        .iter()
        .map(|s| SymbolEntry {
            scope: sem.table.scope(s.scope).label.clone(),
            name: s.name.clone(),
            kind: s.ty.to_string(),
            status: s.status.to_string(),
        })
        .collect()
}

fn outcome(stage: &str, error_count: usize) -> String {
    match error_count {
        0 => format!("{} completed without errors", stage),
        1 => format!("{} found 1 error", stage),
        n => format!("{} found {} errors", stage, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lexical_clean() {
        let resp = analyze_lexical(&AnalyzeRequest::new("int cantidad = 10;"));
        assert!(resp.success);
        assert!(resp.errors.is_empty());
        let kinds: Vec<&str> = resp.tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["keyword", "identifier", "operator", "int_literal", "punctuation"]);
    }

    #[test]
    fn test_lexical_excludes_eof() {
        let resp = analyze_lexical(&AnalyzeRequest::new("int x;"));
        assert!(resp.tokens.iter().all(|t| t.kind != "eof"));
    }

    #[test]
    fn test_lexical_invalid_character_position() {
        let resp = analyze_lexical(&AnalyzeRequest::new("int $error_id = 9;"));
        assert!(!resp.success);
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].line, 1);
        assert_eq!(resp.errors[0].column, 5);
        // scanning resumed after the bad character
        assert!(resp.tokens.iter().any(|t| t.lexeme == "error_id"));
    }

    #[test]
    fn test_token_entry_serializes_type_field() {
        let resp = analyze_lexical(&AnalyzeRequest::new("int x;"));
        let value = serde_json::to_value(&resp.tokens[0]).unwrap();
        assert_eq!(
            value,
            json!({"type": "keyword", "lexeme": "int", "line": 1, "column": 1})
        );
    }

    #[test]
    fn test_syntactic_includes_lexical_errors() {
        let resp = analyze_syntactic(&AnalyzeRequest::new("int $x = 1;"));
        assert!(!resp.success);
        assert!(!resp.errors.is_empty());
    }

    #[test]
    fn test_syntactic_renders_ast() {
        let resp = analyze_syntactic(&AnalyzeRequest::new("int cantidad = 10;"));
        assert!(resp.success);
        assert!(resp.ast.contains("VarDecl int cantidad"));
    }

    #[test]
    fn test_semantic_symbols_in_declaration_order() {
        let resp = analyze_semantic(&AnalyzeRequest::new(
            "int cantidad = 10;\ndouble precio = 2.5;",
        ));
        assert!(resp.success);
        let names: Vec<&str> = resp.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cantidad", "precio"]);
        assert_eq!(resp.symbols[0].scope, "global");
        assert_eq!(resp.symbols[0].kind, "int");
        assert_eq!(resp.symbols[0].status, "Assigned");
    }

    #[test]
    fn test_semantic_accumulates_all_stage_errors() {
        // one lexical ($), one syntactic (missing ;), one semantic (undeclared)
        let resp = analyze_semantic(&AnalyzeRequest::new(
            "int $a = 1\nint b = valor;",
        ));
        assert!(!resp.success);
        assert!(resp.errors.len() >= 3);
    }

    #[test]
    fn test_all_depth_success_requires_every_stage() {
        let resp = analyze_all(&AnalyzeRequest::new("int x = 1;\ny = 2;"));
        assert!(resp.lexical.success);
        assert!(resp.syntactic.success);
        assert!(!resp.semantic.success);
        assert!(!resp.success);
    }

    #[test]
    fn test_all_depth_clean_program() {
        let resp = analyze_all(&AnalyzeRequest::new(
            "int contador = 0;\nwhile (contador < 3) { contador = contador + 1; }",
        ));
        assert!(resp.success, "errors: {:?}", resp.semantic.errors);
        assert!(resp.message.contains("without errors"));
    }

    #[test]
    fn test_all_depth_error_lists_are_stage_pure() {
        // one lexical ($), one syntactic (bad declaration), one
        // semantic (undeclared) — each list holds exactly its own
        let resp = analyze_all(&AnalyzeRequest::new("int $a = 1;\nint b = valor;"));
        assert_eq!(resp.lexical.errors.len(), 1);
        assert_eq!(resp.syntactic.errors.len(), 1);
        assert_eq!(resp.semantic.errors.len(), 1);
        assert!(resp.lexical.errors[0].message.contains("invalid character"));
        assert!(resp.syntactic.errors.iter().all(|e| !e.message.contains("invalid character")));
        assert!(resp.semantic.errors[0].message.contains("'valor'"));
        // concatenating the three lists counts each diagnostic once
        let total =
            resp.lexical.errors.len() + resp.syntactic.errors.len() + resp.semantic.errors.len();
        assert_eq!(total, 3);
        assert!(!resp.success);
    }

    #[test]
    fn test_single_depth_still_folds_shallower_stages() {
        let resp = analyze_semantic(&AnalyzeRequest::new("int $a = 1;\nint b = valor;"));
        assert_eq!(resp.errors.len(), 3);
    }

    #[test]
    fn test_responses_are_deterministic() {
        let req = AnalyzeRequest::new("class Persona { int edad; }\nint total = 5;");
        let a = serde_json::to_string(&analyze_all(&req)).unwrap();
        let b = serde_json::to_string(&analyze_all(&req)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_is_clean() {
        let resp = analyze_all(&AnalyzeRequest::new(""));
        assert!(resp.success);
        assert!(resp.lexical.tokens.is_empty());
        assert!(resp.semantic.symbols.is_empty());
    }
}
