//! MiniCS Command Line Interface
//!
//! Usage:
//!   minics [OPTIONS] <input-file>
//!   minics --help
//!
//! Examples:
//!   minics programa.mcs                    # Full analysis, text report
//!   minics --depth=lexical programa.mcs    # Token listing only
//!   minics --emit=json programa.mcs        # Machine-readable output
//!   minics -o reporte.txt programa.mcs     # Write the report to a file

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use minics::api::{
    analyze_all, analyze_lexical, analyze_semantic, analyze_syntactic, AnalyzeRequest,
    ErrorEntry, FullResponse, LexicalResponse, SemanticResponse, SymbolEntry, SyntacticResponse,
    TokenEntry,
};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// MiniCS - source code analyzer
#[derive(Parser, Debug)]
#[command(name = "minics")]
#[command(version)]
#[command(about = "Lexical, syntactic, and semantic source code analysis", long_about = None)]
struct Cli {
    /// Input file to analyze
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How deep to analyze
    #[arg(short, long, default_value = "all")]
    depth: Depth,

    /// Report format
    #[arg(long, default_value = "text")]
    emit: EmitKind,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress warnings)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Depth {
    /// Tokens only
    Lexical,
    /// Tokens and syntax tree
    Syntactic,
    /// Tokens, syntax tree, and symbol table
    Semantic,
    /// Every stage, reported separately
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitKind {
    /// Human-readable report
    Text,
    /// JSON response payload
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    info!("MiniCS v{}", minics::VERSION);
    debug!("Input file: {:?}", cli.input);

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;
    let request = AnalyzeRequest::new(source);

    // Diagnostics in the input are the product, not a failure; the
    // exit code stays 0 for them.
    let report = match (cli.depth, cli.emit) {
        (Depth::Lexical, EmitKind::Json) => to_json(&analyze_lexical(&request))?,
        (Depth::Syntactic, EmitKind::Json) => to_json(&analyze_syntactic(&request))?,
        (Depth::Semantic, EmitKind::Json) => to_json(&analyze_semantic(&request))?,
        (Depth::All, EmitKind::Json) => to_json(&analyze_all(&request))?,
        (Depth::Lexical, EmitKind::Text) => render_lexical(&analyze_lexical(&request)),
        (Depth::Syntactic, EmitKind::Text) => render_syntactic(&analyze_syntactic(&request)),
        (Depth::Semantic, EmitKind::Text) => render_semantic(&analyze_semantic(&request)),
        (Depth::All, EmitKind::Text) => render_all(&analyze_all(&request)),
    };

    write_output(&cli.output, &report)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize response")
}

fn render_lexical(resp: &LexicalResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Lexical analysis ==");
    let _ = writeln!(out, "{}", resp.message);
    let _ = writeln!(out);
    render_tokens(&mut out, &resp.tokens);
    render_errors(&mut out, &resp.errors);
    out
}

fn render_syntactic(resp: &SyntacticResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Syntactic analysis ==");
    let _ = writeln!(out, "{}", resp.message);
    let _ = writeln!(out);
    out.push_str(&resp.ast);
    render_errors(&mut out, &resp.errors);
    out
}

fn render_semantic(resp: &SemanticResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Semantic analysis ==");
    let _ = writeln!(out, "{}", resp.message);
    let _ = writeln!(out);
    render_symbols(&mut out, &resp.symbols);
    render_errors(&mut out, &resp.errors);
    out
}

fn render_all(resp: &FullResponse) -> String {
    let mut out = String::new();
    out.push_str(&render_lexical(&resp.lexical));
    let _ = writeln!(out);
    out.push_str(&render_syntactic(&resp.syntactic));
    let _ = writeln!(out);
    out.push_str(&render_semantic(&resp.semantic));
    let _ = writeln!(out);
    let _ = writeln!(out, "== Summary ==");
    let _ = writeln!(out, "{}", resp.message);
    out
}

fn render_tokens(out: &mut String, tokens: &[TokenEntry]) {
    let _ = writeln!(out, "{:<16} {:<24} {:>4} {:>6}", "TYPE", "LEXEME", "LINE", "COLUMN");
    for token in tokens {
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:>4} {:>6}",
            token.kind, token.lexeme, token.line, token.column
        );
    }
}

fn render_symbols(out: &mut String, symbols: &[SymbolEntry]) {
    let _ = writeln!(out, "{:<20} {:<20} {:<10} {:<10}", "SCOPE", "NAME", "TYPE", "STATUS");
    for symbol in symbols {
        let _ = writeln!(
            out,
            "{:<20} {:<20} {:<10} {:<10}",
            symbol.scope, symbol.name, symbol.kind, symbol.status
        );
    }
}

fn render_errors(out: &mut String, errors: &[ErrorEntry]) {
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Errors:");
    for error in errors {
        let _ = writeln!(out, "  {}:{}: {}", error.line, error.column, error.message);
    }
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content)
                .with_context(|| format!("Failed to write output file: {:?}", p))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
