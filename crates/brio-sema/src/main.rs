//! Brio semantic analyzer CLI
//!
//! Usage: brio-sema [OPTIONS] <tree.json>
//!
//! Consumes a syntax tree serialized by the external parser, runs
//! semantic analysis, and reports the first violation found.

use anyhow::Context;
use brio_sema::ast::Program;
use brio_sema::common::DiagnosticReporter;
use brio_sema::sema::SemanticAnalyzer;
use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Once;

#[derive(ClapParser, Debug)]
#[command(name = "brio-sema")]
#[command(author = "Brio Team")]
#[command(version = "0.1.0")]
#[command(about = "Semantic analyzer for the Brio scripting language", long_about = None)]
struct Args {
    /// Serialized syntax tree produced by the parser (.json)
    #[arg(required = true)]
    tree: PathBuf,

    /// Original source file; enables labeled diagnostics
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Dump the deserialized tree (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=brio_sema=debug` or
/// `RUST_LOG=brio_sema=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(true)` when the program is semantically valid,
/// `Ok(false)` when a violation was reported, `Err` on I/O or
/// deserialization failures.
fn run(args: &Args) -> anyhow::Result<bool> {
    let tree_json = fs::read_to_string(&args.tree)
        .with_context(|| format!("reading syntax tree {}", args.tree.display()))?;
    let program: Program = serde_json::from_str(&tree_json)
        .with_context(|| format!("deserializing syntax tree {}", args.tree.display()))?;

    if args.dump_ast {
        eprintln!("=== AST ===");
        eprintln!("{:#?}", program);
        eprintln!("=== End AST ===\n");
    }

    if args.verbose {
        eprintln!(
            "Analyzing {} ({} top-level declarations)",
            args.tree.display(),
            program.declarations.len()
        );
    }

    let mut analyzer = SemanticAnalyzer::new();
    match analyzer.analyze(&program) {
        Ok(()) => {
            if args.verbose {
                eprintln!("No semantic errors found");
            }
            Ok(true)
        }
        Err(error) => {
            match &args.source {
                Some(source_path) => {
                    let source = fs::read_to_string(source_path)
                        .with_context(|| format!("reading source {}", source_path.display()))?;
                    let mut reporter = DiagnosticReporter::new();
                    let file_id = reporter.add_file(source_path.display().to_string(), source);
                    reporter.report_error(file_id, &error);
                }
                None => eprintln!("error: {}", error),
            }
            Ok(false)
        }
    }
}
