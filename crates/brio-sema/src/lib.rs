//! Brio semantic analyzer
//!
//! The semantic-analysis phase of the Brio compiler front end: given a
//! syntax tree produced by the external parser, it resolves
//! identifiers to lexically-scoped declarations, infers and checks
//! value types, and reports the first violation it finds.
//!
//! ## Architecture
//!
//! - **AST** (`ast/`): the syntax tree handed over by the parser,
//!   including the serde wire format
//! - **Semantic analysis** (`sema/`): scope tree, symbol tables,
//!   declared entities, type rules, and the analyzer walk
//! - **Common** (`common/`): shared infrastructure (errors, spans,
//!   diagnostics)

pub mod ast;
pub mod common;
pub mod sema;

// Re-exports for convenience
pub use common::{DiagnosticReporter, SemanticError, SemanticResult, Span};
pub use sema::{DeclaredEntity, EntityKind, ScopeManager, SemanticAnalyzer, Type};
