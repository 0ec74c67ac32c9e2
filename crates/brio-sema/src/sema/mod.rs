//! Semantic analysis module
//!
//! This module resolves names against the lexical scope tree and
//! performs bottom-up type checking over the syntax tree.

mod analyzer;
mod entity;
mod scope;
mod types;

pub use analyzer::SemanticAnalyzer;
pub use entity::{Class, DeclaredEntity, EntityKind, Function, Variable};
pub use scope::{Scope, ScopeId, ScopeManager, Symbol, SymbolTable};
pub use types::{Type, TypeChecker};
