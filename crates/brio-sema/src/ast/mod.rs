//! Syntax tree definitions
//!
//! The tree is produced by an external parser and handed to the
//! analyzer fully structured, either in memory or serialized as JSON.
//! The analyzer only reads node kinds and child references; it never
//! mutates or re-parses the tree.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use serde::{Deserialize, Serialize};

/// A complete program (single translation unit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub declarations: Vec<Decl>,
}

impl Program {
    pub fn new(declarations: Vec<Decl>) -> Self {
        Self { declarations }
    }
}
