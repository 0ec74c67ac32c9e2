//! Declaration and statement AST nodes

use super::Expr;
use crate::common::Span;
use serde::{Deserialize, Serialize};

/// Top-level declaration node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Declaration kinds: a variable or function declaration, or any
/// statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeclKind {
    Var(VarDecl),
    Fun(FunDecl),
    Stmt(Stmt),
}

/// Variable declaration: var x [= init];
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Function declaration: fun name(params) { body }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

/// Braced block: { declarations... }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub declarations: Vec<Decl>,
    pub span: Span,
}

/// Statement node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
///
/// Sub-nodes the grammar requires (an `if` condition, a `while`
/// condition) are still `Option` in the wire format; the analyzer
/// reports a malformed tree when they are absent rather than trusting
/// the producer blindly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StmtKind {
    /// Expression statement: expr;
    Expr(Expr),

    /// Print statement: print expr;
    Print(Expr),

    /// Return statement: return [expr];
    Return(Option<Expr>),

    /// If statement: if (cond) then [else else]
    If {
        condition: Option<Expr>,
        then_branch: Option<Box<Stmt>>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) body
    While {
        condition: Option<Expr>,
        body: Option<Box<Stmt>>,
    },

    /// For loop: for (init; cond; update) body
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Option<Box<Stmt>>,
    },

    /// Block statement: { ... }
    Block(Block),
}

/// For loop initializer (declaration or expression)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}
