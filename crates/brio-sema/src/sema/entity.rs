//! Declared-entity model
//!
//! What a name denotes once declared: a variable, a function, or a
//! class shape. The checked grammar subset never constructs classes;
//! the variant exists so every use site matches the full closed set.

use super::types::Type;
use std::collections::HashMap;
use std::fmt;

/// Discriminant of a declared entity, used as a lookup filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Variable,
    Function,
    Class,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Variable => "variable",
            EntityKind::Function => "function",
            EntityKind::Class => "class",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic payload of a symbol
#[derive(Debug, Clone)]
pub enum DeclaredEntity {
    Variable(Variable),
    Function(Function),
    Class(Class),
}

impl DeclaredEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            DeclaredEntity::Variable(_) => EntityKind::Variable,
            DeclaredEntity::Function(_) => EntityKind::Function,
            DeclaredEntity::Class(_) => EntityKind::Class,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            DeclaredEntity::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut Variable> {
        match self {
            DeclaredEntity::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            DeclaredEntity::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// A declared variable.
///
/// The type is absent until the initializer or first assignment is
/// checked; once bound it is fixed for the declaring scope's lifetime.
#[derive(Debug, Clone, Default)]
pub struct Variable {
    pub ty: Option<Type>,
}

impl Variable {
    pub fn new(ty: Option<Type>) -> Self {
        Self { ty }
    }

    pub fn untyped() -> Self {
        Self { ty: None }
    }
}

/// A declared function: return type plus ordered parameter list
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub return_type: Option<Type>,
    pub parameters: Vec<Variable>,
}

impl Function {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A declared class shape: method and attribute maps
#[derive(Debug, Clone, Default)]
pub struct Class {
    pub methods: HashMap<String, Function>,
    pub attributes: HashMap<String, Variable>,
}
