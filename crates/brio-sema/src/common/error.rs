//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::Span;

/// Semantic error with source location.
///
/// The walk stops at the first error raised; there is no recovery or
/// multi-error batching.
#[derive(Error, Debug)]
pub enum SemanticError {
    /// A name of the same declared-entity kind already exists in the
    /// exact current scope
    #[error("Duplicate declaration at {span:?}: {message}")]
    DuplicateDeclaration { message: String, span: Span },

    /// A name used in assignment, read, or call position is not found
    /// in the current scope or any ancestor
    #[error("Undeclared name at {span:?}: {message}")]
    UndeclaredName { message: String, span: Span },

    /// A symbol update targeted a name absent from the whole scope
    /// chain; declaration always precedes update in a correct walk
    #[error("Unknown symbol at {span:?}: {message}")]
    UnknownSymbol { message: String, span: Span },

    /// An operator, condition, or assignment violated the type rules
    #[error("Type mismatch at {span:?}: {message}")]
    TypeMismatch { message: String, span: Span },

    /// A required sub-node is missing; the tree did not come from a
    /// well-formed parse
    #[error("Malformed syntax tree at {span:?}: {message}")]
    MalformedConstruct { message: String, span: Span },
}

impl SemanticError {
    pub fn duplicate(message: impl Into<String>, span: Span) -> Self {
        Self::DuplicateDeclaration {
            message: message.into(),
            span,
        }
    }

    pub fn undeclared(message: impl Into<String>, span: Span) -> Self {
        Self::UndeclaredName {
            message: message.into(),
            span,
        }
    }

    pub fn unknown_symbol(message: impl Into<String>, span: Span) -> Self {
        Self::UnknownSymbol {
            message: message.into(),
            span,
        }
    }

    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            span,
        }
    }

    pub fn malformed(message: impl Into<String>, span: Span) -> Self {
        Self::MalformedConstruct {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::DuplicateDeclaration { span, .. }
            | Self::UndeclaredName { span, .. }
            | Self::UnknownSymbol { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::MalformedConstruct { span, .. } => *span,
        }
    }
}

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &SemanticError) {
        let (title, message) = match error {
            SemanticError::DuplicateDeclaration { message, .. } => {
                ("Duplicate declaration", message)
            }
            SemanticError::UndeclaredName { message, .. } => ("Undeclared name", message),
            SemanticError::UnknownSymbol { message, .. } => ("Unknown symbol", message),
            SemanticError::TypeMismatch { message, .. } => ("Type mismatch", message),
            SemanticError::MalformedConstruct { message, .. } => ("Malformed syntax tree", message),
        };

        let span = error.span();
        let diagnostic = Diagnostic::error()
            .with_message(title)
            .with_labels(vec![
                Label::primary(file_id, span.start..span.end).with_message(message),
            ]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
