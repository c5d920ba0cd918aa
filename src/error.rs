//! Error types for parsing menu descriptions and emitting code.

use thiserror::Error;

/// A raw attribute value that failed its kind check.
///
/// Carries no position; the parser wraps it in [`MenuError::Value`] together
/// with the line and attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("value '{value}' is not an integer")]
    NotAnInteger { value: String },

    #[error("unrecognized type '{value}' (valid types are {expected})")]
    UnknownType { value: String, expected: String },

    #[error("invalid shortcut char '{value}' (valid values are -1 or one of [A-Za-z0-9])")]
    InvalidShortcut { value: String },
}

/// Any failure that aborts the current run.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("syntax error in line {line}: '{text}' (non-section lines must be of the form ATTRIBUTE=VALUE)")]
    Syntax { line: usize, text: String },

    #[error("unknown attribute '{name}' in line {line} (attribute must be one of {expected})")]
    UnknownAttribute {
        line: usize,
        name: String,
        expected: String,
    },

    #[error("bad value for '{attr}' in line {line}: {source}")]
    Value {
        line: usize,
        attr: String,
        #[source]
        source: CoerceError,
    },

    #[error("error in line {line}: {reason}")]
    Structural { line: usize, reason: String },

    #[error("template '{name}' required but not defined")]
    MissingTemplate { name: String },

    #[error("main menu not found")]
    MissingMainMenu,

    #[error("template '{fragment}': placeholder '{name}' {reason}")]
    Placeholder {
        fragment: String,
        name: String,
        reason: String,
    },
}

impl MenuError {
    /// Line of the menu description that caused the error, if the parser found it.
    #[allow(dead_code)]
    pub fn line(&self) -> Option<usize> {
        match self {
            MenuError::Syntax { line, .. }
            | MenuError::UnknownAttribute { line, .. }
            | MenuError::Value { line, .. }
            | MenuError::Structural { line, .. } => Some(*line),
            MenuError::MissingTemplate { .. }
            | MenuError::MissingMainMenu
            | MenuError::Placeholder { .. } => None,
        }
    }
}
