//! Error types for templates.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while loading or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template syntax error in {name}: {message}")]
    Syntax { name: String, message: String },

    #[error("Template rendering failed for {name}: {message}")]
    Render { name: String, message: String },

    #[error("Invalid render context: {0}")]
    Context(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flatten an error and its sources into one line.
///
/// Tera reports the useful part of a failure (the missing variable, the
/// offending token) in the source chain rather than the top-level message.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
