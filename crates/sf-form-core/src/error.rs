use thiserror::Error;

/// Every failure the form can surface. None of them is fatal: each one ends in
/// a toast or an inline message and leaves the page usable.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0} not found")]
    MissingElement(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Failed to initialize {0}")]
    Widget(String),

    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl FormError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingElement(what.into())
    }
}

pub type FormResult<T> = Result<T, FormError>;
