//! Error types for the protein box core.
//!
//! Parsing failures abort the whole parse; field errors come from the checked
//! setter and are surfaced or swallowed according to [`RejectPolicy`].
//!
//! [`RejectPolicy`]: crate::model::RejectPolicy

/// Errors raised by the checked field setter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The name is not part of the closed field schema.
    #[error("unknown protein box field `{0}`")]
    UnknownField(String),

    /// The value failed the field's validation pattern or does not fit its kind.
    #[error("value for `{field}` rejected: {reason}")]
    ValidationRejected { field: String, reason: String },
}

/// Errors raised while turning page text into a protein box.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("the source does not appear to contain the `{0}` template")]
    TemplateNotFound(String),

    #[error("template `{name}` opened at byte {start} is never closed")]
    UnbalancedTemplate { name: String, start: usize },

    #[error("malformed wikitext at byte {offset}: {detail}")]
    MalformedField { offset: usize, detail: String },

    #[error(transparent)]
    Field(#[from] FieldError),
}
