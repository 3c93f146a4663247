use thiserror::Error;

/// Errors raised while validating options or rendering a header.
#[derive(Debug, Error)]
pub enum Error {
    /// The arity bound is zero or above [`crate::MAX_ARITY_LIMIT`].
    #[error("invalid arity bound: {0} (must be between 1 and {limit})", limit = crate::MAX_ARITY_LIMIT)]
    InvalidArity(usize),
    /// A prefix or include guard is not usable as a C identifier.
    #[error("invalid {field}: '{value}' is not a valid C identifier")]
    InvalidIdentifier { field: &'static str, value: String },
    /// The output sink refused a write.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Convenience alias for results returned by vaforge crates.
pub type Result<T> = std::result::Result<T, Error>;
