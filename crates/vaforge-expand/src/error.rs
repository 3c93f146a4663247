use thiserror::Error;

/// Errors raised while reading definitions or expanding macros.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },
    #[error("unexpected character '{ch}' at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("malformed #define: {0}")]
    MalformedDefine(String),
    #[error("'#' in {macro_name} is not followed by a parameter")]
    InvalidStringize { macro_name: String },
    #[error("'##' cannot appear at either end of {macro_name}")]
    DanglingPaste { macro_name: String },
    #[error("pasting '{left}' and '{right}' does not give a valid token")]
    InvalidPaste { left: String, right: String },
    #[error("{macro_name} expects {expected} argument(s), got {found}")]
    ArgumentCount {
        macro_name: String,
        expected: String,
        found: usize,
    },
    #[error("unterminated argument list for {macro_name}")]
    UnterminatedInvocation { macro_name: String },
    #[error("expansion exceeded {0} macro invocations")]
    StepLimit(usize),
    #[error("argument expansion nested deeper than {0} levels")]
    DepthLimit(usize),
}

pub type ExpandResult<T> = std::result::Result<T, ExpandError>;
