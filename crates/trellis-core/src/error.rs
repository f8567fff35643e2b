use thiserror::Error;

/// Structured codes attached to every fatal error and recorded warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingBindingValue,
    MissingTemplate,
    MissingStylesheet,
    MissingStyle,
    MissingElementContents,
    MissingOrUnhandledElement,
    UnhandledTextVariant,
    UnhandledContentKind,
    DuplicateTemplate,
    DuplicateStylesheet,
    DuplicateStyle,
    DuplicateBindingValue,
    UnsupportedFeature,
    GridCellWidthWithoutContents,
    InvalidFill,
    MissingImage,
    InvalidImageSize,
}

/// A fatal content error: malformed or unhandled input that aborts the
/// current render operation. Never retried.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("[{code:?}] {message}")]
pub struct BindError {
    pub code: ErrorCode,
    pub message: String,
}

impl BindError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        BindError { code, message: message.into() }
    }
}

pub type BindResult<T> = Result<T, BindError>;
