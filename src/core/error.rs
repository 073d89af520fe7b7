use thiserror::Error;

/// Contract violations raised by the matching core.
///
/// "Nothing found" outcomes are not errors; they come back as `None` or an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidInput(message.into())
    }
}
