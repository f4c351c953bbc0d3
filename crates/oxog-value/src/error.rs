use std::fmt;

use serde::{Deserialize, Serialize};

/// Native error object: a name (`"Error"` unless specialised) and a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
}

impl ErrorValue {
    pub const DEFAULT_NAME: &'static str = "Error";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.into(),
            message: message.into(),
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Capture any std error by its `Display` text.
    pub fn from_std(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(err.to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.message.is_empty()) {
            (_, true) => f.write_str(&self.name),
            (true, false) => f.write_str(&self.message),
            (false, false) => write!(f, "{}: {}", self.name, self.message),
        }
    }
}

impl std::error::Error for ErrorValue {}

impl From<&str> for ErrorValue {
    fn from(message: &str) -> Self {
        ErrorValue::new(message)
    }
}

impl From<String> for ErrorValue {
    fn from(message: String) -> Self {
        ErrorValue::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_error_coercion() {
        assert_eq!(ErrorValue::new("boom").to_string(), "Error: boom");
        assert_eq!(ErrorValue::named("TypeError", "bad").to_string(), "TypeError: bad");
        assert_eq!(ErrorValue::new("").to_string(), "Error");
    }

    #[test]
    fn from_std_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = ErrorValue::from_std(&io);
        assert_eq!(err.message(), "missing file");
        assert_eq!(err.name(), "Error");
    }
}
