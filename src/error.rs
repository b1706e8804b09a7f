//! Error-related types.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A configuration error.
///
/// This error is returned when an [`EncoderConfig`](crate::config::EncoderConfig) would not leave
/// enough room on a line for a single encoded-word.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid configuration: {}", self.kind)
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub(crate) enum ConfigErrorKind {
    #[error("Line length must be at least {min}, got {got}")]
    LineTooShort { min: usize, got: usize },
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind) -> Self {
        Self { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigError::new(ConfigErrorKind::LineTooShort { min: 25, got: 3 });

        assert_eq!(
            err.to_string(),
            "Invalid configuration: Line length must be at least 25, got 3"
        );
    }
}
