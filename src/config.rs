//! Encoder configuration.
//!
//! The configuration is an immutable value that is captured by a
//! [`HeaderEncoder`](crate::HeaderEncoder) at construction. The defaults reproduce what mail
//! servers put on the wire: lines of at most 76 bytes and folds made of `\n` followed by a tab.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigErrorKind};

/// Charset announced in every encoded-word.
pub const CHARSET: &str = "utf-8";

/// Default line budget, including the encoded-word delimiters.
pub const MAX_LINE_LEN: usize = 76;

/// Whitespace written after the line ending of a generated fold.
pub const FOLD_WHITESPACE: u8 = b'\t';

/// Length of `=?utf-8?q?` (or `=?utf-8?b?`).
pub const PREFIX_LEN: usize = "=?".len() + CHARSET.len() + "?q?".len();

/// Length of `?=`.
pub const SUFFIX_LEN: usize = "?=".len();

/// Smallest line budget that can hold a fold, the encoded-word delimiters, and the largest atomic
/// unit (a four byte character in the Q scheme).
pub const MIN_LINE_LEN: usize = 1 + PREFIX_LEN + SUFFIX_LEN + 4 * 3;

/// The character sequence used for ending a line.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LineEnding {
    /// The line ends with the character `\n`.
    #[default]
    Lf,
    /// The line ends with the character sequence `\r\n`.
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Configuration of a [`HeaderEncoder`](crate::HeaderEncoder).
///
/// # Example
///
/// ```rust
/// use header_codec::config::{EncoderConfig, LineEnding};
///
/// let config = EncoderConfig::new(78, LineEnding::CrLf).unwrap();
/// assert_eq!(config.max_line_len(), 78);
///
/// assert!(EncoderConfig::new(10, LineEnding::Lf).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedConfig"))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EncoderConfig {
    max_line_len: usize,
    line_ending: LineEnding,
}

impl EncoderConfig {
    /// Creates a configuration.
    ///
    /// Fails when `max_line_len` is smaller than [`MIN_LINE_LEN`].
    pub fn new(max_line_len: usize, line_ending: LineEnding) -> Result<Self, ConfigError> {
        if max_line_len < MIN_LINE_LEN {
            return Err(ConfigError::new(ConfigErrorKind::LineTooShort {
                min: MIN_LINE_LEN,
                got: max_line_len,
            }));
        }

        Ok(Self {
            max_line_len,
            line_ending,
        })
    }

    /// Maximum length of an output line, encoded-word delimiters included.
    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Line ending used for folds inserted by the encoder.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_line_len: MAX_LINE_LEN,
            line_ending: LineEnding::Lf,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedConfig {
    max_line_len: usize,
    #[serde(default)]
    line_ending: LineEnding,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedConfig> for EncoderConfig {
    type Error = ConfigError;

    fn try_from(value: UncheckedConfig) -> Result<Self, Self::Error> {
        Self::new(value.max_line_len, value.line_ending)
    }
}
