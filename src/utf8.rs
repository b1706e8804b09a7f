//! Validation and repair of UTF-8.
//!
//! Header values come from untrusted sources and are not necessarily valid UTF-8. Before a run is
//! encoded, every stretch of bytes that does not form valid characters is replaced by a single
//! U+FFFD. Adjacent invalid bytes share one replacement, a valid character ends the stretch.

use std::str::from_utf8;

/// U+FFFD REPLACEMENT CHARACTER.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// An item of a [`CodePointRun`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Unit {
    /// A valid Unicode scalar value.
    Scalar(char),
    /// One or more invalid bytes.
    Replacement,
}

impl Unit {
    pub fn as_char(self) -> char {
        match self {
            Unit::Scalar(c) => c,
            Unit::Replacement => REPLACEMENT_CHARACTER,
        }
    }
}

/// Result of scanning bytes as UTF-8.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CodePointRun {
    units: Vec<Unit>,
}

/// The state of the scanner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Valid,
    Invalid,
}

impl CodePointRun {
    /// Scans `bytes` and never fails.
    pub fn scan(bytes: &[u8]) -> Self {
        let mut units = Vec::with_capacity(bytes.len());
        let mut state = State::Valid;
        let mut offset = 0;

        while offset < bytes.len() {
            state = match decode_char_at(bytes, offset) {
                Some((c, next)) => {
                    units.push(Unit::Scalar(c));
                    offset = next;
                    State::Valid
                }
                None => {
                    if state == State::Valid {
                        units.push(Unit::Replacement);
                    }
                    offset += 1;
                    State::Invalid
                }
            };
        }

        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of replacement markers.
    pub fn replacements(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| **unit == Unit::Replacement)
            .count()
    }

    /// Projects the run back into UTF-8.
    pub fn into_encodable(self) -> EncodableRun {
        EncodableRun(self.units.into_iter().map(Unit::as_char).collect())
    }
}

/// The exact text that is going to be escaped or base64-encoded.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct EncodableRun(String);

impl EncodableRun {
    /// Scans and repairs `bytes` in one step.
    pub fn repair(bytes: &[u8]) -> Self {
        let run = CodePointRun::scan(bytes);

        match run.replacements() {
            0 => {}
            count => log::warn!("Rectified {count} invalid UTF-8 sequence(s) to U+FFFD"),
        }

        run.into_encodable()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decodes the character starting at `offset`.
///
/// Returns the character and the offset of the following one. Overlong forms, surrogates, and
/// values above U+10FFFF are rejected.
fn decode_char_at(bytes: &[u8], offset: usize) -> Option<(char, usize)> {
    let len = match bytes[offset] {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };

    let char_bytes = bytes.get(offset..offset + len)?;
    let c = from_utf8(char_bytes).ok()?.chars().next()?;

    Some((c, offset + len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: &str = "\u{FFFD}";

    #[test]
    fn test_repair() {
        let tests: &[(&[u8], String)] = &[
            (b"", String::new()),
            (b"abc", "abc".into()),
            (b"\xc3\xa4", "ä".into()),
            (b"\xe2\x82\xac", "€".into()),
            (b"\xf0\x9f\x92\x8c", "💌".into()),
            (b"\x80", R.into()),
            (b"\x80\x80\x80\x80\x80\x80\x80", R.into()),
            (b"-\x80-", format!("-{R}-")),
            (b"\xc3", R.into()),
            (b"\xc3-", format!("{R}-")),
            (b"\xc3\xc3\xc3", R.into()),
            (b"\xc3\xc3\xa4\xc3", format!("{R}ä{R}")),
            (b"\xc3\xa4\xc3\xc3", format!("ä{R}")),
            (b"\xc3\xc3\xc3\xa4", format!("{R}ä")),
            (b"\xe2\x82", R.into()),
            (b"\xe2\x82\xe2\x82\xac", format!("{R}€")),
            // Overlong, surrogate, and out of range.
            (b"\xc0\xaf", R.into()),
            (b"\xe0\x80\xaf", R.into()),
            (b"\xed\xa0\x80", R.into()),
            (b"\xf4\x90\x80\x80", R.into()),
            (b"\xff", R.into()),
            // A valid U+FFFD next to invalid bytes is kept.
            (b"\x80\xef\xbf\xbd", format!("{R}{R}")),
        ];

        for (test, expected) in tests {
            let got = EncodableRun::repair(test);
            assert_eq!(got.as_str(), expected.as_str(), "{:?}", test);
        }
    }

    #[test]
    fn test_scan_units() {
        let run = CodePointRun::scan(b"a\x80\x81b\xc3");

        assert_eq!(
            run.units(),
            &[
                Unit::Scalar('a'),
                Unit::Replacement,
                Unit::Scalar('b'),
                Unit::Replacement
            ]
        );
        assert_eq!(run.replacements(), 2);
        assert_eq!(run.into_encodable().as_bytes(), b"a\xef\xbf\xbdb\xef\xbf\xbd");
    }

    #[test]
    fn test_scan_valid_is_identity() {
        let input = "Grüße aus Köln, 東京 💌";
        let run = EncodableRun::repair(input.as_bytes());

        assert_eq!(run.as_str(), input);
        assert_eq!(run.len(), input.len());
    }
}
