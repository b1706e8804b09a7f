//! Writing of encoded-words with line folding.

use crate::{
    config::{EncoderConfig, CHARSET, FOLD_WHITESPACE, PREFIX_LEN, SUFFIX_LEN},
    scheme::Scheme,
};

/// Output state of a [`WordWriter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum State {
    /// Copying header text (or nothing was written yet).
    Literal,
    /// An encoded-word is open.
    InWord(Scheme),
    /// A fold was just written.
    AtFold,
}

/// Output sink that knows the current column.
///
/// Encoded-words are opened on the first payload and closed explicitly. Whenever a unit does not
/// fit on the current line anymore, the open word is closed, a fold is written, and the next
/// payload opens a new word with the same scheme.
#[derive(Debug)]
pub(crate) struct WordWriter<'a> {
    out: &'a mut Vec<u8>,
    config: &'a EncoderConfig,
    column: usize,
    state: State,
}

impl<'a> WordWriter<'a> {
    pub fn new(out: &'a mut Vec<u8>, config: &'a EncoderConfig, column: usize) -> Self {
        Self {
            out,
            config,
            column,
            state: State::Literal,
        }
    }

    #[cfg(test)]
    pub fn column(&self) -> usize {
        self.column
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Payload bytes that still fit on the current line.
    ///
    /// Accounts for the prefix of a word that is not open yet and for the suffix.
    pub fn room(&self) -> usize {
        let used = match self.state {
            State::InWord(_) => self.column,
            State::Literal | State::AtFold => self.column.saturating_add(PREFIX_LEN),
        };

        self.config
            .max_line_len()
            .saturating_sub(used.saturating_add(SUFFIX_LEN))
    }

    /// Whether a fold would make more room.
    pub fn can_fold(&self) -> bool {
        match self.state {
            State::InWord(_) => true,
            State::Literal => self.column > 1,
            State::AtFold => false,
        }
    }

    /// Closes the open word (if any) and starts a continuation line.
    pub fn fold(&mut self) {
        self.close();
        self.out
            .extend_from_slice(self.config.line_ending().as_bytes());
        self.out.push(FOLD_WHITESPACE);
        self.column = 1;
        self.state = State::AtFold;
    }

    /// Writes payload into the open word, opening one if necessary.
    ///
    /// A word of another scheme is closed and followed by a fold, encoded-words never touch.
    pub fn push(&mut self, scheme: Scheme, payload: &[u8]) {
        match self.state {
            State::InWord(open) if open == scheme => {}
            State::InWord(_) => {
                self.fold();
                self.open(scheme);
            }
            State::Literal | State::AtFold => self.open(scheme),
        }

        self.out.extend_from_slice(payload);
        self.column = self.column.saturating_add(payload.len());
    }

    /// Writes an atomic unit, folding first when it doesn't fit.
    pub fn push_unit(&mut self, scheme: Scheme, unit: &[u8]) {
        if unit.len() > self.room() {
            if self.can_fold() {
                self.fold();
            }

            if unit.len() > self.room() {
                log::warn!(
                    "Unit of {} bytes exceeds the line length of {}",
                    unit.len(),
                    self.config.max_line_len()
                );
            }
        }

        self.push(scheme, unit);
    }

    /// Closes the open word.
    pub fn close(&mut self) {
        if let State::InWord(_) = self.state {
            self.out.extend_from_slice(b"?=");
            self.column = self.column.saturating_add(SUFFIX_LEN);
            self.state = State::Literal;
        }
    }

    /// Copies header text. `bytes` must not contain a line ending.
    pub fn write_literal(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        self.close();
        self.out.extend_from_slice(bytes);
        self.column = self.column.saturating_add(bytes.len());
        self.state = State::Literal;
    }

    /// Copies a line ending found in the input.
    pub fn write_line_ending(&mut self, ending: &[u8]) {
        self.close();
        self.out.extend_from_slice(ending);
        self.column = 0;
        self.state = State::Literal;
    }

    fn open(&mut self, scheme: Scheme) {
        self.out.extend_from_slice(b"=?");
        self.out.extend_from_slice(CHARSET.as_bytes());
        self.out.push(b'?');
        self.out.extend_from_slice(scheme.tag().as_bytes());
        self.out.push(b'?');
        self.column = self.column.saturating_add(PREFIX_LEN);
        self.state = State::InWord(scheme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;

    #[test]
    fn test_push_and_close() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 0);

        assert_eq!(writer.room(), 64);
        writer.push(Scheme::Q, b"abc");
        assert_eq!(writer.state(), State::InWord(Scheme::Q));
        assert_eq!(writer.column(), 13);
        assert_eq!(writer.room(), 61);
        writer.close();
        writer.close();
        assert_eq!(writer.state(), State::Literal);
        assert_eq!(writer.column(), 15);

        assert_eq!(out, b"=?utf-8?q?abc?=");
    }

    #[test]
    fn test_push_unit_folds() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 60);

        // Only 4 bytes left after the prefix, so the word starts on the next line.
        writer.push_unit(Scheme::Q, b"=C3=A4");
        assert_eq!(writer.column(), 1 + 10 + 6);

        for _ in 0..9 {
            writer.push_unit(Scheme::Q, b"=C3=A4");
        }
        writer.close();

        let expected = format!("\n\t=?utf-8?q?{}?=", "=C3=A4".repeat(10));
        assert_eq!(out, expected.as_bytes());
    }

    #[test]
    fn test_push_unit_closes_and_reopens() {
        let config = EncoderConfig::new(25, LineEnding::CrLf).unwrap();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 0);

        for _ in 0..3 {
            writer.push_unit(Scheme::Q, b"=C3=A4");
        }
        writer.close();

        assert_eq!(
            out,
            b"=?utf-8?q?=C3=A4=C3=A4?=\r\n\t=?utf-8?q?=C3=A4?=".as_slice()
        );
    }

    #[test]
    fn test_push_other_scheme_folds() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 0);

        writer.push(Scheme::Q, b"a");
        writer.push(Scheme::B, b"w6Q=");
        assert_eq!(writer.state(), State::InWord(Scheme::B));
        assert_eq!(writer.column(), 1 + 10 + 4);
        writer.close();

        assert_eq!(out, b"=?utf-8?q?a?=\n\t=?utf-8?b?w6Q=?=".as_slice());
    }

    #[test]
    fn test_huge_start_column() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, usize::MAX);

        assert_eq!(writer.room(), 0);
        writer.push_unit(Scheme::Q, b"=C3=A4");
        writer.close();

        assert_eq!(out, b"\n\t=?utf-8?q?=C3=A4?=".as_slice());

        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, usize::MAX);
        writer.write_literal(b"a");
        writer.push(Scheme::B, b"w6Q=");
        writer.close();
        assert_eq!(writer.column(), usize::MAX);
    }

    #[test]
    fn test_oversized_unit_is_written() {
        let config = EncoderConfig::new(25, LineEnding::Lf).unwrap();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 1);

        writer.push_unit(Scheme::B, b"AAAAAAAAAAAAAAAA");
        writer.close();

        assert_eq!(out, b"=?utf-8?b?AAAAAAAAAAAAAAAA?=".as_slice());
    }

    #[test]
    fn test_literal_and_line_endings() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let mut writer = WordWriter::new(&mut out, &config, 0);

        writer.write_literal(b"a ");
        writer.push(Scheme::B, b"w6Q=");
        writer.write_literal(b" b");
        assert_eq!(writer.column(), 2 + 16 + 2);
        writer.write_line_ending(b"\r\n");
        assert_eq!(writer.column(), 0);
        assert!(!writer.can_fold());
        writer.write_literal(b"\t");
        assert!(!writer.can_fold());
        writer.write_literal(b"c");
        assert!(writer.can_fold());

        assert_eq!(out, b"a =?utf-8?b?w6Q=?= b\r\n\tc".as_slice());
    }
}
