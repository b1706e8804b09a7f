//! Encoding of whole header values.
//!
//! A header value is split at its line endings into [`Token`]s. Folds found in the input are kept
//! as they are, a bare line ending gets a tab as continuation whitespace. Within a token, the words
//! from the first to the last one that needs encoding become a single encoded run; everything
//! around it is copied.

use std::ops::Range;

use crate::{
    classify::{is_wsp, needs_encoding},
    codec::{word::WordWriter, write_run},
    config::{EncoderConfig, LineEnding, FOLD_WHITESPACE},
    scheme::Scheme,
    utf8::EncodableRun,
};

/// A line of a header value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    /// Inclusive start index relative to the header value.
    pub start: usize,
    /// Exclusive end index relative to the header value (line ending excluded).
    pub end: usize,
    /// The line ending in front of this token, if any.
    pub fold: Option<LineEnding>,
    /// Whether the token starts with continuation whitespace.
    pub continued: bool,
}

impl Token {
    /// The index range relative to the header value.
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the token follows a line ending.
    pub fn is_preceded_by_fold(self) -> bool {
        self.fold.is_some()
    }
}

/// Iterator over the [`Token`]s of a header value.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    value: &'a [u8],
    offset: usize,
    fold: Option<LineEnding>,
    done: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let input = &self.value[self.offset..];
        let start = self.offset;
        let fold = self.fold;

        match input.iter().position(|byte| *byte == b'\n') {
            Some(pos) => {
                let (end, ending) = match pos.checked_sub(1).map(|cr| input[cr]) {
                    Some(b'\r') => (start + pos - 1, LineEnding::CrLf),
                    _ => (start + pos, LineEnding::Lf),
                };

                self.offset = start + pos + 1;
                self.fold = Some(ending);

                Some(self.token(start, end, fold))
            }
            None => {
                self.done = true;

                Some(self.token(start, self.value.len(), fold))
            }
        }
    }
}

impl<'a> Tokens<'a> {
    fn token(&self, start: usize, end: usize, fold: Option<LineEnding>) -> Token {
        Token {
            start,
            end,
            fold,
            continued: self.value[start..end].first().copied().map_or(false, is_wsp),
        }
    }
}

/// Splits `value` into [`Token`]s. `value` always yields at least one (maybe empty) token.
pub fn tokenize(value: &[u8]) -> Tokens {
    Tokens {
        value,
        offset: 0,
        fold: None,
        done: false,
    }
}

/// Removes a single trailing `\n` or `\r\n`.
pub fn strip_line_ending(value: &[u8]) -> &[u8] {
    value
        .strip_suffix(b"\r\n")
        .or_else(|| value.strip_suffix(b"\n"))
        .unwrap_or(value)
}

/// Encodes `value`, starting at column 0, and appends the result to `out`.
pub(crate) fn encode_value(value: &[u8], out: &mut Vec<u8>, config: &EncoderConfig) {
    let value = strip_line_ending(value);
    let mut writer = WordWriter::new(out, config, 0);
    let mut after_word = false;

    for token in tokenize(value) {
        let line = &value[token.range()];

        if let Some(ending) = token.fold {
            writer.write_line_ending(ending.as_bytes());

            if !token.continued {
                writer.write_literal(&[FOLD_WHITESPACE]);
            }
        }

        after_word = encode_line(&mut writer, line, after_word);
    }
}

/// Encodes a single line.
///
/// `after_word` tells whether the output so far ends with an encoded-word (ignoring whitespace).
/// Returns the same information after the line was written.
fn encode_line(writer: &mut WordWriter, line: &[u8], after_word: bool) -> bool {
    let Some(span) = encoded_span(line) else {
        writer.write_literal(line);
        return after_word && line.iter().copied().all(is_wsp);
    };

    writer.write_literal(&line[..span.start]);

    // Whitespace between two encoded-words is dropped by decoders. Keep the separator inside
    // the run instead.
    let separator = after_word && line[..span.start].iter().copied().all(is_wsp);

    let scheme = Scheme::for_text(line, span.clone());
    let run = if separator {
        let mut raw = Vec::with_capacity(span.len() + 1);
        raw.push(b' ');
        raw.extend_from_slice(&line[span.clone()]);
        EncodableRun::repair(&raw)
    } else {
        EncodableRun::repair(&line[span.clone()])
    };

    write_run(writer, scheme, &run);
    writer.write_literal(&line[span.end..]);

    line[span.end..].iter().copied().all(is_wsp)
}

/// The range of `line` that must be encoded, widened to whole words.
fn encoded_span(line: &[u8]) -> Option<Range<usize>> {
    let first = (0..line.len()).find(|index| needs_encoding(line, *index))?;
    let last = (first..line.len())
        .rev()
        .find(|index| needs_encoding(line, *index))
        .unwrap_or(first);

    let start = line[..first]
        .iter()
        .rposition(|byte| is_wsp(*byte))
        .map_or(0, |pos| pos + 1);
    let end = line[last..]
        .iter()
        .position(|byte| is_wsp(*byte))
        .map_or(line.len(), |pos| last + pos);

    Some(start..end)
}
