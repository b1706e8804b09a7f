//! Selection between the Q and the B scheme.

use std::ops::Range;

use crate::{
    classify::{classify, needs_encoding},
    utf8::EncodableRun,
};

/// Encoding scheme of an encoded-word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scheme {
    /// Quoted-printable-like, only unsafe bytes are escaped.
    Q,
    /// Base64 of the whole payload.
    B,
}

impl Scheme {
    /// Tag written between charset and payload.
    pub fn tag(self) -> &'static str {
        match self {
            Scheme::Q => "q",
            Scheme::B => "b",
        }
    }

    /// Projected payload length of `run` in this scheme.
    pub fn cost(self, run: &[u8]) -> usize {
        match self {
            Scheme::Q => q_cost(run),
            Scheme::B => b_cost(run.len()),
        }
    }

    /// The scheme with the shorter payload for `run`. Ties favor Q.
    pub fn cheapest(run: &EncodableRun) -> Self {
        if q_cost(run.as_bytes()) <= b_cost(run.len()) {
            Scheme::Q
        } else {
            Scheme::B
        }
    }

    /// The scheme for a span of header text.
    ///
    /// `span` is a range of `line` (which must not contain the line ending). Q is used unless
    /// escaping would more than double the span, judged by the bytes that force encoding.
    pub fn for_text(line: &[u8], span: Range<usize>) -> Self {
        let total = span.len();
        let forced = span.filter(|&index| needs_encoding(line, index)).count();

        if 2 * forced <= total + 1 {
            Scheme::Q
        } else {
            Scheme::B
        }
    }
}

/// `3 * escaped + other`
pub fn q_cost(run: &[u8]) -> usize {
    run.iter().map(|byte| classify(*byte).width()).sum()
}

/// `4 * ceil(n / 3)`
pub fn b_cost(len: usize) -> usize {
    (len + 2) / 3 * 4
}
