//! Encoded-word decoder and checks for encoder output.
//!
//! Only the forms written by this crate are accepted, e.g., Q escapes must use upper-case hex and B
//! payloads must be padded.

use abnf_core::is_ctl;
use base64::{
    engine::general_purpose::STANDARD as base64, DecodeError as Base64DecodeError, Engine,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    combinator::{eof, value},
    sequence::{terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::{
    classify::{classify, ByteClass},
    config::EncoderConfig,
    fold::strip_line_ending,
    scheme::Scheme,
    utf8::EncodableRun,
    utils::escape_byte_string,
};

/// An encoded-word found in encoder output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodedWord<'a> {
    pub scheme: Scheme,
    pub payload: &'a [u8],
}

impl<'a> EncodedWord<'a> {
    /// Decodes the payload.
    pub fn decode(&self) -> Result<String, DecodeError> {
        let bytes = match self.scheme {
            Scheme::Q => decode_q(self.payload)?,
            Scheme::B => base64.decode(self.payload)?,
        };

        Ok(String::from_utf8(bytes)?)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    #[error("Malformed encoded-word \"{0}\"")]
    Malformed(String),
    #[error("Unexpected byte 0x{0:02x} in Q payload")]
    UnexpectedByte(u8),
    #[error("Truncated escape in Q payload")]
    TruncatedEscape,
    #[error("Invalid B payload: {0}")]
    Base64(#[from] Base64DecodeError),
    #[error("Payload is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// `encoded-word = "=?" charset "?" encoding "?" encoded-text "?="`
pub fn encoded_word(input: &[u8]) -> IResult<&[u8], EncodedWord<'_>> {
    let mut parser = tuple((
        tag_no_case("=?utf-8?"),
        alt((
            value(Scheme::Q, tag_no_case("q?")),
            value(Scheme::B, tag_no_case("b?")),
        )),
        take_while(|byte: u8| byte != b'?'),
        tag("?="),
    ));

    parser(input)
        .map(|(remaining, (_, scheme, payload, _))| (remaining, EncodedWord { scheme, payload }))
}

/// Parses `chunk` as a complete encoded-word.
pub fn parse_word(chunk: &[u8]) -> Option<EncodedWord<'_>> {
    terminated(encoded_word, eof)(chunk)
        .ok()
        .map(|(_, word)| word)
}

fn decode_q(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoded = Vec::with_capacity(payload.len());
    let mut index = 0;

    while index < payload.len() {
        match payload[index] {
            b'_' => decoded.push(b' '),
            b'=' => {
                let hex = payload
                    .get(index + 1..index + 3)
                    .ok_or(DecodeError::TruncatedEscape)?;
                let high = hex_value(hex[0]).ok_or(DecodeError::UnexpectedByte(hex[0]))?;
                let low = hex_value(hex[1]).ok_or(DecodeError::UnexpectedByte(hex[1]))?;

                decoded.push((high << 4) | low);
                index += 2;
            }
            byte if classify(byte) == ByteClass::Literal => decoded.push(byte),
            byte => return Err(DecodeError::UnexpectedByte(byte)),
        }

        index += 1;
    }

    Ok(decoded)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Folding whitespace as seen by a decoder.
fn is_fws(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Non-empty runs of non-whitespace and their offsets.
fn chunks(output: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    let mut offset = 0;

    output
        .split(|byte| is_fws(*byte))
        .map(move |chunk| {
            let start = offset;
            offset += chunk.len() + 1;
            (start, chunk)
        })
        .filter(|(_, chunk)| !chunk.is_empty())
}

/// Decodes encoder output.
///
/// Whitespace between two encoded-words is dropped, any other whitespace run becomes a single space.
pub fn decode(output: &[u8]) -> Result<String, DecodeError> {
    let mut decoded = String::new();
    let mut first = true;
    let mut after_word = false;

    for (_, chunk) in chunks(output) {
        match parse_word(chunk) {
            Some(word) => {
                if !first && !after_word {
                    decoded.push(' ');
                }
                decoded.push_str(&word.decode()?);
                after_word = true;
            }
            None if chunk.starts_with(b"=?") => {
                return Err(DecodeError::Malformed(escape_byte_string(chunk)));
            }
            None => {
                if !first {
                    decoded.push(' ');
                }
                decoded.push_str(&String::from_utf8(chunk.to_vec())?);
                after_word = false;
            }
        }

        first = false;
    }

    Ok(decoded)
}

/// Collapses whitespace runs into a single space and trims the ends.
pub fn canonicalize(text: &str) -> String {
    text.split(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Output is 7-bit, free of controls, and every line ending is followed by whitespace.
pub fn assert_seven_bit(output: &[u8]) {
    for (index, byte) in output.iter().enumerate() {
        let next = output.get(index + 1);

        assert!(byte.is_ascii(), "8-bit byte in \"{}\"", escape_byte_string(output));

        match byte {
            b'\r' => assert_eq!(
                next,
                Some(&b'\n'),
                "Bare CR in \"{}\"",
                escape_byte_string(output)
            ),
            b'\n' => assert!(
                matches!(next, Some(b' ' | b'\t')),
                "Line ending without continuation in \"{}\"",
                escape_byte_string(output)
            ),
            b'\t' => {}
            _ => assert!(
                !is_ctl(*byte),
                "Control in \"{}\"",
                escape_byte_string(output)
            ),
        }
    }
}

/// Every word that looks like an encoded-word is one, and its payload holds complete characters.
pub fn assert_words(output: &[u8]) -> Vec<EncodedWord<'_>> {
    let mut words = Vec::new();

    for (_, chunk) in chunks(output) {
        if !chunk.starts_with(b"=?") {
            continue;
        }

        let word = parse_word(chunk)
            .unwrap_or_else(|| panic!("Malformed word \"{}\"", escape_byte_string(chunk)));

        if let Err(error) = word.decode() {
            panic!("{error} in \"{}\"", escape_byte_string(chunk));
        }

        words.push(word);
    }

    words
}

/// No line is longer than the configured maximum up to the end of its last encoded-word.
pub fn assert_line_budget(output: &[u8], config: &EncoderConfig) {
    for line in output.split(|byte| *byte == b'\n') {
        let end = chunks(line)
            .filter(|(_, chunk)| parse_word(chunk).is_some())
            .map(|(offset, chunk)| offset + chunk.len())
            .last();

        if let Some(end) = end {
            assert!(
                end <= config.max_line_len(),
                "Line of {end} bytes in \"{}\"",
                escape_byte_string(output)
            );
        }
    }
}

/// Decoding `output` gives `value` (repaired, without trailing line ending) modulo whitespace.
pub fn assert_round_trip(value: &[u8], output: &[u8]) {
    let expected = EncodableRun::repair(strip_line_ending(value));
    let decoded = decode(output)
        .unwrap_or_else(|error| panic!("{error} in \"{}\"", escape_byte_string(output)));

    assert_eq!(
        canonicalize(&decoded),
        canonicalize(expected.as_str()),
        "\"{}\" encoded as \"{}\"",
        escape_byte_string(value),
        escape_byte_string(output)
    );
}

/// All checks for the output of a header value encoding.
pub fn assert_encode(value: &[u8], output: &[u8], config: &EncoderConfig) {
    assert_seven_bit(output);
    assert_words(output);
    assert_line_budget(output, config);
    assert_round_trip(value, output);
}

/// All checks for the output of a data encoding.
pub fn assert_encode_data(data: &[u8], output: &[u8], config: &EncoderConfig) {
    assert_seven_bit(output);
    assert_line_budget(output, config);

    let run = EncodableRun::repair(data);
    let scheme = Scheme::cheapest(&run);

    for (_, chunk) in chunks(output) {
        let word = parse_word(chunk)
            .unwrap_or_else(|| panic!("Literal \"{}\" in data", escape_byte_string(chunk)));
        assert_eq!(word.scheme, scheme, "{}", escape_byte_string(output));
    }

    let decoded = decode(output)
        .unwrap_or_else(|error| panic!("{error} in \"{}\"", escape_byte_string(output)));
    assert_eq!(decoded, run.as_str());
}
