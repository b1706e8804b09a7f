//! # Header Encoder
//!
//! header-codec turns unstructured mail header values into text that is safe to transmit in a
//! 7-bit header field. Words that contain 8-bit bytes, control characters, or something that looks
//! like the start of an [RFC 2047] encoded-word are written as `=?utf-8?q?...?=` or
//! `=?utf-8?b?...?=`, everything else is copied as it is.
//!
//! ## Example
//!
//! ```rust
//! use header_codec::encode;
//!
//! let encoded = encode("Grüße aus Köln".as_bytes());
//!
//! assert_eq!(encoded, b"=?utf-8?q?Gr=C3=BC=C3=9Fe_aus_K=C3=B6ln?=");
//! ```
//!
//! ## Folding
//!
//! Lines are folded so that encoded-words don't exceed 76 characters per line (including the
//! `=?utf-8?q?` prefix and the `?=` suffix). A fold is a line ending followed by a tab. Folds that
//! are already part of the header value are kept, and a line ending that isn't followed by
//! whitespace becomes a fold. A single trailing line ending is removed.
//!
//! Folding never splits a character: all escapes of a character stay in the same encoded-word,
//! and every B encoded-word carries a complete base64 string.
//!
//! ## Malformed input
//!
//! Encoding never fails. Invalid UTF-8 is replaced by U+FFFD (one replacement character for every
//! contiguous run of invalid bytes) and reported through the [log] crate.
//!
//! ## Configuration
//!
//! The line length and the line ending used for inserted folds can be changed with an
//! [`EncoderConfig`](config::EncoderConfig) passed to [`HeaderEncoder::new`].
//!
//! ```rust
//! use header_codec::{
//!     config::{EncoderConfig, LineEnding},
//!     HeaderEncoder,
//! };
//!
//! let encoder = HeaderEncoder::new(EncoderConfig::new(40, LineEnding::CrLf).unwrap());
//! let encoded = encoder.encode("ä".repeat(15).as_bytes());
//!
//! assert_eq!(
//!     encoded,
//!     b"=?utf-8?b?w6TDpMOkw6TDpMOkw6TDpMOkw6Q=?=\r\n\t=?utf-8?b?w6TDpMOkw6TDpA==?=",
//! );
//! ```
//!
//! # Features
//!
//! | Feature | Description                                                              | Enabled by default |
//! |---------|--------------------------------------------------------------------------|--------------------|
//! | fuzz    | Expose the `testing` module (encoded-word decoder and property checks).   | No                 |
//! | serde   | Derive `serde`s `Serialize` and `Deserialize` for the configuration.      | No                 |
//!
//! [RFC 2047]: https://datatracker.ietf.org/doc/html/rfc2047

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classify;
mod codec;
pub mod config;
pub mod error;
pub mod fold;
pub mod scheme;
#[cfg(any(test, feature = "fuzz"))]
#[cfg_attr(docsrs, doc(cfg(feature = "fuzz")))]
pub mod testing;
pub mod utf8;
pub mod utils;

use std::io::Write;

use crate::{
    codec::{word::WordWriter, write_run},
    config::EncoderConfig,
    scheme::Scheme,
    utf8::EncodableRun,
    utils::escape_byte_string,
};

/// Encoder for header values.
///
/// The encoder only holds its (immutable) configuration and can be shared freely.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct HeaderEncoder {
    config: EncoderConfig,
}

impl HeaderEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes a header value.
    ///
    /// The value is assumed to start at column 0.
    pub fn encode(&self, value: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(value.len());
        self.encode_into(value, &mut out);
        out
    }

    /// Like [`HeaderEncoder::encode`], but appends to `out`.
    pub fn encode_into(&self, value: &[u8], out: &mut Vec<u8>) {
        log::trace!("Encoding header value \"{}\"", escape_byte_string(value));

        fold::encode_value(value, out, &self.config);
    }

    /// Like [`HeaderEncoder::encode`], but writes into `writer`.
    pub fn encode_to(&self, value: &[u8], writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(&self.encode(value))
    }

    /// Encodes `data` as Q encoded-words, starting at `start_column`.
    pub fn encode_q(&self, data: &[u8], out: &mut Vec<u8>, start_column: usize) {
        self.encode_with(Scheme::Q, data, out, start_column);
    }

    /// Encodes `data` as B encoded-words, starting at `start_column`.
    pub fn encode_b(&self, data: &[u8], out: &mut Vec<u8>, start_column: usize) {
        self.encode_with(Scheme::B, data, out, start_column);
    }

    /// Encodes all of `data` as encoded-words, using the scheme with the shorter payload.
    ///
    /// Nothing is copied literally and line endings in `data` are encoded, too.
    pub fn encode_data(&self, data: &[u8], out: &mut Vec<u8>) {
        let run = EncodableRun::repair(data);
        let scheme = Scheme::cheapest(&run);

        write_run(&mut WordWriter::new(out, &self.config, 0), scheme, &run);
    }

    fn encode_with(&self, scheme: Scheme, data: &[u8], out: &mut Vec<u8>, start_column: usize) {
        let run = EncodableRun::repair(data);

        write_run(&mut WordWriter::new(out, &self.config, start_column), scheme, &run);
    }
}

/// Encodes a header value with the default configuration.
///
/// See [`HeaderEncoder::encode`].
pub fn encode(value: &[u8]) -> Vec<u8> {
    HeaderEncoder::default().encode(value)
}

/// Encodes `data` as Q encoded-words with the default configuration.
///
/// See [`HeaderEncoder::encode_q`].
pub fn encode_q(data: &[u8], out: &mut Vec<u8>, start_column: usize) {
    HeaderEncoder::default().encode_q(data, out, start_column)
}

/// Encodes `data` as B encoded-words with the default configuration.
///
/// See [`HeaderEncoder::encode_b`].
pub fn encode_b(data: &[u8], out: &mut Vec<u8>, start_column: usize) {
    HeaderEncoder::default().encode_b(data, out, start_column)
}

/// Encodes all of `data` as encoded-words with the default configuration.
///
/// See [`HeaderEncoder::encode_data`].
pub fn encode_data(data: &[u8], out: &mut Vec<u8>) {
    HeaderEncoder::default().encode_data(data, out)
}
