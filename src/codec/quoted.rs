//! The Q scheme.
//!
//! Every character is an atomic unit: the escapes of a multi-byte character always end up in the
//! same encoded-word.

use super::word::WordWriter;
use crate::{
    classify::{classify, ByteClass},
    scheme::Scheme,
    utf8::EncodableRun,
};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Longest escape of a single character (four escaped bytes).
const MAX_UNIT_LEN: usize = 4 * 3;

/// Escapes one character into `buf` and returns the written part.
pub(crate) fn escape_char(c: char, buf: &mut [u8; MAX_UNIT_LEN]) -> &[u8] {
    let mut utf8 = [0; 4];
    let mut len = 0;

    for &byte in c.encode_utf8(&mut utf8).as_bytes() {
        match classify(byte) {
            ByteClass::Literal => {
                buf[len] = byte;
                len += 1;
            }
            ByteClass::Space => {
                buf[len] = b'_';
                len += 1;
            }
            ByteClass::Escaped => {
                buf[len] = b'=';
                buf[len + 1] = HEX[(byte >> 4) as usize];
                buf[len + 2] = HEX[(byte & 0x0f) as usize];
                len += 3;
            }
        }
    }

    &buf[..len]
}

/// Writes `run` as one or more Q encoded-words.
pub(crate) fn write(writer: &mut WordWriter, run: &EncodableRun) {
    let mut buf = [0; MAX_UNIT_LEN];

    for c in run.as_str().chars() {
        let unit = escape_char(c, &mut buf);
        writer.push_unit(Scheme::Q, unit);
    }

    writer.close();
}
