//! Helpers for printing raw header bytes.

use std::fmt::Write;

/// Renders `bytes` printable, escaping controls, backslashes, and 8-bit bytes.
pub fn escape_byte_string(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());

    for byte in bytes {
        match byte {
            b'\t' => escaped.push_str("\\t"),
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\\' => escaped.push_str("\\\\"),
            0x20..=0x7e => escaped.push(*byte as char),
            _ => {
                let _ = write!(escaped, "\\x{:02x}", byte);
            }
        }
    }

    escaped
}
