//! Classification of bytes in header text and in Q payloads.

use abnf_core::is_ctl;

/// How a byte is written into a Q payload.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ByteClass {
    /// Written as is.
    Literal,
    /// Written as `_`.
    Space,
    /// Written as `=XX`.
    Escaped,
}

impl ByteClass {
    /// Number of payload bytes needed for this byte.
    pub const fn width(self) -> usize {
        match self {
            ByteClass::Literal | ByteClass::Space => 1,
            ByteClass::Escaped => 3,
        }
    }
}

const fn q_class(byte: u8) -> ByteClass {
    match byte {
        b' ' => ByteClass::Space,
        b'=' | b'?' | b'_' => ByteClass::Escaped,
        0x21..=0x7e => ByteClass::Literal,
        _ => ByteClass::Escaped,
    }
}

const fn q_table() -> [ByteClass; 256] {
    let mut table = [ByteClass::Escaped; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = q_class(i as u8);
        i += 1;
    }
    table
}

static Q_TABLE: [ByteClass; 256] = q_table();

/// Classifies a byte for the Q scheme.
///
/// `=`, `?`, and `_` are escaped because they are meaningful inside an encoded-word.
#[inline]
pub fn classify(byte: u8) -> ByteClass {
    Q_TABLE[byte as usize]
}

/// `WSP = SP / HTAB`
#[inline]
pub fn is_wsp(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Whether the byte at `index` forces the surrounding word of `line` to be encoded.
///
/// This is the case for 8-bit bytes, for controls except HTAB, and for an `=?` that starts a word
/// (and would otherwise be taken as the start of an encoded-word). `line` must not contain the
/// line ending.
pub fn needs_encoding(line: &[u8], index: usize) -> bool {
    let byte = line[index];

    if byte >= 0x80 {
        return true;
    }

    if byte == b'\t' {
        return false;
    }

    if is_ctl(byte) {
        return true;
    }

    byte == b'='
        && line.get(index + 1) == Some(&b'?')
        && (index == 0 || is_wsp(line[index - 1]))
}
