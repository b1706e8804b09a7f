//! The B scheme.
//!
//! Base64 groups are not independently decodable, so every encoded-word carries a complete,
//! padded base64 string of whole characters.

use base64::{engine::general_purpose::STANDARD as base64, Engine};

use super::word::WordWriter;
use crate::{scheme::Scheme, utf8::EncodableRun};

/// Length of the longest prefix of `text` that has at most `max` bytes and ends on a character
/// boundary.
fn char_prefix_len(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }

    (0..=max)
        .rev()
        .find(|index| text.is_char_boundary(*index))
        .unwrap_or(0)
}

/// Writes `run` as one or more B encoded-words.
pub(crate) fn write(writer: &mut WordWriter, run: &EncodableRun) {
    let mut rest = run.as_str();

    while !rest.is_empty() {
        let take = match char_prefix_len(rest, writer.room() / 4 * 3) {
            0 if writer.can_fold() => {
                writer.fold();
                continue;
            }
            0 => {
                let first = rest.chars().next().map_or(rest.len(), char::len_utf8);
                log::warn!("Character of {first} bytes exceeds the line length");
                first
            }
            take => take,
        };

        let (chunk, remainder) = rest.split_at(take);
        writer.push(Scheme::B, base64.encode(chunk).as_bytes());
        writer.close();

        rest = remainder;
        if !rest.is_empty() {
            writer.fold();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;

    #[test]
    fn test_char_prefix_len() {
        let tests = [
            ("", 10, 0),
            ("abc", 10, 3),
            ("abc", 2, 2),
            ("äää", 3, 2),
            ("äää", 4, 4),
            ("äää", 1, 0),
            ("a💌", 4, 1),
        ];

        for (text, max, expected) in tests {
            assert_eq!(char_prefix_len(text, max), expected, "{text:?} / {max}");
        }
    }

    #[test]
    fn test_write() {
        let tests: &[(&[u8], usize, &str)] = &[
            (b"", 0, ""),
            (&[0; 10], 0, "=?utf-8?b?AAAAAAAAAAAAAA==?="),
            (b"\xc3\xa4\xc3\xa4 \xc3\xa4", 2, "=?utf-8?b?w6TDpCDDpA==?="),
            (b"f-\x80\x80\x80-b", 0, "=?utf-8?b?Zi3vv70tYg==?="),
            (b"\x80\x80\x80\x80", 0, "=?utf-8?b?77+9?="),
            (b"\xc3\xa4", 61, "\n\t=?utf-8?b?w6Q=?="),
            (b"\xc3\xa4", 60, "=?utf-8?b?w6Q=?="),
        ];

        let config = EncoderConfig::default();
        for (test, column, expected) in tests {
            let mut out = Vec::new();
            let run = EncodableRun::repair(test);
            write(&mut WordWriter::new(&mut out, &config, *column), &run);
            assert_eq!(
                std::str::from_utf8(&out).unwrap(),
                *expected,
                "{:?} at {column}",
                test
            );
        }
    }

    #[test]
    fn test_write_splits_on_characters() {
        let config = EncoderConfig::default();
        let mut out = Vec::new();
        let run = EncodableRun::repair("ä".repeat(30).as_bytes());
        write(&mut WordWriter::new(&mut out, &config, 0), &run);

        // 64 bytes of room hold 16 groups, i.e., 48 bytes or 24 characters. The continuation
        // line has room for 63 bytes, i.e., 15 groups.
        let output = std::str::from_utf8(&out).unwrap();
        let words: Vec<&str> = output.split("\n\t").collect();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], format!("=?utf-8?b?{}?=", base64.encode("ä".repeat(24))));
        assert_eq!(words[1], format!("=?utf-8?b?{}?=", base64.encode("ä".repeat(6))));
        assert!(words[0].len() <= 76);
    }
}
