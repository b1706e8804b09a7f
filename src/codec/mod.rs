//! Encoded-word encoders.

mod base64;
mod quoted;
pub(crate) mod word;

use self::word::WordWriter;
use crate::{scheme::Scheme, utf8::EncodableRun};

/// Writes `run` in the given scheme, folding as needed.
pub(crate) fn write_run(writer: &mut WordWriter, scheme: Scheme, run: &EncodableRun) {
    log::trace!("Encoding {} bytes with scheme {:?}", run.len(), scheme);

    match scheme {
        Scheme::Q => quoted::write(writer, run),
        Scheme::B => self::base64::write(writer, run),
    }
}
