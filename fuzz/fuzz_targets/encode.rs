#![no_main]

use header_codec::{config::EncoderConfig, encode, testing::assert_encode};
#[cfg(feature = "debug")]
use header_codec::utils::escape_byte_string;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &[u8]| {
    #[cfg(feature = "debug")]
    println!("[!] Input: {}", escape_byte_string(input));

    let output = encode(input);

    #[cfg(feature = "debug")]
    println!("[!] Encoded: {}", escape_byte_string(&output));

    assert_encode(input, &output, &EncoderConfig::default());

    #[cfg(feature = "debug")]
    println!("{}", str::repeat("-", 120));
});
