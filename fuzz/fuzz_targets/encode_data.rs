#![no_main]

use header_codec::{config::EncoderConfig, encode_data, testing::assert_encode_data};
#[cfg(feature = "debug")]
use header_codec::utils::escape_byte_string;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &[u8]| {
    #[cfg(feature = "debug")]
    println!("[!] Input: {}", escape_byte_string(input));

    let mut output = Vec::new();
    encode_data(input, &mut output);

    #[cfg(feature = "debug")]
    println!("[!] Encoded: {}", escape_byte_string(&output));

    assert_encode_data(input, &output, &EncoderConfig::default());

    #[cfg(feature = "debug")]
    println!("{}", str::repeat("-", 120));
});
