#![no_main]

#[cfg(feature = "debug")]
use header_codec::utils::escape_byte_string;
use header_codec::{
    config::{EncoderConfig, LineEnding, MIN_LINE_LEN},
    testing::assert_encode,
    HeaderEncoder,
};
use libfuzzer_sys::fuzz_target;

// The first byte selects the configuration.
fuzz_target!(|input: &[u8]| {
    let Some((&selector, input)) = input.split_first() else {
        return;
    };

    let max_line_len = MIN_LINE_LEN + usize::from(selector & 0x7f);
    let line_ending = if selector & 0x80 == 0 {
        LineEnding::Lf
    } else {
        LineEnding::CrLf
    };
    let config = EncoderConfig::new(max_line_len, line_ending).unwrap();

    #[cfg(feature = "debug")]
    println!("[!] Config: {config:?}, input: {}", escape_byte_string(input));

    let output = HeaderEncoder::new(config).encode(input);

    #[cfg(feature = "debug")]
    println!("[!] Encoded: {}", escape_byte_string(&output));

    assert_encode(input, &output, &config);

    #[cfg(feature = "debug")]
    println!("{}", str::repeat("-", 120));
});
