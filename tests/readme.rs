use header_codec::{
    config::{EncoderConfig, LineEnding},
    HeaderEncoder,
};

#[test]
fn test_from_readme() {
    let encoder = HeaderEncoder::new(EncoderConfig::new(76, LineEnding::CrLf).unwrap());

    let mut header = b"Subject: ".to_vec();
    encoder
        .encode_to("Grüße aus Köln\r\n".as_bytes(), &mut header)
        .unwrap();

    let header = String::from_utf8(header).unwrap(); // The output is always 7-bit.
    println!("{}", header);

    assert_eq!(header, "Subject: =?utf-8?q?Gr=C3=BC=C3=9Fe_aus_K=C3=B6ln?=");
}
