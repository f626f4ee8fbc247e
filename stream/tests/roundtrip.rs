use stream::{ByteReader, ByteSink, ByteWriter, Codec, Deflate, FloatWidth};

#[test]
fn roundtrip_transform_row() {
    let row = [1.0, 0.0, 0.0, 0.25];
    let mut writer = ByteWriter::new();
    for value in row {
        writer.write_float(value, FloatWidth::Double);
    }
    let bytes = writer.finish();
    assert_eq!(bytes.len(), 32);

    let mut reader = ByteReader::new(&bytes);
    for value in row {
        assert_eq!(reader.read_float(FloatWidth::Double).unwrap(), value);
    }
    assert!(reader.is_empty());
}

#[test]
fn roundtrip_through_deflate() {
    let mut writer = ByteWriter::new();
    writer.write_str16("UVANIM_water").unwrap();
    for _ in 0..64 {
        writer.write_float(1.0, FloatWidth::Single);
    }
    let bytes = writer.finish();

    let codec = Deflate::default();
    let packed = codec.compress(&bytes).unwrap();
    let unpacked = codec.decompress(&packed, bytes.len()).unwrap();

    let mut reader = ByteReader::new(&unpacked);
    assert_eq!(reader.read_str16().unwrap(), "UVANIM_water");
    assert_eq!(reader.remaining(), 64 * 4);
}
