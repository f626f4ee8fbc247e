#![no_main]

use libfuzzer_sys::fuzz_target;
use stream::{ByteReader, FloatWidth};

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 6;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_u8();
            }
            1 => {
                let _ = reader.read_u16();
            }
            2 => {
                let _ = reader.read_u32();
            }
            3 => {
                let _ = reader.read_float(FloatWidth::Single);
            }
            4 => {
                let _ = reader.read_float(FloatWidth::Double);
            }
            _ => {
                let _ = reader.read_str16();
            }
        }
    }
});
