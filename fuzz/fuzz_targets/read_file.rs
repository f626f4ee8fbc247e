#![no_main]

use awd::{read_file, read_frames, Limits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::for_testing();

    if let Ok((header, frames)) = read_frames(data, &limits) {
        // Frames must account for every body byte the header declares.
        let framed: usize = frames.iter().map(|f| 10 + f.body.len()).sum();
        assert_eq!(framed, header.body_len as usize);
    }

    let _ = read_file(data, &limits);
});
