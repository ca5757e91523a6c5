//! Fuzz target for ground-truth line parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the line parser and derives
//! crop regions from whatever quads come out, checking for panics,
//! overflows, or hangs.

#![no_main]

use gtprep::gt::io_gt_txt::fuzz_parse_gt_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_gt_line(line);
});
