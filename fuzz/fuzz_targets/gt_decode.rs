//! Fuzz target for decoding and parsing whole ground-truth files.
//!
//! Arbitrary bytes go through the encoding fallback and the file parser.

#![no_main]

use gtprep::gt::encoding::decode_with_fallback;
use gtprep::gt::io_gt_txt::from_gt_str;
use gtprep::gt::TextEncoding;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Some((encoding, text)) = decode_with_fallback(data, &TextEncoding::DEFAULT_CANDIDATES) {
        let _ = from_gt_str(&text, encoding);
    }
});
