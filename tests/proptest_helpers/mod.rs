#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Label text without line breaks; commas, quotes, tabs and unicode allowed.
pub fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.:;'\"\t€é-]{1,24}".prop_map(|s| s.trim().to_string())
}

/// A coordinate as an annotation tool might write it.
pub fn arb_coord() -> impl Strategy<Value = (i64, String)> {
    prop_oneof![
        (-50i64..400).prop_map(|v| (v, v.to_string())),
        (0i64..400, 0u8..10).prop_map(|(v, frac)| (v, format!("{v}.{frac}"))),
    ]
}

pub fn arb_quad() -> impl Strategy<Value = Vec<(i64, String)>> {
    prop::collection::vec(arb_coord(), 8)
}

/// Renders one annotation line.
pub fn render_line(coords: &[(i64, String)], label: &str) -> String {
    let fields: Vec<&str> = coords.iter().map(|(_, raw)| raw.as_str()).collect();
    format!("{},{}", fields.join(","), label)
}
