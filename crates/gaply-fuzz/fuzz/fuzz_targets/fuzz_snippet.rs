#![no_main]

use gaply_gateway::models::InvertedAbstract;
use gaply_gateway::search::{MAX_CHARS, generate_snippet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(index) = serde_json::from_slice::<InvertedAbstract>(data) {
        let snippet = generate_snippet(Some(&index));
        let body = snippet.strip_suffix("...").unwrap_or(&snippet);
        assert!(body.chars().count() <= MAX_CHARS);
    }
});
