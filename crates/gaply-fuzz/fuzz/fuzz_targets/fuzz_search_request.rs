#![no_main]

use gaply_gateway::models::{SearchQuery, SearchRequest};
use gaply_gateway::search::did_you_mean;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<SearchRequest>(data) {
        let _ = did_you_mean(&request.q);
        let _ = SearchQuery::try_from(request);
    }
});
