#![no_main]

use gaply_gateway::models::{OpenAccessInfo, WorksPage};
use gaply_gateway::search::project;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(page) = serde_json::from_slice::<WorksPage>(data) {
        for work in page.results {
            let _ = project(work);
        }
    }
    if let Ok(info) = serde_json::from_slice::<OpenAccessInfo>(data) {
        let _ = info.best_url();
    }
});
