//! Fuzzing library for gaply-gateway.
//!
//! Targets cover the untrusted inputs the gateway decodes: OpenAlex and
//! Unpaywall payloads, search request bodies and inverted abstracts.
//!
//! # Usage
//!
//! ```bash
//! cd crates/gaply-fuzz
//! cargo +nightly fuzz run fuzz_work_parse -- -max_total_time=60
//! ```

pub use gaply_gateway::models;
pub use gaply_gateway::search::{did_you_mean, generate_snippet};
