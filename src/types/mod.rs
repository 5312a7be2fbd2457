//! Shared data structures for the insight pipeline:
//! - Feature schemas and validated feature vectors
//! - Recommendation records and priorities
//! - Combined insight, benchmark, and comparison payloads

mod features;
mod insight;

pub use features::*;
pub use insight::*;
