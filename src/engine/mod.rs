pub mod hint;
pub mod matcher;
pub mod metrics;
pub mod scoring;
pub mod shuffle;

pub use hint::{HintPolicy, HintTracker, RevealThreshold};
pub use metrics::{Stats, compute_stats};
