mod freshness;

pub use freshness::{CacheStats, FreshnessCache};
