pub mod artists;
pub mod cache;
pub mod collaborations;
pub(crate) mod health;
pub mod insights;
pub mod pulse;

pub use health::health_check;
