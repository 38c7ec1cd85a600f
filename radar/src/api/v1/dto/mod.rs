//! Query parameters and response bodies for the v1 API that have no
//! counterpart in `crate::models`.

mod cache;
mod collaborations;
mod insights;
mod radar;

pub use cache::*;
pub use collaborations::*;
pub use insights::*;
pub use radar::*;
