mod computer;
pub mod math;
mod model;

pub use computer::*;
pub use model::*;
