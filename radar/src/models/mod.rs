mod candidate;
mod collaboration;
mod common;
mod insight;
mod profile;
mod pulse;
mod roster;
mod scene;
mod score;

pub use candidate::*;
pub use collaboration::*;
pub use common::*;
pub use insight::*;
pub use profile::*;
pub use pulse::*;
pub use roster::*;
pub use scene::*;
pub use score::*;
