pub mod task;
pub mod stats;

pub use task::*;
pub use stats::*;
