// Core data models for Eisen
// These structs represent the domain entities

pub mod task;
pub mod settings;
pub mod stats;

pub use task::*;
pub use settings::*;
pub use stats::*;
