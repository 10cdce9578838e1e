pub mod executor;
pub mod stats;
