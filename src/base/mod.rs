pub mod item;
pub mod spec;
