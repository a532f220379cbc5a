//! CLI command handling

pub mod apply;
pub mod output;

pub use apply::*;
pub use output::*;
