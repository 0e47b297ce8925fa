//! CLI command implementations

pub mod analyze;
pub mod completions;
pub mod config;
pub mod lineup;
pub mod rollup;
pub mod whatif;
