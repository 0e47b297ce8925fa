//! Chassis lineup analyzer
//!
//! Computes damper lengths from suspension hardpoint surveys, ranks front and
//! rear clip combinations per corner, and pairs clips with center sections
//! using a weighted greedy optimizer.

pub mod cli;
pub mod core;
pub mod entities;
