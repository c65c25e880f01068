//! Helpers shared between days

pub mod counter;
pub mod dot;
pub mod dp_cache;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod math;
pub mod parse;
