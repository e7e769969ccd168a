//! One-way viewport visibility latches and the reveal animations they drive.

pub mod engine;
pub mod group;
pub mod transition;
