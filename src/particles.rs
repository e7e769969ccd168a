//! Canvas particle engine: ambient floating hearts and click bursts.

pub mod ambient;
pub mod burst;
pub mod engine;
pub mod heart;
