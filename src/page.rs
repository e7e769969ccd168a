//! The greeting page: section state, interactive widgets and the event-driven
//! session that ties them to the visibility and particle engines.

pub mod audio;
pub mod config;
pub mod lightbox;
pub mod quiz;
pub mod sections;
pub mod session;
pub mod timers;
