// Utility functions module
pub mod config;
pub mod duration;
pub mod logging;
pub mod time;
