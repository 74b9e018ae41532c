// Data models
pub mod afk;
