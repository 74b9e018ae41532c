// Bot features
pub mod afk;
