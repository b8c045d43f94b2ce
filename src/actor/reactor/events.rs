pub mod config;
pub mod interface;
pub mod lifecycle;
pub mod script;
pub mod tick;
