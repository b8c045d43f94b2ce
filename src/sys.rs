//! The boundary to the host application.

pub mod client;
pub mod event;
pub mod memory;
