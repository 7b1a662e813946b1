//! Route handlers

pub mod chat;
pub mod conversations;
pub mod memory;
pub mod presentations;
pub mod status;
pub mod system;
pub mod teams;
