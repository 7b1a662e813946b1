//! Core type definitions

pub mod conversation;
pub mod message;
pub mod service;
pub mod team;

pub use conversation::*;
pub use message::*;
pub use service::*;
pub use team::*;
