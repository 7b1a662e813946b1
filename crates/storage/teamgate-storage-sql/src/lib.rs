//! Teamgate SQL storage
//!
//! SQLite-backed chat history implementing
//! [`teamgate_core::ConversationStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sqlite;

pub use sqlite::SqliteConversationStore;
