//! Conversation message log: the append-only audit trail and the history
//! window fed to the chat generator.

pub mod log;

pub use log::{MessageLog, NewMessage, StoredMessage};
