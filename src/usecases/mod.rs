//! Application use cases. Orchestrate domain logic via ports.

pub mod chat_service;
pub mod prompt;

pub use chat_service::{ensure_data_dirs, ChatService};
