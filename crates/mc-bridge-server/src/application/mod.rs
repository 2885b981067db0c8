//! Application layer: the chat → server use case.

pub mod forward_chat;

pub use forward_chat::{CommandExecutor, ForwardChatUseCase, ForwardError, ForwardOutcome};
