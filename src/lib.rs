pub mod bot;
pub mod corpus;
pub mod logic;
pub mod repl;
pub mod storage;
pub mod training;

// Re-export commonly used items
pub use bot::{BotError, ChatBot};
pub use logic::{LogicAdapterConfig, Reply};
pub use repl::{ChatSession, Turn};
