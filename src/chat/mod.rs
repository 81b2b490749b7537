//! The chat core: persona-aware prompt composition, rule-based tool routing and
//! streamed inference against a local model server.

pub mod history;
pub mod inference;
pub mod intent;
pub mod orchestrator;
pub mod prompt;
pub mod types;

pub use history::HistorySource;
pub use inference::{InferenceClient, OllamaClient};
pub use orchestrator::{ChatOrchestrator, ChatRequest};
pub use types::{ChatReply, PersonaDescriptor};
