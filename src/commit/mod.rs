//! Commit message prompt, cleanup and the suggest workflow.

pub mod message;
pub mod prompt;
pub mod workflow;

pub use message::clean_message;
pub use prompt::{build_commit_prompt, style_instruction};
pub use workflow::{SuggestOutcome, suggest_commit_message};
