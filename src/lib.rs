//! deepseek-commit - Generates git commit messages for staged changes with DeepSeek.
//!
//! # Overview
//!
//! deepseek-commit reads the staged diff, file list and branch through the git
//! CLI, renders a prompt for the configured language and commit style, and
//! asks the DeepSeek chat-completion API for a message, retrying transient
//! failures with exponential backoff.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod i18n;
pub mod llm;

// Re-export commonly used types
pub use commit::{SuggestOutcome, build_commit_prompt, clean_message, suggest_commit_message};
pub use config::{CommitStyle, Language, Settings};
pub use error::{ConfigError, GenerationError, GitError, SuggestError};
pub use git::{RepositoryInspector, RepositorySnapshot};
pub use llm::{CommitMessageGenerator, CredentialStatus, GenerationOutcome};
