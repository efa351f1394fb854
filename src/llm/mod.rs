//! DeepSeek chat-completion client.

pub mod client;
pub mod retry;
pub mod tokens;
pub mod transport;

pub use client::{CommitMessageGenerator, CredentialStatus, GenerationOutcome};
pub use retry::{MAX_ATTEMPTS, RetryPolicy, retry_with_policy};
pub use tokens::estimate_tokens;
pub use transport::{ChatMessage, ChatRequest, ChatTransport, HttpReply, ReqwestTransport};
