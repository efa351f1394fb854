//! Commit message generation against the DeepSeek chat-completion API.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::commit::{build_commit_prompt, clean_message};
use crate::config::Settings;
use crate::error::GenerationError;
use crate::git::RepositorySnapshot;

use super::retry::{RetryPolicy, retry_with_policy};
use super::tokens::{TOKEN_WARNING_THRESHOLD, estimate_tokens};
use super::transport::{
    ChatCompletionResponse, ChatRequest, ChatTransport, ErrorResponse, HttpReply,
    ReqwestTransport,
};

pub const COMMIT_MAX_TOKENS: u32 = 200;
pub const PROBE_MAX_TOKENS: u32 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const PROBE_TIMEOUT_SECS: u64 = 10;
const PROBE_PROMPT: &str = "Hello";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Result of one generation: a cleaned commit message or a classified error.
pub type GenerationOutcome = Result<String, GenerationError>;

/// Result of a credential probe.
#[derive(Debug)]
pub enum CredentialStatus {
    Valid,
    /// The server rejected the credential (HTTP 401).
    Invalid,
    /// No credential was given or configured.
    Empty,
    Failed(GenerationError),
}

/// Generates commit messages for repository snapshots.
///
/// Holds its own copy of the settings; nothing here writes them back to disk.
pub struct CommitMessageGenerator<T: ChatTransport = ReqwestTransport> {
    settings: Settings,
    transport: T,
    retry: RetryPolicy,
}

impl CommitMessageGenerator<ReqwestTransport> {
    pub fn new(settings: Settings) -> Self {
        Self::with_transport(settings, ReqwestTransport::new())
    }
}

impl<T: ChatTransport> CommitMessageGenerator<T> {
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        Self {
            settings,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the credential used for subsequent calls (trimmed).
    pub fn set_credential(&mut self, credential: &str) {
        self.settings.set_api_key(credential);
    }

    /// Generate a commit message for `snapshot`.
    ///
    /// Fails with [`GenerationError::MissingCredential`] before any network
    /// call when no credential is configured.
    pub async fn generate(&self, snapshot: &RepositorySnapshot) -> GenerationOutcome {
        if self.settings.api_key.is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let prompt = build_commit_prompt(
            snapshot,
            self.settings.commit_style,
            self.settings.language,
        );

        let estimated = estimate_tokens(&prompt);
        if estimated > TOKEN_WARNING_THRESHOLD {
            warn!("Prompt may be too long, estimated tokens: {}", estimated);
        } else {
            debug!("Prompt estimated at {} tokens", estimated);
        }

        let request = ChatRequest::completion(
            &self.settings.model,
            prompt,
            self.settings.temperature,
            COMMIT_MAX_TOKENS,
        );

        let message = retry_with_policy(&self.retry, |attempt| {
            let request = &request;
            async move {
                debug!(
                    "Calling {} (attempt {}/{})",
                    self.settings.api_base_url, attempt, self.retry.max_attempts
                );
                self.attempt(request).await
            }
        })
        .await?;

        info!("Generated commit message");
        Ok(message)
    }

    async fn attempt(&self, request: &ChatRequest) -> GenerationOutcome {
        let reply = self
            .transport
            .send(
                &self.settings.api_base_url,
                &self.settings.api_key,
                request,
                Duration::from_secs(REQUEST_TIMEOUT_SECS),
            )
            .await?;

        match reply.status {
            200 => parse_message(&reply.body),
            _ => Err(classify_failure(&reply)),
        }
    }

    /// Probe whether `credential` (or the configured one) is accepted.
    ///
    /// Single attempt with a short timeout and a tiny request; never retried.
    pub async fn test_credential(&self, credential: Option<&str>) -> CredentialStatus {
        let credential = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.settings.api_key.as_str());
        if credential.is_empty() {
            return CredentialStatus::Empty;
        }

        let request = ChatRequest::probe(&self.settings.model, PROBE_PROMPT, PROBE_MAX_TOKENS);
        let reply = self
            .transport
            .send(
                &self.settings.api_base_url,
                credential,
                &request,
                Duration::from_secs(PROBE_TIMEOUT_SECS),
            )
            .await;

        match reply {
            Ok(HttpReply { status: 200, .. }) => CredentialStatus::Valid,
            Ok(HttpReply { status: 401, .. }) => CredentialStatus::Invalid,
            Ok(HttpReply { status, .. }) => CredentialStatus::Failed(GenerationError::ApiError {
                status,
                message: status.to_string(),
            }),
            Err(e) => CredentialStatus::Failed(e.into()),
        }
    }
}

/// Extract and clean `choices[0].message.content` from a 200 body.
fn parse_message(body: &str) -> GenerationOutcome {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenerationError::MalformedResponse(truncate_body(body)))?;

    let message = clean_message(&content);
    if message.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "empty message content".to_string(),
        ));
    }
    Ok(message)
}

/// Map a non-200 reply to its error kind.
fn classify_failure(reply: &HttpReply) -> GenerationError {
    match reply.status {
        401 => GenerationError::InvalidCredential,
        429 => GenerationError::RateLimited,
        status if status >= 500 => GenerationError::ServerError(status),
        status => GenerationError::ApiError {
            status,
            message: api_error_message(status, &reply.body),
        },
    }
}

fn api_error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body)
        && let Some(message) = parsed.error.message
    {
        return message;
    }
    if serde_json::from_str::<serde_json::Value>(body).is_ok() {
        return format!("API error ({status})");
    }
    format!("API error ({status}): {}", truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
