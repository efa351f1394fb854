//! Staged changes in, commit message out.

use tracing::info;

use crate::error::SuggestError;
use crate::git::RepositoryInspector;
use crate::llm::{ChatTransport, CommitMessageGenerator};

/// What a suggestion run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// Nothing is staged; the API was not called.
    NothingStaged,
    Message(String),
}

/// Suggest a commit message for whatever is staged in `inspector`'s repository.
///
/// The staged-file check runs first, so an empty index never reaches
/// settings validation or the network.
pub async fn suggest_commit_message<T: ChatTransport>(
    inspector: &RepositoryInspector,
    generator: &CommitMessageGenerator<T>,
) -> Result<SuggestOutcome, SuggestError> {
    if !inspector.has_staged_changes().await {
        info!("No staged changes in {}", inspector.root().display());
        return Ok(SuggestOutcome::NothingStaged);
    }

    let settings = generator.settings();
    settings.validate()?;

    let snapshot = inspector.snapshot(settings).await;
    let message = generator.generate(&snapshot).await?;

    Ok(SuggestOutcome::Message(message))
}
