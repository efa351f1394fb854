//! Reading staged repository state and issuing stage/commit operations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Language, Settings};
use crate::error::GitError;

use super::command::GitRunner;
use super::locate::{find_git_executable, find_repository_root};

/// Branch name reported when HEAD cannot be resolved.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Staged repository state captured once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Staged diff, cut to the configured length plus a truncation marker.
    pub diff: String,
    /// Staged paths in git's output order.
    pub changed_files: Vec<String>,
    pub branch_name: String,
    pub repository_name: String,
    pub repository_path: PathBuf,
}

/// Inspects one repository through the git command-line tool.
///
/// Read operations never fail: a git failure is logged and yields an empty
/// result, so "nothing staged" and "could not list staged files" look the same
/// to callers. Only construction and the write operations return errors.
#[derive(Debug, Clone)]
pub struct RepositoryInspector {
    root: PathBuf,
    runner: GitRunner,
}

impl RepositoryInspector {
    /// Resolve the repository containing `path` (or the current directory)
    /// and locate the git executable.
    pub fn open(path: Option<&Path>) -> Result<Self, GitError> {
        let start = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::current_dir()
                .map_err(|_| GitError::RepositoryNotFound(PathBuf::from(".")))?,
        };
        let root = find_repository_root(&start)?;
        let executable = find_git_executable()?;

        debug!(
            "Opened repository {} with git {}",
            root.display(),
            executable.display()
        );
        Ok(Self::with_runner(root.clone(), GitRunner::new(executable, root)))
    }

    /// Build an inspector around an existing runner.
    pub fn with_runner(root: PathBuf, runner: GitRunner) -> Self {
        Self { root, runner }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name of the repository root.
    pub fn repository_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Run an arbitrary git subcommand in the repository root.
    pub async fn run_command(&self, args: &[&str]) -> Result<String, GitError> {
        self.runner.run(args).await
    }

    async fn read(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(args).await {
            Ok(output) => Some(output),
            Err(e) => {
                debug!("git {} failed, treating as empty: {}", args.join(" "), e);
                None
            }
        }
    }

    async fn read_paths(&self, args: &[&str]) -> Vec<String> {
        self.read(args)
            .await
            .map(|output| parse_path_list(&output))
            .unwrap_or_default()
    }

    /// Staged diff, truncated to `max_length` characters.
    pub async fn get_staged_diff(&self, max_length: usize, language: Language) -> String {
        let diff = self
            .read(&["diff", "--cached", "--no-color"])
            .await
            .unwrap_or_default();
        truncate_diff(&diff, max_length, language)
    }

    pub async fn get_staged_files(&self) -> Vec<String> {
        self.read_paths(&["diff", "--cached", "--name-only"]).await
    }

    pub async fn get_current_branch(&self) -> String {
        match self.read(&["rev-parse", "--abbrev-ref", "HEAD"]).await {
            Some(branch) if !branch.trim().is_empty() => branch.trim().to_string(),
            _ => UNKNOWN_BRANCH.to_string(),
        }
    }

    /// True iff [`get_staged_files`](Self::get_staged_files) is non-empty.
    pub async fn has_staged_changes(&self) -> bool {
        !self.get_staged_files().await.is_empty()
    }

    pub async fn get_unstaged_files(&self) -> Vec<String> {
        self.read_paths(&["diff", "--name-only"]).await
    }

    pub async fn get_untracked_files(&self) -> Vec<String> {
        self.read_paths(&["ls-files", "--others", "--exclude-standard"])
            .await
    }

    /// Short-format status text.
    pub async fn get_status(&self) -> String {
        self.read(&["status", "--short"]).await.unwrap_or_default()
    }

    /// Capture everything the prompt needs.
    pub async fn snapshot(&self, settings: &Settings) -> RepositorySnapshot {
        let diff = self
            .get_staged_diff(settings.max_diff_length, settings.language)
            .await;
        let changed_files = self.get_staged_files().await;
        let branch_name = self.get_current_branch().await;

        debug!(
            "Snapshot: {} staged files, diff {} chars, branch {}",
            changed_files.len(),
            diff.chars().count(),
            branch_name
        );

        RepositorySnapshot {
            diff,
            changed_files,
            branch_name,
            repository_name: self.repository_name(),
            repository_path: self.root.clone(),
        }
    }

    /// Commit the staged changes with `message`.
    ///
    /// Double quotes in the message are backslash-escaped before being handed
    /// to git.
    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        let escaped = escape_quotes(message);
        self.runner.run(&["commit", "-m", &escaped]).await?;
        Ok(())
    }

    pub async fn stage_files(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.runner.run(&args).await?;
        Ok(())
    }

    pub async fn unstage_files(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["restore", "--staged", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.runner.run(&args).await?;
        Ok(())
    }
}

/// Cut `diff` to `max_chars` characters and append a marker naming the
/// original length.
pub fn truncate_diff(diff: &str, max_chars: usize, language: Language) -> String {
    let total = diff.chars().count();
    if total <= max_chars {
        return diff.to_string();
    }

    let mut truncated: String = diff.chars().take(max_chars).collect();
    truncated.push_str(&truncation_marker(total, language));
    truncated
}

/// Marker appended to a truncated diff.
pub fn truncation_marker(original_chars: usize, language: Language) -> String {
    match language {
        Language::ZhCn => format!("\n\n... (差异过长，已截断，共{original_chars}字符)"),
        Language::En => {
            format!("\n\n... (diff too long, truncated, {original_chars} characters total)")
        }
    }
}

fn parse_path_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn escape_quotes(message: &str) -> String {
    message.replace('"', "\\\"")
}
