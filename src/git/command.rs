//! Git subprocess execution and concise error extraction.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::GitError;

/// Default timeout for a single git invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum characters of an extracted error line before it is cut.
const MAX_ERROR_LINE_CHARS: usize = 150;

/// Literal prefixes git uses for its own error lines.
const ERROR_PREFIXES: &[&str] = &["error:", "fatal:"];

/// Lines that start usage or help output rather than describing the failure.
const BANNER_PREFIXES: &[&str] = &["usage:", "Diff"];

/// Runs git subcommands inside one repository.
#[derive(Debug, Clone)]
pub struct GitRunner {
    executable: PathBuf,
    work_dir: PathBuf,
    timeout: Duration,
}

impl GitRunner {
    pub fn new(executable: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            executable,
            work_dir,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run git with `args` and return its stdout (trailing whitespace removed).
    ///
    /// Output is decoded lossily. A non-zero exit is reported as
    /// [`GitError::CommandFailed`] carrying one concise line extracted from
    /// the output; the full text goes to the debug log only.
    pub async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let mut cmd = Command::new(&self.executable);
        cmd.arg("-c")
            .arg("core.quotepath=false")
            .args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                warn!("git {} timed out after {:?}", args.join(" "), self.timeout);
                GitError::CommandTimeout(self.timeout.as_secs())
            })?
            .map_err(GitError::SpawnFailed)?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout)
                .trim_end()
                .to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let error_text = match stderr.trim() {
            "" => stdout.trim(),
            text => text,
        };

        debug!(
            "git {} failed ({}): {}",
            args.join(" "),
            output.status,
            error_text
        );

        let detail = extract_error_line(error_text).unwrap_or_else(|| {
            format!("git {} exited with {}", args.join(" "), output.status)
        });
        Err(GitError::CommandFailed(detail))
    }
}

type ExtractionStrategy = fn(&[&str]) -> Option<String>;

/// Reduce verbose git failure output to a single displayable line.
///
/// Strategies are tried in order:
/// 1. The first line starting with `error:` or `fatal:`, prefix removed
/// 2. The first non-empty line that is not a usage/help banner
/// 3. The first line as-is
///
/// Returns `None` only when the output is blank.
pub fn extract_error_line(output: &str) -> Option<String> {
    const STRATEGIES: &[ExtractionStrategy] =
        &[prefixed_error_line, first_informative_line, first_line];

    if output.trim().is_empty() {
        return None;
    }

    let lines: Vec<&str> = output.lines().collect();
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&lines))
        .map(|line| cap_length(&line))
}

fn prefixed_error_line(lines: &[&str]) -> Option<String> {
    lines.iter().map(|l| l.trim()).find_map(|line| {
        ERROR_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
            .map(|rest| rest.trim().to_string())
    })
}

fn first_informative_line(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|line| {
            !line.is_empty() && !BANNER_PREFIXES.iter().any(|banner| line.starts_with(banner))
        })
        .map(str::to_string)
}

fn first_line(lines: &[&str]) -> Option<String> {
    lines.first().map(|line| line.trim().to_string())
}

fn cap_length(line: &str) -> String {
    if line.chars().count() > MAX_ERROR_LINE_CHARS {
        let head: String = line.chars().take(MAX_ERROR_LINE_CHARS).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}
