//! Error types for deepseek-commit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Language;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("No git repository found at or above {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Git executable not found. Make sure Git is installed")]
    ExecutableNotFound,

    #[error("Git command timed out after {0} seconds")]
    CommandTimeout(u64),

    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

impl GitError {
    /// Single-line, user-facing rendering in the given language.
    pub fn localized(&self, language: Language) -> String {
        match (self, language) {
            (GitError::RepositoryNotFound(_), Language::ZhCn) => {
                "未找到Git仓库，请确保在Git仓库目录中运行".to_string()
            }
            (GitError::RepositoryNotFound(_), Language::En) => {
                "No Git repository found, make sure to run inside a Git repository".to_string()
            }
            (GitError::ExecutableNotFound, Language::ZhCn) => {
                "未找到Git可执行文件，请确保已安装Git".to_string()
            }
            (GitError::ExecutableNotFound, Language::En) => {
                "Git executable not found, make sure Git is installed".to_string()
            }
            (GitError::CommandTimeout(_), Language::ZhCn) => "Git命令执行超时".to_string(),
            (GitError::CommandTimeout(_), Language::En) => "Git command timed out".to_string(),
            (GitError::CommandFailed(detail), _) => detail.clone(),
            (GitError::SpawnFailed(e), Language::ZhCn) => format!("执行Git命令时出错: {e}"),
            (GitError::SpawnFailed(e), Language::En) => {
                format!("Error while running Git command: {e}")
            }
        }
    }
}

/// Errors from commit message generation against the chat-completion API.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API key is not set")]
    MissingCredential,

    #[error("API key is invalid or expired (HTTP 401)")]
    InvalidCredential,

    #[error("Rate limited by the API (HTTP 429)")]
    RateLimited,

    #[error("API server error (HTTP {0})")]
    ServerError(u16),

    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out")]
    NetworkTimeout,

    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("All {attempts} attempts failed. Last error: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Whether this failure is expected to resolve on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited
                | GenerationError::ServerError(_)
                | GenerationError::NetworkTimeout
                | GenerationError::ConnectionFailure(_)
        )
    }

    /// The error that decided the outcome, looking through retry exhaustion.
    pub fn root(&self) -> &GenerationError {
        match self {
            GenerationError::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// Single-line, user-facing rendering in the given language.
    ///
    /// Retry exhaustion renders as the last transient failure.
    pub fn localized(&self, language: Language) -> String {
        match (self.root(), language) {
            (GenerationError::MissingCredential, Language::ZhCn) => {
                "API Key未设置，请在配置中设置DeepSeek API Key".to_string()
            }
            (GenerationError::MissingCredential, Language::En) => {
                "API Key not set, please configure DeepSeek API Key".to_string()
            }
            (GenerationError::InvalidCredential, Language::ZhCn) => {
                "API Key无效或已过期，请检查配置".to_string()
            }
            (GenerationError::InvalidCredential, Language::En) => {
                "API Key is invalid or expired, please check the configuration".to_string()
            }
            (GenerationError::RateLimited, Language::ZhCn) => {
                "API请求频率过高，请稍后重试".to_string()
            }
            (GenerationError::RateLimited, Language::En) => {
                "Too many API requests, please try again later".to_string()
            }
            (GenerationError::ServerError(status), Language::ZhCn) => {
                format!("DeepSeek API服务器错误 ({status})")
            }
            (GenerationError::ServerError(status), Language::En) => {
                format!("DeepSeek API server error ({status})")
            }
            (GenerationError::ApiError { message, .. }, _) => message.clone(),
            (GenerationError::NetworkTimeout, Language::ZhCn) => {
                "请求超时，请检查网络连接".to_string()
            }
            (GenerationError::NetworkTimeout, Language::En) => {
                "Request timed out, please check your network connection".to_string()
            }
            (GenerationError::ConnectionFailure(_), Language::ZhCn) => {
                "网络连接错误，请检查网络设置".to_string()
            }
            (GenerationError::ConnectionFailure(_), Language::En) => {
                "Network connection error, please check your network settings".to_string()
            }
            (GenerationError::MalformedResponse(detail), Language::ZhCn) => {
                format!("API响应格式异常: {detail}")
            }
            (GenerationError::MalformedResponse(detail), Language::En) => {
                format!("Unexpected API response format: {detail}")
            }
            // root() never yields RetriesExhausted
            (GenerationError::RetriesExhausted { .. }, _) => self.to_string(),
        }
    }
}

/// Transport-level failures of a single HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<TransportError> for GenerationError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => GenerationError::NetworkTimeout,
            TransportError::Connection(detail) | TransportError::Request(detail) => {
                GenerationError::ConnectionFailure(detail)
            }
        }
    }
}

/// Errors from the suggest workflow (validate, snapshot, generate).
#[derive(Error, Debug)]
pub enum SuggestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssue {
    MissingApiKey,
    MissingModel,
    InvalidLanguage,
    InvalidCommitStyle,
    InvalidTemperature,
    InvalidMaxDiffLength,
}

impl ConfigIssue {
    pub fn localized(&self, language: Language) -> &'static str {
        match (self, language) {
            (ConfigIssue::MissingApiKey, Language::ZhCn) => {
                "API Key未设置，请在配置中设置DeepSeek API Key"
            }
            (ConfigIssue::MissingApiKey, Language::En) => {
                "API Key not set, please configure DeepSeek API Key"
            }
            (ConfigIssue::MissingModel, Language::ZhCn) => "模型名称不能为空",
            (ConfigIssue::MissingModel, Language::En) => "Model name cannot be empty",
            (ConfigIssue::InvalidLanguage, Language::ZhCn) => {
                "语言设置无效，必须是 'zh-CN' 或 'en'"
            }
            (ConfigIssue::InvalidLanguage, Language::En) => {
                "Invalid language setting, must be 'zh-CN' or 'en'"
            }
            (ConfigIssue::InvalidCommitStyle, Language::ZhCn) => {
                "提交风格无效，必须是 'conventional', 'simple' 或 'emoji'"
            }
            (ConfigIssue::InvalidCommitStyle, Language::En) => {
                "Invalid commit style, must be 'conventional', 'simple' or 'emoji'"
            }
            (ConfigIssue::InvalidTemperature, Language::ZhCn) => {
                "随机性(temperature)必须在0.1-1.0之间"
            }
            (ConfigIssue::InvalidTemperature, Language::En) => {
                "Temperature must be between 0.1 and 1.0"
            }
            (ConfigIssue::InvalidMaxDiffLength, Language::ZhCn) => "最大差异长度必须至少为100",
            (ConfigIssue::InvalidMaxDiffLength, Language::En) => {
                "Max diff length must be at least 100"
            }
        }
    }
}

/// Errors from the settings store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {}", .0.localized(Language::En))]
    Invalid(ConfigIssue),

    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Failed to read config file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseFailed(#[source] serde_json::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("Failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),
}

impl ConfigError {
    pub fn localized(&self, language: Language) -> String {
        match self {
            ConfigError::Invalid(issue) => issue.localized(language).to_string(),
            other => other.to_string(),
        }
    }
}
