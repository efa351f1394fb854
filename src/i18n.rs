//! User-facing message catalogue (zh-CN and en).

use crate::config::Language;

/// A message shown to the user on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    ConfigUpdated,
    ConfigSaveFailed,
    ConfigUnreadable,
    CurrentConfig,
    PathNotExist(&'a str),
    ConfigInvalid(&'a str),
    InvalidTemperature,
    InvalidMaxDiffLength,
    NoGitRepo(&'a str),
    NoGitExecutable(&'a str),
    GitInitFailed(&'a str),
    NoStagedChanges,
    GenerateFailed(&'a str),
    RuntimeError(&'a str),
    Committed,
    CommitFailed(&'a str),
    StagedFiles,
    UnstagedFiles,
    UntrackedFiles,
    NoFiles,
    CredentialValid,
    CredentialInvalid,
    CredentialCheckFailed(&'a str),
    CredentialEmpty,
}

impl Message<'_> {
    pub fn render(&self, language: Language) -> String {
        match language {
            Language::ZhCn => self.zh_cn(),
            Language::En => self.en(),
        }
    }

    fn zh_cn(&self) -> String {
        match self {
            Message::ConfigUpdated => "配置已更新".to_string(),
            Message::ConfigSaveFailed => "配置保存失败".to_string(),
            Message::ConfigUnreadable => "配置文件无法读取，未覆盖，请修复或删除后重试".to_string(),
            Message::CurrentConfig => "当前配置:".to_string(),
            Message::PathNotExist(path) => format!("错误: 路径不存在: {path}"),
            Message::ConfigInvalid(msg) => format!("配置错误: {msg}"),
            Message::InvalidTemperature => "错误: 温度值必须在0.1-1.0之间".to_string(),
            Message::InvalidMaxDiffLength => "错误: 最大差异长度必须>=100".to_string(),
            Message::NoGitRepo(detail) => format!("错误: 未找到Git仓库: {detail}"),
            Message::NoGitExecutable(detail) => format!("错误: 未找到Git可执行文件: {detail}"),
            Message::GitInitFailed(detail) => format!("错误: 初始化Git仓库失败: {detail}"),
            Message::NoStagedChanges => "没有暂存的更改".to_string(),
            Message::GenerateFailed(msg) => format!("生成失败: {msg}"),
            Message::RuntimeError(err) => format!("运行时错误: {err}"),
            Message::Committed => "提交成功".to_string(),
            Message::CommitFailed(msg) => format!("提交失败: {msg}"),
            Message::StagedFiles => "已暂存:".to_string(),
            Message::UnstagedFiles => "未暂存:".to_string(),
            Message::UntrackedFiles => "未跟踪:".to_string(),
            Message::NoFiles => "  (无)".to_string(),
            Message::CredentialValid => "API Key有效".to_string(),
            Message::CredentialInvalid => "API Key无效或已过期".to_string(),
            Message::CredentialCheckFailed(detail) => format!("测试失败: {detail}"),
            Message::CredentialEmpty => "API Key为空".to_string(),
        }
    }

    fn en(&self) -> String {
        match self {
            Message::ConfigUpdated => "Configuration updated".to_string(),
            Message::ConfigSaveFailed => "Failed to save configuration".to_string(),
            Message::ConfigUnreadable => {
                "Configuration file could not be read and was not overwritten; fix or remove it first"
                    .to_string()
            }
            Message::CurrentConfig => "Current Configuration:".to_string(),
            Message::PathNotExist(path) => format!("Error: Path does not exist: {path}"),
            Message::ConfigInvalid(msg) => format!("Configuration error: {msg}"),
            Message::InvalidTemperature => {
                "Error: Temperature must be between 0.1 and 1.0".to_string()
            }
            Message::InvalidMaxDiffLength => "Error: Max diff length must be >=100".to_string(),
            Message::NoGitRepo(detail) => format!("Error: Git repository not found: {detail}"),
            Message::NoGitExecutable(detail) => {
                format!("Error: Git executable not found: {detail}")
            }
            Message::GitInitFailed(detail) => {
                format!("Error: Failed to initialize Git repository: {detail}")
            }
            Message::NoStagedChanges => "No staged changes".to_string(),
            Message::GenerateFailed(msg) => format!("Generation failed: {msg}"),
            Message::RuntimeError(err) => format!("Runtime error: {err}"),
            Message::Committed => "Commit created".to_string(),
            Message::CommitFailed(msg) => format!("Commit failed: {msg}"),
            Message::StagedFiles => "Staged:".to_string(),
            Message::UnstagedFiles => "Unstaged:".to_string(),
            Message::UntrackedFiles => "Untracked:".to_string(),
            Message::NoFiles => "  (none)".to_string(),
            Message::CredentialValid => "API Key is valid".to_string(),
            Message::CredentialInvalid => "API Key is invalid or expired".to_string(),
            Message::CredentialCheckFailed(detail) => format!("Test failed: {detail}"),
            Message::CredentialEmpty => "API Key is empty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_selects_language() {
        assert_eq!(Message::NoStagedChanges.render(Language::ZhCn), "没有暂存的更改");
        assert_eq!(Message::NoStagedChanges.render(Language::En), "No staged changes");
    }

    #[test]
    fn test_render_interpolates_detail() {
        let msg = Message::GenerateFailed("timeout").render(Language::En);
        assert_eq!(msg, "Generation failed: timeout");
    }
}
