//! Persistent user settings.
//!
//! Settings live in a flat JSON object at `~/.deepseek-commit/config.json`
//! (override with `DSC_CONFIG`). The settings object is loaded once per
//! invocation and passed explicitly to the components that read it.

use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigIssue};

/// Environment variable to override the config file location.
const CONFIG_ENV_VAR: &str = "DSC_CONFIG";

const CONFIG_DIR_NAME: &str = ".deepseek-commit";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_DIFF_LENGTH: usize = 3000;

pub const MIN_TEMPERATURE: f64 = 0.1;
pub const MAX_TEMPERATURE: f64 = 1.0;
pub const MIN_MAX_DIFF_LENGTH: usize = 100;

/// Output language for prompts and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-CN")]
    #[value(name = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    #[value(name = "en")]
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit message style requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    #[default]
    Conventional,
    Simple,
    Emoji,
}

impl CommitStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStyle::Conventional => "conventional",
            CommitStyle::Simple => "simple",
            CommitStyle::Emoji => "emoji",
        }
    }
}

impl fmt::Display for CommitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub language: Language,
    pub commit_style: CommitStyle,
    pub temperature: f64,
    pub max_diff_length: usize,
    pub api_base_url: String,

    /// Values found in the file that were not recognized and fell back to
    /// their defaults. `validate` reports the first one.
    #[serde(skip)]
    pub rejected: Vec<ConfigIssue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            language: Language::default(),
            commit_style: CommitStyle::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_diff_length: DEFAULT_MAX_DIFF_LENGTH,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            rejected: Vec::new(),
        }
    }
}

impl Settings {
    /// Get the config file path.
    ///
    /// `DSC_CONFIG` wins when set and non-empty; otherwise
    /// `.deepseek-commit/config.json` under the user's home directory.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from `path`.
    ///
    /// A missing file is created with the defaults. An unrecognized
    /// `language` or `commit_style` falls back to its default and is kept in
    /// `rejected`; the other keys are still read. A file that cannot be read
    /// or is not a JSON object is an error and is left untouched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            let settings = Self::default();
            if let Err(e) = settings.save_to(path) {
                warn!("Could not create default config file: {}", e);
            }
            return Ok(settings);
        }

        let content = fs::read_to_string(path).map_err(ConfigError::ReadFailed)?;
        let mut raw: Map<String, Value> =
            serde_json::from_str(&content).map_err(ConfigError::ParseFailed)?;

        let rejected: Vec<ConfigIssue> = [
            take_unrecognized::<Language>(&mut raw, "language", ConfigIssue::InvalidLanguage),
            take_unrecognized::<CommitStyle>(
                &mut raw,
                "commit_style",
                ConfigIssue::InvalidCommitStyle,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut settings: Settings =
            serde_json::from_value(Value::Object(raw)).map_err(ConfigError::ParseFailed)?;
        settings.rejected = rejected;

        debug!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Atomically write settings as pretty JSON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(ConfigError::WriteFailed)?;

        let json = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;

        let mut file = NamedTempFile::new_in(dir).map_err(ConfigError::WriteFailed)?;
        file.write_all(json.as_bytes())
            .map_err(ConfigError::WriteFailed)?;
        file.persist(path)
            .map_err(|e| ConfigError::WriteFailed(e.error))?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check the values the generation pipeline depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Invalid(ConfigIssue::MissingApiKey));
        }
        if self.model.is_empty() {
            return Err(ConfigError::Invalid(ConfigIssue::MissingModel));
        }
        if let Some(issue) = self.rejected.first() {
            return Err(ConfigError::Invalid(*issue));
        }
        if !temperature_in_range(self.temperature) {
            return Err(ConfigError::Invalid(ConfigIssue::InvalidTemperature));
        }
        if self.max_diff_length < MIN_MAX_DIFF_LENGTH {
            return Err(ConfigError::Invalid(ConfigIssue::InvalidMaxDiffLength));
        }
        Ok(())
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        self.api_key = api_key.trim().to_string();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.rejected.retain(|i| *i != ConfigIssue::InvalidLanguage);
    }

    pub fn set_commit_style(&mut self, style: CommitStyle) {
        self.commit_style = style;
        self.rejected.retain(|i| *i != ConfigIssue::InvalidCommitStyle);
    }

    /// The API key with everything but the first 3 and last 4 characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let head: String = chars.iter().take(3).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{head}***{tail}")
    }
}

pub fn temperature_in_range(temperature: f64) -> bool {
    (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature)
}

/// Remove `key` from `raw` when its value does not parse as `T`.
fn take_unrecognized<T: DeserializeOwned>(
    raw: &mut Map<String, Value>,
    key: &str,
    issue: ConfigIssue,
) -> Option<ConfigIssue> {
    let value = raw.get(key)?;
    if T::deserialize(value).is_ok() {
        return None;
    }
    warn!("Unrecognized {} {} in config file, using default", key, value);
    raw.remove(key);
    Some(issue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings {
            api_key: "sk-test-1234567890".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.model, "deepseek-chat");
        assert_eq!(settings.language, Language::ZhCn);
        assert_eq!(settings.commit_style, CommitStyle::Conventional);
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_diff_length, 3000);
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let json = r#"{"api_key": "abc", "language": "en", "commit_style": "emoji"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.commit_style, CommitStyle::Emoji);
        assert_eq!(settings.max_diff_length, 3000);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let json = r#"{"theme": "light", "window_width": 900, "auto_suggest": true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_api_key() {
        let err = Settings::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ConfigIssue::MissingApiKey)));
    }

    #[test]
    fn test_validate_missing_model() {
        let settings = Settings {
            model: String::new(),
            ..valid_settings()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid(ConfigIssue::MissingModel))
        ));
    }

    #[test]
    fn test_validate_temperature_bounds() {
        for (temperature, ok) in [(0.1, true), (1.0, true), (0.05, false), (1.01, false)] {
            let settings = Settings {
                temperature,
                ..valid_settings()
            };
            assert_eq!(settings.validate().is_ok(), ok, "temperature {temperature}");
        }
    }

    #[test]
    fn test_validate_max_diff_length() {
        let settings = Settings {
            max_diff_length: 99,
            ..valid_settings()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid(ConfigIssue::InvalidMaxDiffLength))
        ));
    }

    #[test]
    fn test_set_api_key_trims() {
        let mut settings = Settings::default();
        settings.set_api_key("  sk-abc  \n");
        assert_eq!(settings.api_key, "sk-abc");
    }

    #[test]
    fn test_masked_api_key() {
        let settings = valid_settings();
        assert_eq!(settings.masked_api_key(), "sk-***7890");
        assert_eq!(Settings::default().masked_api_key(), "");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = Settings {
            language: Language::En,
            temperature: 0.3,
            ..valid_settings()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_malformed_file_is_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_load_unknown_style_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_key": "sk-real-key-9999", "commit_style": "Emoji", "temperature": 0.4}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.api_key, "sk-real-key-9999");
        assert_eq!(settings.temperature, 0.4);
        assert_eq!(settings.commit_style, CommitStyle::Conventional);
        assert_eq!(settings.rejected, vec![ConfigIssue::InvalidCommitStyle]);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid(ConfigIssue::InvalidCommitStyle))
        ));
    }

    #[test]
    fn test_update_after_unknown_value_keeps_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "sk-real-key-9999", "commit_style": "Emoji"}"#).unwrap();

        let mut settings = Settings::load_from(&path).unwrap();
        settings.temperature = 0.5;
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(&path).unwrap();
        assert_eq!(reloaded.api_key, "sk-real-key-9999");
        assert_eq!(reloaded.temperature, 0.5);
    }

    #[test]
    fn test_unknown_language_reported_before_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"api_key": "sk-x", "language": "fr", "commit_style": null}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.language, Language::ZhCn);
        assert_eq!(
            settings.rejected,
            vec![ConfigIssue::InvalidLanguage, ConfigIssue::InvalidCommitStyle]
        );
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid(ConfigIssue::InvalidLanguage))
        ));
    }

    #[test]
    fn test_setters_clear_rejected_values() {
        let mut settings = Settings {
            rejected: vec![ConfigIssue::InvalidLanguage, ConfigIssue::InvalidCommitStyle],
            ..valid_settings()
        };

        settings.set_language(Language::En);
        assert_eq!(settings.rejected, vec![ConfigIssue::InvalidCommitStyle]);

        settings.set_commit_style(CommitStyle::Simple);
        assert!(settings.rejected.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_non_object_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_config_path_from_env() {
        temp_env::with_var(CONFIG_ENV_VAR, Some("/tmp/dsc-test.json"), || {
            let path = Settings::config_path().unwrap();
            assert_eq!(path, PathBuf::from("/tmp/dsc-test.json"));
        });
    }

    #[test]
    fn test_config_path_default_location() {
        temp_env::with_vars(
            [(CONFIG_ENV_VAR, None), ("HOME", Some("/home/tester"))],
            || {
                let path = Settings::config_path().unwrap();
                assert!(path.ends_with(".deepseek-commit/config.json"));
                assert!(path.starts_with("/home/tester"));
            },
        );
    }

    #[test]
    fn test_config_path_with_empty_home_is_absolute() {
        temp_env::with_vars([(CONFIG_ENV_VAR, None), ("HOME", Some(""))], || {
            match Settings::config_path() {
                Ok(path) => {
                    assert!(path.is_absolute(), "relative config path {}", path.display());
                    assert!(path.ends_with(".deepseek-commit/config.json"));
                }
                Err(e) => assert!(matches!(e, ConfigError::NoHomeDirectory)),
            }
        });
    }
}
