use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::formatter::Layout;
use crate::core::models::cost::{Granularity, ReportSpec};

pub const DEFAULT_TOKEN_ENV: &str = "AWS_COST_LINE_NOTIFY_TOKEN";
pub const DEFAULT_ENDPOINT: &str = "https://notify-api.line.me/api/notify";
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    WriteError(String),
    #[error("Unknown time zone: '{0}'")]
    InvalidTimezone(String),
    #[error("{0} is not defined")]
    MissingToken(String),
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("No reports configured")]
    NoReports,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the webhook token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            layout: Layout::default(),
            aws_region: None,
            aws_profile: None,
        }
    }
}

fn default_reports() -> Vec<ReportSpec> {
    vec![
        ReportSpec {
            granularity: Granularity::Daily,
            label: "Yesterday".into(),
        },
        ReportSpec {
            granularity: Granularity::Monthly,
            label: "Month to date".into(),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "default_reports")]
    pub reports: Vec<ReportSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            reports: default_reports(),
        }
    }
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("aws-cost-notify").join("config.toml")
    }

    /// Load config from `path`, falling back to defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        Ok(())
    }

    /// Read the webhook token from the configured environment variable.
    pub fn token(&self) -> Result<String, ConfigError> {
        read_token(&self.settings.token_env)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Err(e) = crate::core::clock::parse_zone(&self.settings.timezone) {
            issues.push(e.to_string());
        }
        if let Err(e) = parse_endpoint(&self.settings.endpoint) {
            issues.push(e.to_string());
        }
        if self.settings.token_env.trim().is_empty() {
            issues.push("token_env must not be empty".to_string());
        }
        if self.reports.is_empty() {
            issues.push(ConfigError::NoReports.to_string());
        }
        for (i, report) in self.reports.iter().enumerate() {
            if report.label.trim().is_empty() {
                issues.push(format!("Report #{}: label must not be empty", i + 1));
            }
        }
        issues
    }
}

pub fn read_token(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(ConfigError::MissingToken(var.to_string())),
    }
}

/// Parse the webhook URL, refusing anything but HTTPS so the token never leaves in clear text.
pub fn parse_endpoint(url: &str) -> Result<reqwest::Url, ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEndpoint {
            url: url.to_string(),
            reason: "endpoint must use HTTPS".to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(
            issues.is_empty(),
            "Default config should be valid, got: {:?}",
            issues
        );
    }

    #[test]
    fn default_settings_match_line_notify() {
        let settings = Settings::default();
        assert_eq!(settings.timezone, "Asia/Tokyo");
        assert_eq!(settings.endpoint, "https://notify-api.line.me/api/notify");
        assert_eq!(settings.token_env, "AWS_COST_LINE_NOTIFY_TOKEN");
        assert_eq!(settings.layout, Layout::Template);
    }

    #[test]
    fn default_reports_are_daily_then_monthly() {
        let config = AppConfig::default();
        let kinds: Vec<_> = config.reports.iter().map(|r| r.granularity).collect();
        assert_eq!(kinds, vec![Granularity::Daily, Granularity::Monthly]);
    }

    #[test]
    fn validate_catches_invalid_timezone() {
        let mut config = AppConfig::default();
        config.settings.timezone = "Nowhere/Special".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("time zone")));
    }

    #[test]
    fn validate_catches_plain_http_endpoint() {
        let mut config = AppConfig::default();
        config.settings.endpoint = "http://notify.example.com/api".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("HTTPS")));
    }

    #[test]
    fn validate_catches_empty_reports() {
        let mut config = AppConfig::default();
        config.reports.clear();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("No reports")));
    }

    #[test]
    fn validate_catches_blank_label() {
        let mut config = AppConfig::default();
        config.reports[1].label = "  ".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("Report #2")));
    }

    #[test]
    fn parse_endpoint_rejects_garbage() {
        assert!(parse_endpoint("not a url").is_err());
        assert!(parse_endpoint("file:///etc/passwd").is_err());
        assert!(parse_endpoint("https://notify.example.com/api").is_ok());
    }

    #[test]
    fn parse_settings_toml() {
        let toml = r#"
[settings]
timezone = "UTC"
layout = "plain"
aws_region = "us-east-1"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.timezone, "UTC");
        assert_eq!(config.settings.layout, Layout::Plain);
        assert_eq!(config.settings.aws_region.as_deref(), Some("us-east-1"));
        assert_eq!(config.settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.reports.len(), 2);
    }

    #[test]
    fn parse_reports_toml() {
        let toml = r#"
[[reports]]
granularity = "monthly"
label = "This month"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.reports.len(), 1);
        assert_eq!(config.reports[0].granularity, Granularity::Monthly);
        assert_eq!(config.reports[0].label, "This month");
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.reports.len(), 2);
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let path = std::env::temp_dir()
            .join("aws-cost-notify-missing")
            .join("config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.settings.token_env, DEFAULT_TOKEN_ENV);
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let name = format!("aws-cost-notify-{}", std::process::id());
        let dir = std::env::temp_dir().join(name);
        let path = dir.join("config.toml");
        let mut config = AppConfig::default();
        config.settings.layout = Layout::Plain;
        config.settings.aws_profile = Some("billing".to_string());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(loaded.settings.layout, Layout::Plain);
        assert_eq!(loaded.settings.aws_profile.as_deref(), Some("billing"));
        assert_eq!(loaded.reports, config.reports);
    }

    #[test]
    fn read_token_missing_is_config_error() {
        let err = read_token("AWS_COST_NOTIFY_TEST_UNSET_TOKEN").unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken(_)));
        assert_eq!(
            err.to_string(),
            "AWS_COST_NOTIFY_TEST_UNSET_TOKEN is not defined"
        );
    }

    #[test]
    fn read_token_empty_is_config_error() {
        std::env::set_var("AWS_COST_NOTIFY_TEST_EMPTY_TOKEN", "");
        let result = read_token("AWS_COST_NOTIFY_TEST_EMPTY_TOKEN");
        std::env::remove_var("AWS_COST_NOTIFY_TEST_EMPTY_TOKEN");
        assert!(result.is_err());
    }

    #[test]
    fn read_token_present() {
        std::env::set_var("AWS_COST_NOTIFY_TEST_SET_TOKEN", "abc123");
        let result = read_token("AWS_COST_NOTIFY_TEST_SET_TOKEN");
        std::env::remove_var("AWS_COST_NOTIFY_TEST_SET_TOKEN");
        assert_eq!(result.unwrap(), "abc123");
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(
            path,
            PathBuf::from("/tmp/test_xdg_config/aws-cost-notify/config.toml")
        );
    }
}
