use std::env;

use crate::error::{AppError, AppResult};

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jira_base_url: String,
    pub jira_email: String,
    pub jira_token: String,
    pub jira_project_key: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            port: port_from_env()?,
            jira_base_url: require("JIRA_BASE_URL")?,
            jira_email: require("JIRA_EMAIL")?,
            jira_token: require("JIRA_API_TOKEN")?,
            jira_project_key: require("JIRA_PROJECT_KEY")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Browse URL for an issue key, tolerating a trailing slash on the
    /// configured base URL.
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!(
            "{}/browse/{}",
            self.jira_base_url.trim_end_matches('/'),
            issue_key
        )
    }
}

fn require(name: &str) -> AppResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!("{name} is not set"))),
    }
}

fn port_from_env() -> AppResult<u16> {
    match env::var("PORT") {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Configuration(format!("PORT '{value}' is not a valid port"))),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base_url(base_url: &str) -> AppConfig {
        AppConfig {
            port: DEFAULT_PORT,
            jira_base_url: base_url.to_string(),
            jira_email: "service@example.com".to_string(),
            jira_token: "token".to_string(),
            jira_project_key: "INT".to_string(),
        }
    }

    #[test]
    fn browse_url_joins_base_and_key() {
        let config = config_with_base_url("https://example.atlassian.net");
        assert_eq!(
            config.browse_url("INT-42"),
            "https://example.atlassian.net/browse/INT-42"
        );
    }

    #[test]
    fn browse_url_trims_trailing_slash() {
        let config = config_with_base_url("https://example.atlassian.net/");
        assert_eq!(
            config.browse_url("INT-42"),
            "https://example.atlassian.net/browse/INT-42"
        );
    }
}
