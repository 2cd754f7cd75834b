use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the upstream analysis API
    pub base_url: String,
    pub timeout_secs: u64,
    pub default_max_comments: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
            default_max_comments: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Comments per page on the video view
    pub page_size: usize,
    /// Length of the top-liked and top-toxic lists
    pub top_n: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            page_size: 10,
            top_n: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::from_file(Path::new("config.toml"))?;

        if let Ok(url) = std::env::var("ANALYSIS_API_URL") {
            config.api.base_url = url;
        }
        if let Ok(port) = std::env::var("TOXILENS_PORT") {
            config.web.port = port.parse().context("TOXILENS_PORT must be a port number")?;
        }

        Ok(config)
    }

    /// A missing file means defaults; an unreadable or invalid one is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&config_text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [api]
            base_url = "http://analysis:8000"

            [web]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://analysis:8000");
        assert_eq!(config.api.default_max_comments, 100);
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.page_size, 10);
    }

    #[test]
    fn missing_file_is_default() {
        let config = AppConfig::from_file(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.web.top_n, 5);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(AppConfig::parse("[web]\nport = \"eighty\"").is_err());
    }
}
