use anyhow::{bail, Context, Result};

/// Default number of tailoring runs kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Which text-classification backend serves requirement extraction and resume parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    Pattern,
    Llm,
}

impl std::str::FromStr for ClassifierBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(ClassifierBackend::Pattern),
            "llm" => Ok(ClassifierBackend::Llm),
            other => bail!("CLASSIFIER must be 'pattern' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub classifier: ClassifierBackend,
    /// Fall back to the pattern rules when the LLM backend is unavailable.
    pub classifier_fallback: bool,
    pub anthropic_api_key: Option<String>,
    /// Memory store is used when unset.
    pub redis_url: Option<String>,
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let classifier: ClassifierBackend = std::env::var("CLASSIFIER")
            .unwrap_or_else(|_| "pattern".to_string())
            .parse()?;

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        if classifier == ClassifierBackend::Llm && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when CLASSIFIER=llm");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            classifier,
            classifier_fallback: std::env::var("CLASSIFIER_FALLBACK")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .context("CLASSIFIER_FALLBACK must be 'true' or 'false'")?,
            anthropic_api_key,
            redis_url: optional_env("REDIS_URL"),
            history_limit: std::env::var("HISTORY_LIMIT")
                .unwrap_or_else(|_| DEFAULT_HISTORY_LIMIT.to_string())
                .parse::<usize>()
                .context("HISTORY_LIMIT must be a positive integer")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            classifier: ClassifierBackend::Pattern,
            classifier_fallback: true,
            anthropic_api_key: None,
            redis_url: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_backend_parses_case_insensitively() {
        assert_eq!(
            "LLM".parse::<ClassifierBackend>().unwrap(),
            ClassifierBackend::Llm
        );
        assert_eq!(
            " pattern ".parse::<ClassifierBackend>().unwrap(),
            ClassifierBackend::Pattern
        );
    }

    #[test]
    fn test_unknown_classifier_backend_rejected() {
        assert!("bert".parse::<ClassifierBackend>().is_err());
    }

    #[test]
    fn test_default_config_uses_pattern_backend() {
        let config = Config::default();
        assert_eq!(config.classifier, ClassifierBackend::Pattern);
        assert_eq!(config.history_limit, 10);
        assert!(config.redis_url.is_none());
    }
}
