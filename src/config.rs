use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::prompt::DEFAULT_MAX_CONTENT_CHARS;

/// Settings for the summarization backend. Injected into the client, never read globally.
#[derive(Clone)]
pub struct LlmConfig {
    /// Checked on first use, so a missing key surfaces as a backend failure.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub const DEFAULT_MODEL: &'static str = "llama-3.2-11b-text-preview";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for the content extractors.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    /// Skips TLS certificate validation for page fetches. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
    pub ytdlp_path: PathBuf,
    /// Timeout for a `yt-dlp` metadata lookup, separate from page fetches.
    pub ytdlp_timeout: Duration,
}

impl FetchConfig {
    pub const DEFAULT_USER_AGENT: &'static str = "Mozilla/5.0";
    pub const DEFAULT_YTDLP_PATH: &'static str = "yt-dlp";
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
            ytdlp_path: PathBuf::from(Self::DEFAULT_YTDLP_PATH),
            ytdlp_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub llm: LlmConfig,
    pub fetch: FetchConfig,
    pub max_content_chars: usize,
    pub request_timeout: Duration,
    pub log_json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup. Blank values count as unset.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let port = parse_or(var("PORT"), "PORT", 3000u16)?;
        let server_addr = SocketAddr::new(ip, port);

        let llm = LlmConfig {
            api_key: var("GROQ_API_KEY"),
            model: var("LLM_MODEL").unwrap_or_else(|| LlmConfig::DEFAULT_MODEL.to_string()),
            base_url: var("LLM_BASE_URL")
                .unwrap_or_else(|| LlmConfig::DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(parse_or(var("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", 60)?),
        };

        let fetch = FetchConfig {
            user_agent: var("FETCH_USER_AGENT")
                .unwrap_or_else(|| FetchConfig::DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(parse_or(
                var("FETCH_TIMEOUT_SECS"),
                "FETCH_TIMEOUT_SECS",
                10,
            )?),
            accept_invalid_certs: parse_flag(var("ACCEPT_INVALID_CERTS"), "ACCEPT_INVALID_CERTS")?,
            ytdlp_path: var("YTDLP_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(FetchConfig::DEFAULT_YTDLP_PATH)),
            ytdlp_timeout: Duration::from_secs(parse_or(
                var("YTDLP_TIMEOUT_SECS"),
                "YTDLP_TIMEOUT_SECS",
                30,
            )?),
        };

        let max_content_chars = parse_or(
            var("MAX_CONTENT_CHARS"),
            "MAX_CONTENT_CHARS",
            DEFAULT_MAX_CONTENT_CHARS,
        )?;
        if max_content_chars == 0 {
            return Err(AppError::ConfigError(
                "MAX_CONTENT_CHARS must be greater than zero".to_string(),
            ));
        }

        let request_timeout = Duration::from_secs(parse_or(
            var("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            90,
        )?);

        let log_json = var("LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json"));

        Ok(Config {
            server_addr,
            llm,
            fetch,
            max_content_chars,
            request_timeout,
            log_json,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {key} '{raw}': {e}"))),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, key: &str) -> Result<bool> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(AppError::ConfigError(format!(
            "Invalid {key} '{other}': expected true or false"
        ))),
    }
}
