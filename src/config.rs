use clap::Parser;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::gemini::{DEFAULT_GEMINI_URL, DEFAULT_MODEL};

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "review-gateway")]
#[command(about = "Code review gateway: GitHub in, Gemini verdict out")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // GitHub API base URL
    #[arg(long, default_value = "https://api.github.com")]
    pub github_api_url: String,

    // Gemini API base URL
    #[arg(long, default_value = DEFAULT_GEMINI_URL)]
    pub gemini_api_url: String,

    // Gemini model to review with
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    // Repo cache TTL in seconds
    #[arg(short, long, default_value_t = 86400)]
    pub cache_ttl: u64,

    // Per-file size cap in bytes; bigger files are skipped
    #[arg(long, default_value_t = 200_000)]
    pub max_file_bytes: u64,

    // Total fetched content cap in bytes
    #[arg(long, default_value_t = 2_000_000)]
    pub max_total_bytes: u64,

    // Timeout for outbound GitHub/Gemini calls, in seconds
    #[arg(long, default_value_t = 60)]
    pub upstream_timeout: u64,
}

// Upstream credentials, environment-sourced
#[derive(Debug, Clone)]
pub struct Credentials {
    pub github_token: String,
    pub google_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            github_token: require_env("GITHUB_API_KEY")?,
            google_api_key: require_env("GOOGLE_API_KEY")?,
        })
    }
}

// Rate limiter knobs, environment-sourced
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", true),
            limit: env_parse("RATE_LIMIT_MAX", 10)?,
            window: Duration::from_secs(env_parse("RATE_LIMIT_WINDOW_SECS", 60)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| Error::Config(format!("missing required env var {}", key)))
}

// "false"/"0"/"no"/"off" disable, anything else (or unset) keeps the default
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(val) => !matches!(val.to_lowercase().as_str(), "false" | "0" | "no" | "off"),
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|_| Error::Config(format!("invalid value for env var {}: {}", key, val))),
        Err(_) => Ok(default),
    }
}
