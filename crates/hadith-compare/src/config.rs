//! Configuration for a comparison run
//!
//! Everything the harness needs is gathered into one [`HarnessConfig`]
//! at startup and passed down explicitly; nothing reads the environment
//! after construction.

use std::env;
use std::time::Duration;

use crate::error::{HarnessError, HarnessResult};

/// Configuration for the comparison harness
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// MySQL connection URL assembled from the `MYSQL_*` variables
    pub database_url: String,
    /// Base URL of the baseline deployment
    pub baseline_url: String,
    /// Base URL of the candidate deployment
    pub candidate_url: String,
    /// Static bearer token sent with every request (empty disables the header)
    pub auth_token: String,
    /// Page size used for every paginated endpoint
    pub page_limit: u32,
    /// Whether to exercise `/v1/hadiths/random` (non-deterministic, advisory only)
    pub include_random: bool,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl HarnessConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first if an env file should be honored.
    /// The `MYSQL_*` variables are required; everything else has a default.
    pub fn from_env() -> HarnessResult<Self> {
        let host = require_env("MYSQL_HOST")?;
        let user = require_env("MYSQL_USER")?;
        let password = require_env("MYSQL_PASSWORD")?;
        let database = require_env("MYSQL_DATABASE")?;
        let port = env::var("MYSQL_PORT").unwrap_or_else(|_| "3306".to_string());

        let database_url = format!("mysql://{user}:{password}@{host}:{port}/{database}");

        let page_limit = parse_env("PAGE_LIMIT", 100u32)?;
        let timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            database_url,
            baseline_url: env::var("BASELINE_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            candidate_url: env::var("CANDIDATE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8084".to_string()),
            auth_token: env::var("API_AUTH_TOKEN").unwrap_or_default(),
            page_limit,
            include_random: env::var("COMPARE_RANDOM")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require_env(var: &str) -> HarnessResult<String> {
    env::var(var).map_err(|_| HarnessError::MissingEnv {
        var: var.to_string(),
    })
}

/// Parse an optional numeric variable; a value that is set but
/// malformed is an error, not a silent fall back to the default
fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> HarnessResult<T> {
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| HarnessError::InvalidEnv {
            var: var.to_string(),
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}
