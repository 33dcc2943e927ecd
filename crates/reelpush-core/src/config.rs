//! Configuration module
//!
//! Configuration is read once at startup and handed to every component by
//! reference. Components never look at the environment themselves.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_API_URL: &str = "https://api.webflow.com";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_OUTPUT_DIR: &str = "compressed";
const DEFAULT_FOLDER_NAME: &str = "Video Uploads";
const POLL_MAX_ATTEMPTS: u32 = 20;
const POLL_INTERVAL_SECS: u64 = 5;
const HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub site_id: String,
    pub api_base_url: String,
    pub ffmpeg_path: String,
    pub output_dir: PathBuf,
    pub upload_folder_name: String,
    pub poll_max_attempts: u32,
    pub poll_interval: Duration,
    /// `None` lets the transcoder run for as long as it needs.
    pub transcode_timeout: Option<Duration>,
    pub http_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("api_base_url", &self.api_base_url)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("output_dir", &self.output_dir)
            .field("upload_folder_name", &self.upload_folder_name)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("poll_interval", &self.poll_interval)
            .field("transcode_timeout", &self.transcode_timeout)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if present) and build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let (api_token, site_id) = match (get("WEBFLOW_API_TOKEN"), get("SITE_ID")) {
            (Some(token), Some(site)) => (token, site),
            _ => {
                return Err(Error::Validation(
                    "Missing .env file or WEBFLOW_API_TOKEN/SITE_ID variables".to_string(),
                ))
            }
        };

        let transcode_timeout_secs: u64 =
            parse_or(get("TRANSCODE_TIMEOUT_SECS"), "TRANSCODE_TIMEOUT_SECS", 0)?;

        let config = Config {
            api_token,
            site_id,
            api_base_url: get("WEBFLOW_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string()),
            output_dir: PathBuf::from(
                get("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            upload_folder_name: get("UPLOAD_FOLDER_NAME")
                .unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string()),
            poll_max_attempts: parse_or(
                get("POLL_MAX_ATTEMPTS"),
                "POLL_MAX_ATTEMPTS",
                POLL_MAX_ATTEMPTS,
            )?,
            poll_interval: Duration::from_secs(parse_or(
                get("POLL_INTERVAL_SECS"),
                "POLL_INTERVAL_SECS",
                POLL_INTERVAL_SECS,
            )?),
            transcode_timeout: (transcode_timeout_secs > 0)
                .then(|| Duration::from_secs(transcode_timeout_secs)),
            http_timeout: Duration::from_secs(parse_or(
                get("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                HTTP_TIMEOUT_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(Error::Validation(format!(
                "WEBFLOW_API_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.upload_folder_name.trim().is_empty() {
            return Err(Error::Validation(
                "UPLOAD_FOLDER_NAME cannot be empty".to_string(),
            ));
        }
        if self.http_timeout.is_zero() {
            return Err(Error::Validation(
                "HTTP_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Upper bound on time spent waiting for the asset URL.
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval * self.poll_max_attempts
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw.parse().map_err(|_| {
            Error::Validation(format!("{} must be a valid number, got '{}'", key, raw))
        }),
        None => Ok(default),
    }
}
