use actix_web::http::header::HeaderName;
use std::{env, str::FromStr, time::Duration};
use thiserror::Error;

static DEFAULT_DATABASE: &str = "coursehub";
static DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3030";
static DEFAULT_REQUESTER_HEADER: &str = "x-user-id";
const DEFAULT_MEDIA_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub bind_address: String,
    pub requester_header: HeaderName,
    pub media: MediaConfig,
}

#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &'static str| var(key).filter(|value| !value.is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let requester_header = optional("REQUESTER_HEADER")
            .unwrap_or_else(|| DEFAULT_REQUESTER_HEADER.to_string());
        let requester_header = HeaderName::from_str(&requester_header)
            .map_err(|_| ConfigError::Invalid("REQUESTER_HEADER", requester_header))?;

        let timeout = match optional("MEDIA_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("MEDIA_TIMEOUT_SECS", secs))?,
            None => DEFAULT_MEDIA_TIMEOUT_SECS,
        };

        Ok(Config {
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: optional("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            requester_header,
            media: MediaConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                folder: optional("CLOUDINARY_FOLDER"),
                timeout: Duration::from_secs(timeout),
            },
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is missing")]
    Missing(&'static str),
    #[error("environment variable {0} is invalid: {1}")]
    Invalid(&'static str, String),
}
