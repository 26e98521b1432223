use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::services::calendar::WeekendPolicy;
use crate::services::protocol::SubmissionProtocol;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_OPEN_FORMS: usize = 10_000;
const DEFAULT_FORM_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Service settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub webhook_url: String,
    pub protocol: SubmissionProtocol,
    pub weekend_policy: WeekendPolicy,
    pub bind_addr: SocketAddr,
    pub server_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub max_open_forms: usize,
    pub form_idle_timeout: Duration,
}

impl ServiceConfig {
    /// Load settings from the process environment and any `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let webhook_url = get("BOOKING_WEBHOOK_URL")
            .ok_or(ConfigError::Missing("BOOKING_WEBHOOK_URL"))?
            .trim()
            .to_string();

        let protocol = match get("BOOKING_PROTOCOL") {
            Some(value) => parse_setting("BOOKING_PROTOCOL", &value)?,
            None => SubmissionProtocol::default(),
        };

        let weekend_policy = match get("WEEKEND_POLICY") {
            Some(value) => parse_setting("WEEKEND_POLICY", &value)?,
            None => WeekendPolicy::default(),
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => parse_setting("BIND_ADDR", &value)?,
            None => parse_setting("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        let server_timeout = match get("SERVER_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_setting("SERVER_TIMEOUT_SECS", &value)?),
            None => Duration::from_secs(DEFAULT_SERVER_TIMEOUT_SECS),
        };

        let request_timeout = match get("BOOKING_REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(parse_setting(
                "BOOKING_REQUEST_TIMEOUT_SECS",
                &value,
            )?)),
            None => None,
        };

        let max_open_forms = match get("MAX_OPEN_FORMS") {
            Some(value) => parse_setting("MAX_OPEN_FORMS", &value)?,
            None => DEFAULT_MAX_OPEN_FORMS,
        };

        let form_idle_timeout = match get("FORM_IDLE_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_setting("FORM_IDLE_TIMEOUT_SECS", &value)?),
            None => Duration::from_secs(DEFAULT_FORM_IDLE_TIMEOUT_SECS),
        };

        Ok(Self {
            webhook_url,
            protocol,
            weekend_policy,
            bind_addr,
            server_timeout,
            request_timeout,
            max_open_forms,
            form_idle_timeout,
        })
    }
}

fn parse_setting<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
