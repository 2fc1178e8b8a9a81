use crate::error::{FormsiteError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const ON_SUCCESS: &str = "FORMSITE_ON_SUCCESS";
pub const LOG_FILTER: &str = "FORMSITE_LOG";

/// Key/value configuration source
///
/// `from_env` snapshots the process environment; `set` overrides single keys.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse a key, falling back to `default` when it is unset or blank.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| FormsiteError::config(key, format!("'{}': {}", raw, e))),
            _ => Ok(default),
        }
    }
}

/// What the users page answers after a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SuccessBehavior {
    /// Render the index page content in place, leaving the browser on the users URL.
    #[default]
    Render,
    /// Answer 303 See Other pointing at the index route.
    Redirect,
}

/// Settings consumed by the view controllers
#[derive(Debug, Clone, Default)]
pub struct ViewSettings {
    pub on_success: SuccessBehavior,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub views: ViewSettings,
}

impl AppSettings {
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            host: config.parse_or(HOST, "0.0.0.0".to_string())?,
            port: config.parse_or(PORT, 8000)?,
            log_filter: config.parse_or(LOG_FILTER, "info".to_string())?,
            views: ViewSettings {
                on_success: config.parse_or(ON_SUCCESS, SuccessBehavior::default())?,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
