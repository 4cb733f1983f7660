//! Runtime configuration.
//!
//! Every pipeline component receives its settings through one of these
//! structs at construction time. Values come from the environment (with a
//! best-effort `.env` load); `from_lookup` takes any key lookup so tests can
//! supply values without touching the process environment.

use crate::error::{Result, SyncError};
use chrono::TimeDelta;
use std::time::Duration;

/// Chunk threshold used when `SYNC_CHUNK_BYTES` is unset.
pub const DEFAULT_CHUNK_BYTES: u64 = 400_000;

/// Debounce window used by the CRM binaries when `SYNC_DEBOUNCE_SECS` is unset.
pub const DEFAULT_DEBOUNCE_SECS: i64 = 10;

/// Property names attached from the trailing fields of each line.
pub const DEFAULT_PROPERTY_FIELDS: [&str; 3] = ["blacklisted", "member_status", "member_modified"];

/// Connection settings for the customer sync endpoint.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub base_url: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(SyncConfig {
            base_url: get_or(&lookup, "SYNC_BASE_URL", "https://sync.usercare.com"),
            api_key: get_required(&lookup, "SYNC_API_KEY")?,
            username: get_required(&lookup, "SYNC_USERNAME")?,
            password: get_required(&lookup, "SYNC_PASSWORD")?,
            timeout_secs: get_parsed(&lookup, "SYNC_TIMEOUT_SECS", 30)?,
        })
    }

    /// Full URL of the `sync_customers` resource.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/v1/{}/sync_customers/",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the file pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Byte threshold per chunk; `None` sends everything in one request.
    pub chunk_bytes: Option<u64>,
    pub property_fields: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            chunk_bytes: Some(DEFAULT_CHUNK_BYTES),
            property_fields: DEFAULT_PROPERTY_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoadConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_bytes = match get_parsed(&lookup, "SYNC_CHUNK_BYTES", DEFAULT_CHUNK_BYTES)? {
            0 => None,
            n => Some(n),
        };

        let property_fields = match lookup("SYNC_PROPERTY_FIELDS") {
            Some(raw) => {
                let fields: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if fields.is_empty() {
                    return Err(SyncError::Config(
                        "SYNC_PROPERTY_FIELDS is set but names no fields".to_string(),
                    ));
                }
                fields
            }
            None => LoadConfig::default().property_fields,
        };

        Ok(LoadConfig {
            chunk_bytes,
            property_fields,
        })
    }
}

/// Debounce window for event-driven syncs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceConfig {
    pub window: TimeDelta,
}

impl DebounceConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs: i64 = get_parsed(&lookup, "SYNC_DEBOUNCE_SECS", DEFAULT_DEBOUNCE_SECS)?;
        if secs < 0 {
            return Err(SyncError::Config(format!(
                "invalid SYNC_DEBOUNCE_SECS: {secs} is negative"
            )));
        }
        let window = TimeDelta::try_seconds(secs).ok_or_else(|| {
            SyncError::Config(format!("invalid SYNC_DEBOUNCE_SECS: {secs} is out of range"))
        })?;
        Ok(DebounceConfig { window })
    }
}

/// Salesforce OAuth and REST settings.
#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    pub token_url: String,
    pub instance_url: String,
    pub api_version: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    /// When `None` the token is fetched once and kept for the process lifetime.
    pub token_ttl_secs: Option<u64>,
}

impl SalesforceConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_ttl_secs = match lookup("SALESFORCE_TOKEN_TTL_SECS") {
            Some(raw) => Some(parse_value("SALESFORCE_TOKEN_TTL_SECS", &raw)?),
            None => None,
        };

        Ok(SalesforceConfig {
            token_url: get_or(
                &lookup,
                "SALESFORCE_TOKEN_URL",
                "https://login.salesforce.com/services/oauth2/token",
            ),
            instance_url: get_or(&lookup, "SALESFORCE_INSTANCE_URL", "https://na35.salesforce.com"),
            api_version: get_or(&lookup, "SALESFORCE_API_VERSION", "v20.0"),
            client_id: get_required(&lookup, "SALESFORCE_CLIENT_ID")?,
            client_secret: get_required(&lookup, "SALESFORCE_CLIENT_SECRET")?,
            username: get_required(&lookup, "SALESFORCE_USERNAME")?,
            password: get_required(&lookup, "SALESFORCE_PASSWORD")?,
            token_ttl_secs,
        })
    }
}

/// Zoho CRM search settings.
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    pub base_url: String,
    pub auth_token: String,
}

impl ZohoConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ZohoConfig {
            base_url: get_or(&lookup, "ZOHO_BASE_URL", "https://crm.zoho.com"),
            auth_token: get_required(&lookup, "ZOHO_AUTH_TOKEN")?,
        })
    }
}

fn load_dotenv() {
    // Best-effort; a missing .env is normal
    let _ = dotenvy::dotenv();
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn get_required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SyncError::Config(format!("{key} is required but not set")))
}

fn get_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_owned())
}

fn get_parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| SyncError::Config(format!("invalid {key}: {e}")))
}
