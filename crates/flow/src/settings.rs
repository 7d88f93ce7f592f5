//! SSO flow configuration.
//!
//! Settings are plain values captured at construction time; nothing in the
//! flow reads configuration from a global.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Environment variable toggling `renew` handling.
pub const ENV_RENEW_AUTHN_ENABLED: &str = "CASFLOW_SSO_RENEW_AUTHN_ENABLED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoSettings {
    /// Honor the `renew` request parameter. When disabled the parameter is
    /// treated as blank.
    pub renew_authn_enabled: bool,
}

impl Default for SsoSettings {
    fn default() -> Self {
        Self {
            renew_authn_enabled: true,
        }
    }
}

impl SsoSettings {
    /// Load settings from the process environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup (env, test maps, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(raw) = lookup(ENV_RENEW_AUTHN_ENABLED) {
            settings.renew_authn_enabled = parse_flag(ENV_RENEW_AUTHN_ENABLED, &raw)?;
        }
        Ok(settings)
    }

    /// Parse a JSON settings document; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(raw).map_err(|e| SettingsError::Malformed(e.to_string()))
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, SettingsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::Invalid {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
