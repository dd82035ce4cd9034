use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autosave::AutosaveOptions;

pub const DEFAULT_CONTAINER_SELECTOR: &str = "#time-slots-picker";
pub const DEFAULT_SLOTS_API_URL: &str = "/get-domain-slots/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

fn default_container_selector() -> String {
    DEFAULT_CONTAINER_SELECTOR.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Everything a picker instance needs. Travels as JSON from the host page
/// (or the `load_picker_options` server function) to the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickerOptions {
    #[serde(default = "default_container_selector")]
    pub container_selector: String,
    pub api_url: String,
    #[serde(default)]
    pub initial_selected_slots: Vec<String>,
    #[serde(default)]
    pub save_url: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl PickerOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Options(e.to_string()))?;
        if options.api_url.trim().is_empty() {
            return Err(ConfigError::Options("api_url is empty".to_string()));
        }
        Ok(options)
    }

    /// Autosave settings, present only when a save URL is configured.
    pub fn autosave(&self) -> Option<AutosaveOptions> {
        let save_url = self.save_url.as_ref().filter(|url| !url.trim().is_empty())?;
        Some(AutosaveOptions {
            save_url: save_url.clone(),
            csrf_token: self.csrf_token.clone(),
            debounce: Duration::from_millis(self.debounce_ms),
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid picker options: {0}")]
    Options(String),
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },
    #[error("picker configuration already initialized")]
    AlreadyInitialized,
}

/// Host-side settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub slots_api_url: String,
    pub save_url: Option<String>,
    pub debounce_ms: u64,
    pub csrf_token: Option<String>,
    pub seed_slots: Vec<String>,
}

impl HostConfig {
    /// Reads settings through `lookup` so callers decide where they come from.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let debounce_ms = match non_empty("AUTOSAVE_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: "AUTOSAVE_DEBOUNCE_MS",
                value: raw,
            })?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        let seed_slots = non_empty("PREFERRED_SLOTS_SEED")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            slots_api_url: non_empty("SLOTS_API_URL")
                .unwrap_or_else(|| DEFAULT_SLOTS_API_URL.to_string()),
            save_url: non_empty("PREFERRED_SLOTS_SAVE_URL"),
            debounce_ms,
            csrf_token: non_empty("CSRF_TOKEN"),
            seed_slots,
        })
    }

    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            api_url: self.slots_api_url.clone(),
            initial_selected_slots: self.seed_slots.clone(),
            save_url: self.save_url.clone(),
            csrf_token: self.csrf_token.clone(),
            debounce_ms: self.debounce_ms,
        }
    }
}

#[cfg(feature = "ssr")]
static HOST_CONFIG: std::sync::OnceLock<HostConfig> = std::sync::OnceLock::new();

/// Loads `.env` (parent directory first, for `cargo leptos watch` from `web/`)
/// and stores the host configuration for server functions.
#[cfg(feature = "ssr")]
pub fn init_config() -> Result<&'static HostConfig, ConfigError> {
    dotenvy::from_filename("../.env")
        .or_else(|_| dotenvy::dotenv())
        .ok();

    let config = HostConfig::from_lookup(|name| std::env::var(name).ok())?;
    tracing::debug!(
        slots_api_url = %config.slots_api_url,
        autosave = config.save_url.is_some(),
        debounce_ms = config.debounce_ms,
        "picker host configuration loaded"
    );

    HOST_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    get_config().ok_or(ConfigError::AlreadyInitialized)
}

#[cfg(feature = "ssr")]
pub fn get_config() -> Option<&'static HostConfig> {
    HOST_CONFIG.get()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.slots_api_url, DEFAULT_SLOTS_API_URL);
        assert_eq!(config.save_url, None);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(config.seed_slots.is_empty());
        assert!(config.picker_options().autosave().is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = HostConfig::from_lookup(lookup(&[
            ("SLOTS_API_URL", "/api/slots/"),
            ("PREFERRED_SLOTS_SAVE_URL", "/api/slots/save/"),
            ("AUTOSAVE_DEBOUNCE_MS", " 250 "),
            ("CSRF_TOKEN", "token"),
            ("PREFERRED_SLOTS_SEED", "2026-01-20 10:00:00+03, ,2026-01-21T10:00:00+03:00"),
        ]))
        .unwrap();

        let options = config.picker_options();
        assert_eq!(options.api_url, "/api/slots/");
        assert_eq!(options.initial_selected_slots.len(), 2);

        let autosave = options.autosave().unwrap();
        assert_eq!(autosave.save_url, "/api/slots/save/");
        assert_eq!(autosave.csrf_token.as_deref(), Some("token"));
        assert_eq!(autosave.debounce, Duration::from_millis(250));
    }

    #[test]
    fn bad_debounce_is_reported() {
        let err = HostConfig::from_lookup(lookup(&[("AUTOSAVE_DEBOUNCE_MS", "soon")])).unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidVar {
                name: "AUTOSAVE_DEBOUNCE_MS",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn options_json_fills_defaults() {
        let options = PickerOptions::from_json(r#"{"api_url": "/get-domain-slots/"}"#).unwrap();

        assert_eq!(options.container_selector, DEFAULT_CONTAINER_SELECTOR);
        assert_eq!(options.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(options.initial_selected_slots.is_empty());
        assert!(options.autosave().is_none());
    }

    #[test]
    fn options_json_requires_an_api_url() {
        assert!(PickerOptions::from_json(r#"{"api_url": "  "}"#).is_err());
        assert!(PickerOptions::from_json(r##"{"container_selector": "#x"}"##).is_err());
        assert!(PickerOptions::from_json("not json").is_err());
    }

    #[test]
    fn blank_save_url_disables_autosave() {
        let options = PickerOptions::from_json(r#"{"api_url": "/s/", "save_url": ""}"#).unwrap();

        assert!(options.autosave().is_none());
    }
}
