use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use latchkey_core::DeviceId;
use serde::Deserialize;

use crate::config::constants::{CONFIG_FILE, defaults, env};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub device: DeviceSettings,
    pub cache: CacheSettings,
    pub login: LoginSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSettings {
    /// Persisted device id. A fresh one is minted when unset.
    #[serde(default)]
    pub id: Option<DeviceId>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// `false` selects the pass-through self cache.
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSettings {
    pub skip_checkup: bool,
    pub store_secret: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub filter: String,
}

impl Settings {
    /// Loads `.env`, then `latchkey.json` (optional), then `LATCHKEY__*`
    /// environment variables, later sources overriding earlier ones.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?
            .add_source(File::new(path, FileFormat::Json).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with an in-memory JSON document. No environment.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    pub fn device_id(&self) -> DeviceId {
        self.device.id.unwrap_or_default()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("device.name", defaults::DEVICE_NAME)?
            .set_default("cache.enabled", defaults::CACHE_ENABLED)?
            .set_default("login.skip_checkup", defaults::SKIP_CHECKUP)?
            .set_default("login.store_secret", defaults::STORE_SECRET)?
            .set_default("log.filter", defaults::LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_document() {
        let settings = Settings::from_json_str("{}").unwrap();

        assert_eq!(settings.device.name, defaults::DEVICE_NAME);
        assert!(settings.device.id.is_none());
        assert!(settings.cache.enabled);
        assert!(!settings.login.skip_checkup);
        assert!(!settings.login.store_secret);
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_document_overrides_defaults() {
        let device_id = DeviceId::new();
        let json = format!(
            r#"{{
                "device": {{ "id": "{device_id}", "name": "laptop" }},
                "cache": {{ "enabled": false }},
                "login": {{ "skip_checkup": true }}
            }}"#
        );

        let settings = Settings::from_json_str(&json).unwrap();

        assert_eq!(settings.device_id(), device_id);
        assert_eq!(settings.device.name, "laptop");
        assert!(!settings.cache.enabled);
        assert!(settings.login.skip_checkup);
        assert!(!settings.login.store_secret);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from("does-not-exist.json").unwrap();
        assert_eq!(settings.device.name, defaults::DEVICE_NAME);
    }

    #[test]
    fn test_invalid_device_id_is_rejected() {
        let json = r#"{ "device": { "id": "nope", "name": "laptop" } }"#;
        assert!(Settings::from_json_str(json).is_err());
    }
}
