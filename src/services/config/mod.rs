//! Application configuration loaded from `config.toml`.
//!
//! ```toml
//! database_path = "/var/lib/crm/meetings.db"
//!
//! [provider]
//! endpoint = "https://video.example.com/api"
//! token_env = "CRM_PROVIDER_TOKEN"
//! timezone = "Europe/Berlin"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::services::provider::{HttpMeetingProvider, MeetingProviderSync, UnconfiguredProvider};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_TOKEN_ENV: &str = "CRM_PROVIDER_TOKEN";
pub const DEFAULT_PROVIDER_TIMEZONE: &str = "UTC";
const DATABASE_FILE_NAME: &str = "crm_calendar.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "CrmCalendar", "CrmCalendar")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    /// IANA zone the provider interprets wall-clock times in.
    pub timezone: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timezone: DEFAULT_PROVIDER_TIMEZONE.to_string(),
        }
    }
}

impl AppConfig {
    /// Location of `config.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the platform config directory, or defaults if there is none.
    /// An existing file that fails to parse or validate is an error.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_or_init(&path),
            None => {
                log::warn!("No home directory found; using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`, first writing the defaults there as a template if the
    /// file does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Could not write default config: {:#}", e),
        }
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))?;

        config.provider.timezone()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config at {}", path.display()))
    }

    /// Database file to open. Debug builds keep it in the working directory.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        if cfg!(debug_assertions) {
            return Ok(PathBuf::from(DATABASE_FILE_NAME));
        }

        match project_dirs() {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                std::fs::create_dir_all(data_dir).with_context(|| {
                    format!("Failed to create data directory {}", data_dir.display())
                })?;
                Ok(data_dir.join(DATABASE_FILE_NAME))
            }
            None => Ok(PathBuf::from(DATABASE_FILE_NAME)),
        }
    }
}

impl ProviderConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown provider timezone '{}': {}", self.timezone, e))
    }

    /// Bearer token from the configured environment variable, if set and non-blank.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }

    /// Provider client for this configuration. Without an endpoint every sync fails.
    pub fn build_client(&self) -> Result<Arc<dyn MeetingProviderSync>> {
        match self.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => {
                let token = self.token();
                if token.is_none() {
                    log::warn!(
                        "Provider endpoint configured but {} is not set; requests will be unauthenticated",
                        self.token_env
                    );
                }
                Ok(Arc::new(HttpMeetingProvider::new(endpoint, token)?))
            }
            _ => {
                log::info!("No provider endpoint configured; linked meetings cannot be moved");
                Ok(Arc::new(UnconfiguredProvider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.provider.token_env, "CRM_PROVIDER_TOKEN");
        assert_eq!(config.provider.timezone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[provider]\nendpoint = \"https://video.example.com/api\"\ntimezone = \"Europe/Berlin\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.database_path, None);
        assert_eq!(
            config.provider.endpoint.as_deref(),
            Some("https://video.example.com/api")
        );
        assert_eq!(config.provider.token_env, DEFAULT_TOKEN_ENV);
        assert_eq!(
            config.provider.timezone().unwrap(),
            chrono_tz::Europe::Berlin
        );
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\ntimezone = \"Mars/Olympus\"\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_bad_timezone_does_not_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database_path = \"/data/crm.db\"\n\n[provider]\nendpoint = \"https://video.example.com/api\"\ntimezone = \"Europe/Berln\"\n",
        )
        .unwrap();

        let err = AppConfig::load_or_init(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Europe/Berln"));
        // The broken file is left for the user to fix
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("Europe/Berln"));
    }

    #[test]
    fn test_first_launch_writes_default_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CrmCalendar").join("config.toml");

        let config = AppConfig::load_or_init(&path).unwrap();

        assert_eq!(config, AppConfig::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("token_env = \"CRM_PROVIDER_TOKEN\""));
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            database_path: Some(PathBuf::from("/tmp/meetings.db")),
            provider: ProviderConfig {
                endpoint: Some("https://video.example.com".to_string()),
                ..ProviderConfig::default()
            },
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = AppConfig {
            database_path: Some(PathBuf::from("/data/crm.db")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/data/crm.db")
        );
    }

    #[test]
    #[serial]
    fn test_token_read_from_named_env_var() {
        let provider = ProviderConfig {
            token_env: "CRM_CALENDAR_TEST_TOKEN".to_string(),
            ..ProviderConfig::default()
        };

        std::env::set_var("CRM_CALENDAR_TEST_TOKEN", "secret");
        assert_eq!(provider.token().as_deref(), Some("secret"));

        std::env::set_var("CRM_CALENDAR_TEST_TOKEN", "   ");
        assert_eq!(provider.token(), None);

        std::env::remove_var("CRM_CALENDAR_TEST_TOKEN");
        assert_eq!(provider.token(), None);
    }

    #[test]
    #[serial]
    fn test_build_client_without_endpoint() {
        let provider = ProviderConfig::default();
        assert!(provider.build_client().is_ok());
    }

    #[test]
    fn test_build_client_rejects_insecure_endpoint() {
        let provider = ProviderConfig {
            endpoint: Some("http://video.example.com".to_string()),
            ..ProviderConfig::default()
        };
        assert!(provider.build_client().is_err());
    }
}
