//! Converger configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (~/.config/gcal-converger/config.toml unless another path is given),
//! then `GCAL_CONVERGER_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvergeError, ConvergeResult};
use crate::remote::{Transparency, Visibility};

const ENV_PREFIX: &str = "GCAL_CONVERGER";

/// Upper bound Google accepts for `maxResults`.
const MAX_RESULTS_LIMIT: u32 = 2500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergeConfig {
    /// Calendar to converge ("primary" is the account's main calendar)
    pub calendar_id: String,
    /// IANA time zone label attached to inserted events
    pub time_zone: String,
    pub color_id: String,
    pub transparency: Transparency,
    pub visibility: Visibility,
    /// Cap on candidate events fetched per run
    pub max_results: u32,
    /// OAuth client credentials as downloaded from the Google Cloud console
    pub credentials_file: PathBuf,
    /// Where the OAuth token is stored after `auth`
    pub token_file: PathBuf,
}

impl Default for ConvergeConfig {
    fn default() -> Self {
        ConvergeConfig {
            calendar_id: "primary".to_string(),
            time_zone: "Asia/Tokyo".to_string(),
            color_id: "11".to_string(),
            transparency: Transparency::Opaque,
            visibility: Visibility::Private,
            max_results: 100,
            credentials_file: PathBuf::from("credentials.json"),
            token_file: PathBuf::from("token.json"),
        }
    }
}

impl ConvergeConfig {
    pub fn config_path() -> ConvergeResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConvergeError::Config("Could not determine config directory".into()))?
            .join("gcal-converger");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the layered configuration.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> ConvergeResult<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_path()).required(required))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ConvergeError::Config(format!("{}: {}", path.display(), e)))?;

        let mut cfg: ConvergeConfig = settings
            .try_deserialize()
            .map_err(|e| ConvergeError::Config(format!("{}: {}", path.display(), e)))?;

        cfg.credentials_file = expand_path(&cfg.credentials_file);
        cfg.token_file = expand_path(&cfg.token_file);
        cfg.validate()?;

        tracing::debug!(path = %path.display(), calendar_id = %cfg.calendar_id, "loaded configuration");

        Ok(cfg)
    }

    pub fn validate(&self) -> ConvergeResult<()> {
        if self.calendar_id.is_empty() {
            return Err(ConvergeError::Config("calendar_id must not be empty".into()));
        }

        if self.time_zone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConvergeError::Config(format!(
                "time_zone '{}' is not an IANA time zone",
                self.time_zone
            )));
        }

        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(ConvergeError::Config(format!(
                "max_results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, self.max_results
            )));
        }

        Ok(())
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConvergeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.calendar_id, "primary");
        assert_eq!(cfg.max_results, 100);
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let cfg = ConvergeConfig {
            time_zone: "Mars/Olympus_Mons".to_string(),
            ..ConvergeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConvergeError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_max_results() {
        for max_results in [0, MAX_RESULTS_LIMIT + 1] {
            let cfg = ConvergeConfig {
                max_results,
                ..ConvergeConfig::default()
            };
            assert!(cfg.validate().is_err(), "max_results {} accepted", max_results);
        }
    }

    #[test]
    fn rejects_empty_calendar_id() {
        let cfg = ConvergeConfig {
            calendar_id: String::new(),
            ..ConvergeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let path = std::env::temp_dir().join(format!("gcal-converger-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "calendar_id = \"team@example.com\"\ncolor_id = \"5\"\nvisibility = \"public\"\nmax_results = 50\n",
        )
        .unwrap();

        let cfg = ConvergeConfig::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.calendar_id, "team@example.com");
        assert_eq!(cfg.color_id, "5");
        assert_eq!(cfg.visibility, Visibility::Public);
        assert_eq!(cfg.max_results, 50);
        assert_eq!(cfg.time_zone, "Asia/Tokyo");
    }

    #[test]
    fn explicit_file_must_exist() {
        let path = std::env::temp_dir().join("gcal-converger-missing-config.toml");
        assert!(matches!(ConvergeConfig::load(Some(path.as_path())), Err(ConvergeError::Config(_))));
    }
}
