//! Configuration file handling.
//!
//! Config lives in ~/.report-console/config.json. A missing file means
//! defaults; a present but unparsable file is an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Config;
use crate::util::{atomic_write_str, console_dir};

pub fn config_path() -> Result<PathBuf, String> {
    let dir = console_dir().ok_or("Could not find home directory")?;
    Ok(dir.join("config.json"))
}

/// Load the config file, or defaults when there is none.
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Apply the command-line or environment API URL, if any.
///
/// Clap already resolves flag-over-environment, so a single override
/// arrives here.
pub fn with_api_url_override(mut config: Config, api_url: Option<String>) -> Config {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        log::debug!("API URL overridden: {}", url);
        config.api_url = url;
    }
    config
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    atomic_write_str(path, &content).map_err(|e| format!("Failed to write config: {}", e))
}

/// Load (or default), apply the mutator, write back. Nothing is written if
/// the mutator fails.
pub fn create_or_update_config(
    mutator: impl FnOnce(&mut Config) -> Result<(), String>,
) -> Result<Config, String> {
    create_or_update_config_at(&config_path()?, mutator)
}

pub fn create_or_update_config_at(
    path: &Path,
    mutator: impl FnOnce(&mut Config) -> Result<(), String>,
) -> Result<Config, String> {
    let mut config = load_config_from(path)?;
    mutator(&mut config)?;
    save_config_to(path, &config)?;
    log::info!("Config written to {}", path.display());
    Ok(config)
}

/// Set one config key from text, as typed on the command line.
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "apiUrl" | "api-url" => {
            url::Url::parse(value).map_err(|e| format!("Invalid URL '{}': {}", value, e))?;
            config.api_url = value.trim_end_matches('/').to_string();
        }
        "syncDebounceMs" | "sync-debounce-ms" => {
            config.sync_debounce_ms = value
                .parse()
                .map_err(|_| format!("'{}' is not a number of milliseconds", value))?;
        }
        "bannerSeconds" | "banner-seconds" => {
            config.banner_seconds = value
                .parse()
                .map_err(|_| format!("'{}' is not a number of seconds", value))?;
        }
        "defaultDomain" | "default-domain" => {
            config.default_domain = value.parse()?;
        }
        other => return Err(format!("Unknown config key '{}'", other)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Domain;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_create_or_update_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        create_or_update_config_at(&path, |c| {
            c.banner_seconds = 9;
            Ok(())
        })
        .unwrap();
        let updated = create_or_update_config_at(&path, |c| {
            c.default_domain = Domain::Gmail;
            Ok(())
        })
        .unwrap();

        assert_eq!(updated.banner_seconds, 9);
        let on_disk = load_config_from(&path).unwrap();
        assert_eq!(on_disk, updated);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"defaultDomain\": \"@gmail.com\""));
    }

    #[test]
    fn test_failed_mutation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let result =
            create_or_update_config_at(&path, |c| set_config_value(c, "bannerSeconds", "soon"));

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_api_url_override() {
        let config = with_api_url_override(Config::default(), Some("https://r.example".into()));
        assert_eq!(config.api_url, "https://r.example");

        let config = with_api_url_override(Config::default(), Some("  ".into()));
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn test_set_config_value() {
        let mut config = Config::default();
        set_config_value(&mut config, "apiUrl", "https://r.example/").unwrap();
        set_config_value(&mut config, "sync-debounce-ms", "250").unwrap();
        set_config_value(&mut config, "defaultDomain", "hotmail.com").unwrap();

        assert_eq!(config.api_url, "https://r.example");
        assert_eq!(config.sync_debounce_ms, 250);
        assert_eq!(config.default_domain, Domain::Hotmail);

        assert!(set_config_value(&mut config, "bannerSeconds", "soon").is_err());
        assert!(set_config_value(&mut config, "colour", "blue").is_err());
        assert!(set_config_value(&mut config, "apiUrl", "not a url").is_err());
    }
}
