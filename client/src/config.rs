use std::{env, fmt::Display, fs::read_to_string, io::ErrorKind, str::FromStr, time::Duration};

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub struct Config {
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub token: Option<SecretString>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let timeout_secs: u64 = try_load("VERIFIKASI_TIMEOUT_SECS", "30")?;

        Ok(Self {
            api_url: try_load("VERIFIKASI_API_URL", DEFAULT_API_URL)?,
            timeout: timeout_from_secs(timeout_secs),
            token: read_secret("VERIFIKASI_TOKEN")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: timeout_from_secs(30),
            token: None,
        }
    }
}

/// Zero turns the timeout off.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &'static str) -> Result<Option<SecretString>, ConfigError> {
    read_secret_at(&format!("/run/secrets/{secret_name}"), secret_name)
}

fn read_secret_at(
    path: &str,
    secret_name: &'static str,
) -> Result<Option<SecretString>, ConfigError> {
    match read_to_string(path) {
        Ok(s) if s.trim().is_empty() => {
            warn!("{secret_name} is mounted but empty, ignoring it");

            Ok(None)
        }
        Ok(s) => Ok(Some(SecretString::from(s.trim().to_string()))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{secret_name} not mounted, checking environment");

            Ok(var(secret_name).map(SecretString::from))
        }
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");

            Err(ConfigError::Secret {
                name: secret_name,
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use super::{Config, DEFAULT_API_URL, read_secret_at, timeout_from_secs};

    #[test]
    fn test_timeout_zero_disables() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(5), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_default() {
        let config = Config::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_blank_secret_file_is_ignored() {
        let dir = std::env::temp_dir();
        let blank = dir.join(format!("verifikasi-blank-{}", std::process::id()));
        let filled = dir.join(format!("verifikasi-filled-{}", std::process::id()));
        std::fs::write(&blank, "  \n").unwrap();
        std::fs::write(&filled, "tok-1\n").unwrap();

        let empty = read_secret_at(blank.to_str().unwrap(), "VERIFIKASI_TOKEN").unwrap();
        let token = read_secret_at(filled.to_str().unwrap(), "VERIFIKASI_TOKEN")
            .unwrap()
            .unwrap();

        assert!(empty.is_none());
        assert_eq!(token.expose_secret(), "tok-1");

        std::fs::remove_file(blank).unwrap();
        std::fs::remove_file(filled).unwrap();
    }
}
