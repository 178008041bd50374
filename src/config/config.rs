use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aes::Aes128;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use chrono_tz::Tz;
use log::LevelFilter;

use crate::error::ConfigError;

type Aes128Cbc = Cbc<Aes128, Pkcs7>;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";
pub const DEFAULT_SESSION_PATH: &str = "session.json";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_IP_LOOKUP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub level: LevelFilter,
    pub timezone: Tz,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
            level: LevelFilter::Info,
            timezone: Tz::UTC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Token taken from the environment. Takes precedence over the session file.
    pub auth_token: Option<String>,
    pub session_path: PathBuf,
    pub ip_lookup_url: String,
    /// Upper bound on the public IP lookup; past it writes are tagged `unknown`.
    pub ip_lookup_timeout: Duration,
    pub log: LogConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    /// Blank values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = var("HR_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let session_path = PathBuf::from(var("HR_SESSION_PATH").unwrap_or_else(|| DEFAULT_SESSION_PATH.to_string()));
        let ip_lookup_url = var("HR_IP_LOOKUP_URL").unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_string());
        let ip_lookup_timeout = match var("HR_IP_LOOKUP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "HR_IP_LOOKUP_TIMEOUT_SECS must be a positive number of seconds, got {}",
                        raw
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_IP_LOOKUP_TIMEOUT_SECS),
        };

        let auth_token = match (
            var("HR_AUTH_TOKEN"),
            var("HR_AES_KEY"),
            var("HR_AES_IV"),
            var("HR_AUTH_TOKEN_ENC"),
        ) {
            (Some(token), _, _, _) => Some(token),
            (None, Some(key), Some(iv), Some(enc)) => Some(decrypt_token(&key, &iv, &enc)?),
            (None, _, _, None) => None,
            (None, _, _, Some(_)) => {
                return Err(ConfigError::Invalid(
                    "HR_AUTH_TOKEN_ENC requires HR_AES_KEY and HR_AES_IV".to_string(),
                ));
            }
        };

        let level = match var("HR_LOG_LEVEL") {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::Invalid(format!("unknown log level: {}", raw)))?,
            None => LevelFilter::Info,
        };
        let timezone = match var("HR_LOG_TZ") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| ConfigError::Invalid(format!("unknown timezone {}: {}", raw, e)))?,
            None => Tz::UTC,
        };
        let dir = PathBuf::from(var("HR_LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()));

        Ok(Config {
            api_base_url,
            auth_token,
            session_path,
            ip_lookup_url,
            ip_lookup_timeout,
            log: LogConfig { dir, level, timezone },
        })
    }
}

/// Decrypts an AES-128-CBC/PKCS7 token. All three inputs are base64.
pub fn decrypt_token(key_b64: &str, iv_b64: &str, enc_b64: &str) -> Result<String, ConfigError> {
    let key = STANDARD
        .decode(key_b64)
        .map_err(|e| ConfigError::Decrypt(format!("key is not base64: {}", e)))?;
    let iv = STANDARD
        .decode(iv_b64)
        .map_err(|e| ConfigError::Decrypt(format!("iv is not base64: {}", e)))?;
    let ciphertext = STANDARD
        .decode(enc_b64)
        .map_err(|e| ConfigError::Decrypt(format!("token is not base64: {}", e)))?;

    let cipher = Aes128Cbc::new_from_slices(&key, &iv).map_err(|e| ConfigError::Decrypt(e.to_string()))?;
    let decrypted = cipher
        .decrypt_vec(&ciphertext)
        .map_err(|e| ConfigError::Decrypt(e.to_string()))?;

    String::from_utf8(decrypted).map_err(|_| ConfigError::Decrypt("token is not UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(config.session_path, PathBuf::from("session.json"));
        assert!(config.auth_token.is_none());
        assert_eq!(config.log.level, LevelFilter::Info);
        assert_eq!(config.log.timezone, Tz::UTC);
        assert_eq!(config.ip_lookup_timeout, Duration::from_secs(5));
    }

    #[test]
    fn ip_lookup_timeout_is_configurable_and_positive() {
        let config = Config::from_vars(vars(&[("HR_IP_LOOKUP_TIMEOUT_SECS", "2")])).unwrap();
        assert_eq!(config.ip_lookup_timeout, Duration::from_secs(2));
        assert!(Config::from_vars(vars(&[("HR_IP_LOOKUP_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_vars(vars(&[("HR_IP_LOOKUP_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_vars(vars(&[("HR_API_BASE_URL", "  "), ("HR_AUTH_TOKEN", "")])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn reads_explicit_values() {
        let config = Config::from_vars(vars(&[
            ("HR_API_BASE_URL", "https://hr.example.com/api"),
            ("HR_AUTH_TOKEN", "abc"),
            ("HR_LOG_LEVEL", "debug"),
            ("HR_LOG_TZ", "Asia/Colombo"),
            ("HR_LOG_DIR", "/var/log/hr"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://hr.example.com/api");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.log.level, LevelFilter::Debug);
        assert_eq!(config.log.timezone, chrono_tz::Asia::Colombo);
        assert_eq!(config.log.dir, PathBuf::from("/var/log/hr"));
    }

    #[test]
    fn rejects_unknown_level_and_timezone() {
        assert!(Config::from_vars(vars(&[("HR_LOG_LEVEL", "loud")])).is_err());
        assert!(Config::from_vars(vars(&[("HR_LOG_TZ", "Mars/Olympus")])).is_err());
    }

    #[test]
    fn decrypts_encrypted_token() {
        let key = [7u8; 16];
        let iv = [9u8; 16];
        let cipher = Aes128Cbc::new_from_slices(&key, &iv).unwrap();
        let ciphertext = cipher.encrypt_vec(b"secret-token");
        let key_b64 = STANDARD.encode(key);
        let iv_b64 = STANDARD.encode(iv);
        let enc_b64 = STANDARD.encode(ciphertext);

        let config = Config::from_vars(vars(&[
            ("HR_AES_KEY", key_b64.as_str()),
            ("HR_AES_IV", iv_b64.as_str()),
            ("HR_AUTH_TOKEN_ENC", enc_b64.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("secret-token"));
    }

    #[test]
    fn encrypted_token_without_key_is_an_error() {
        let err = Config::from_vars(vars(&[("HR_AUTH_TOKEN_ENC", "AAAA")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_base64_is_a_decrypt_error() {
        let err = decrypt_token("***", "AAAA", "AAAA").unwrap_err();
        assert!(matches!(err, ConfigError::Decrypt(_)));
    }
}
