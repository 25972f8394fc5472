//! Runtime configuration loaded via OrthoConfig.
//!
//! Settings come from CLI arguments, environment variables with the
//! `BACKOFFICE_` prefix, and configuration files, in that precedence.
//! The API key never appears in logs; only its truncated SHA-256
//! fingerprint does.

use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const DEFAULT_GATEWAY_URL: &str = "http://localhost:54321/";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Length of the key fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Configuration for the gateway connection.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BACKOFFICE")]
pub struct BackofficeSettings {
    /// Base URL of the gateway (REST, functions, and auth share it).
    pub gateway_url: Option<String>,
    /// Anonymous API key presented as `apikey` and bearer token.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub request_timeout_seconds: Option<u64>,
}

impl BackofficeSettings {
    /// Return the configured gateway URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error when the configured value is
    /// not a valid absolute URL.
    pub fn gateway_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.gateway_url.as_deref().unwrap_or(DEFAULT_GATEWAY_URL))
    }

    /// Return the configured request timeout, falling back to 30s.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    /// Truncated SHA-256 fingerprint of the API key, safe for logs.
    ///
    /// Returns the first 8 bytes of the hash as a 16-character hex
    /// string, enough for visual distinction without being
    /// security-sensitive.
    pub fn api_key_fingerprint(&self) -> String {
        let key = Zeroizing::new(self.api_key.clone());
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for gateway configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> BackofficeSettings {
        BackofficeSettings::load_from_iter([OsString::from("backoffice")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("BACKOFFICE_GATEWAY_URL", None::<String>),
            ("BACKOFFICE_API_KEY", Some("anon-key".to_owned())),
            ("BACKOFFICE_REQUEST_TIMEOUT_SECONDS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        let url = settings.gateway_url().expect("default URL parses");
        assert_eq!(url.as_str(), DEFAULT_GATEWAY_URL);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "BACKOFFICE_GATEWAY_URL",
                Some("https://project.example.co/".to_owned()),
            ),
            ("BACKOFFICE_API_KEY", Some("anon-key".to_owned())),
            ("BACKOFFICE_REQUEST_TIMEOUT_SECONDS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let url = settings.gateway_url().expect("override URL parses");
        assert_eq!(url.host_str(), Some("project.example.co"));
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn fingerprint_is_deterministic_and_never_the_key() {
        let _guard = lock_env([
            ("BACKOFFICE_GATEWAY_URL", None::<String>),
            ("BACKOFFICE_API_KEY", Some("anon-key".to_owned())),
            ("BACKOFFICE_REQUEST_TIMEOUT_SECONDS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        let fp = settings.api_key_fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, settings.api_key_fingerprint());
        assert_ne!(fp, settings.api_key);
    }
}
