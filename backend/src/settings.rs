//! Portal configuration loaded via OrthoConfig.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::origin::OriginPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// No upstream base URL was configured.
    #[error("PORTAL_API_BASE_URL must be set")]
    MissingApiBaseUrl,
    /// The upstream base URL did not parse.
    #[error("invalid upstream base URL {value:?}: {reason}")]
    InvalidApiBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The bind address did not parse.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
    },
}

/// Configuration values for the portal server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Base URL of the upstream departments API.
    pub api_base_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Optional timeout for upstream calls, in seconds.
    pub upstream_timeout_secs: Option<u64>,
    /// Comma-separated hosts accepted as origins for action requests.
    pub allowed_origins: Option<String>,
}

impl PortalSettings {
    /// Parse the upstream base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is missing, blank or not a URL.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SettingsError::MissingApiBaseUrl)?;
        Url::parse(raw).map_err(|err| SettingsError::InvalidApiBaseUrl {
            value: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] for unparsable addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Upstream request timeout; `None` or zero leaves calls unbounded.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Origin allow-list for state-changing action requests.
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::new(
            self.allowed_origins
                .as_deref()
                .unwrap_or_default()
                .split(','),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for portal settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "PORTAL_API_BASE_URL",
        "PORTAL_BIND_ADDR",
        "PORTAL_UPSTREAM_TIMEOUT_SECS",
        "PORTAL_ALLOWED_ORIGINS",
    ];

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("department-portal")])
            .expect("config should load")
    }

    fn settings(api_base_url: Option<&str>) -> PortalSettings {
        PortalSettings {
            api_base_url: api_base_url.map(str::to_owned),
            bind_addr: None,
            upstream_timeout_secs: None,
            allowed_origins: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url(),
            Err(SettingsError::MissingApiBaseUrl)
        );
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert!(settings.upstream_timeout().is_none());
        assert_eq!(settings.origin_policy(), OriginPolicy::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "PORTAL_API_BASE_URL",
                Some("https://api.example.com/v1".to_owned()),
            ),
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:3000".to_owned())),
            ("PORTAL_UPSTREAM_TIMEOUT_SECS", Some("15".to_owned())),
            (
                "PORTAL_ALLOWED_ORIGINS",
                Some("portal.example.com, *.example.org".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().map(String::from).as_deref(),
            Ok("https://api.example.com/v1")
        );
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 3000)))
        );
        assert_eq!(settings.upstream_timeout(), Some(Duration::from_secs(15)));
        let policy = settings.origin_policy();
        assert!(policy.allows_host("portal.example.com"));
        assert!(policy.allows_host("hr.example.org"));
    }

    #[rstest]
    #[case(Some("   "))]
    #[case(None)]
    fn blank_base_url_is_missing(#[case] value: Option<&str>) {
        assert_eq!(
            settings(value).api_base_url(),
            Err(SettingsError::MissingApiBaseUrl)
        );
    }

    #[rstest]
    fn unparsable_base_url_is_reported() {
        let err = settings(Some("not a url"))
            .api_base_url()
            .expect_err("invalid url");
        assert!(matches!(err, SettingsError::InvalidApiBaseUrl { .. }));
    }

    #[rstest]
    fn unparsable_bind_addr_is_reported() {
        let mut settings = settings(None);
        settings.bind_addr = Some("localhost".to_owned());
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr {
                value: "localhost".to_owned()
            })
        );
    }

    #[rstest]
    fn zero_timeout_means_unbounded() {
        let mut settings = settings(None);
        settings.upstream_timeout_secs = Some(0);
        assert!(settings.upstream_timeout().is_none());
    }
}
