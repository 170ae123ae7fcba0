/*
 * Responsibility
 * - Read environment variables once at startup (Mautic / Keycloak credentials, listen port)
 * - Validate values (missing or malformed -> startup fails)
 * - The resulting Config is immutable and shared by every request via AppState
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Marketing platform (Mautic) service account.
#[derive(Clone)]
pub struct MauticConfig {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub page_size: u32,
}

impl fmt::Debug for MauticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the password
        f.debug_struct("MauticConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Identity provider (Keycloak) confidential client.
#[derive(Clone)]
pub struct KeycloakConfig {
    pub base_url: Url,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the client secret
        f.debug_struct("KeycloakConfig")
            .field("base_url", &self.base_url.as_str())
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub mautic: MauticConfig,
    pub keycloak: KeycloakConfig,

    // Applied to every outbound call (Keycloak + Mautic)
    pub upstream_timeout: Duration,
    // Whole inbound request, upstream calls included
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a Config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let page_size: u32 = parse_positive(lookup("MAUTIC_PAGE_SIZE"), "MAUTIC_PAGE_SIZE", 100)?;

        let mautic = MauticConfig {
            base_url: parse_base_url("MAUTIC_URL", &required("MAUTIC_URL")?)?,
            username: required("MAUTIC_USER")?,
            password: required("MAUTIC_PW")?,
            page_size,
        };

        let keycloak = KeycloakConfig {
            base_url: parse_base_url("KC_URL", &required("KC_URL")?)?,
            realm: required("KC_REALM")?,
            client_id: required("KC_CLIENT_ID")?,
            client_secret: required("KC_CLIENT_SECRET")?,
        };

        let upstream_timeout_seconds: u64 = parse_positive(
            lookup("UPSTREAM_TIMEOUT_SECONDS"),
            "UPSTREAM_TIMEOUT_SECONDS",
            10,
        )?;

        let request_timeout_seconds: u64 = parse_positive(
            lookup("REQUEST_TIMEOUT_SECONDS"),
            "REQUEST_TIMEOUT_SECONDS",
            30,
        )?;

        Ok(Self {
            addr,
            app_env,
            mautic,
            keycloak,
            upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

/// Optional numeric setting; when present it must parse and be > 0.
fn parse_positive<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .filter(|n| *n > T::default())
            .ok_or(ConfigError::Invalid(key)),
    }
}

/// Parse a base URL and make sure it ends with `/` so that `Url::join` appends
/// relative paths instead of replacing the last segment.
fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let mut raw = raw.to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }

    let url = Url::parse(&raw).map_err(|_| ConfigError::Invalid(key))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MAUTIC_URL", "https://mautic.example.com"),
            ("MAUTIC_USER", "api-user"),
            ("MAUTIC_PW", "api-password"),
            ("KC_URL", "https://sso.example.com/auth/"),
            ("KC_REALM", "marketing"),
            ("KC_CLIENT_ID", "segments-gateway"),
            ("KC_CLIENT_SECRET", "s3cret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.mautic.page_size, 100);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_urls_gain_a_trailing_slash() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.mautic.base_url.as_str(), "https://mautic.example.com/");
        assert_eq!(
            config
                .mautic
                .base_url
                .join("api/segments")
                .unwrap()
                .as_str(),
            "https://mautic.example.com/api/segments"
        );
        assert_eq!(config.keycloak.base_url.as_str(), "https://sso.example.com/auth/");
    }

    #[test]
    fn missing_credentials_fail_startup() {
        let mut vars = base_vars();
        vars.remove("MAUTIC_PW");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("MAUTIC_PW"));

        let mut vars = base_vars();
        vars.insert("KC_CLIENT_SECRET", "   ");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("KC_CLIENT_SECRET")
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT", "http");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Invalid("PORT"));

        let mut vars = base_vars();
        vars.insert("MAUTIC_URL", "ftp://mautic.example.com");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Invalid("MAUTIC_URL"));

        let mut vars = base_vars();
        vars.insert("MAUTIC_PAGE_SIZE", "0");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid("MAUTIC_PAGE_SIZE")
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&base_vars()).unwrap();
        let printed = format!("{:?}", config);

        assert!(!printed.contains("api-password"));
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("api-user"));
    }
}
