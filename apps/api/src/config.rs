// API settings loaded once at startup
// Read from environment variables (optionally via a .env file)

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;

use crate::api::cors::{AllowList, CorsPolicy};

pub const DEFAULT_PORT: u16 = 8000;

/// Errors raised while loading settings; fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-wide API settings
///
/// Built once by [`ApiSettings::from_env`] and passed by reference to the
/// components that need it. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub cors: CorsPolicy,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
}

impl ApiSettings {
    /// Load settings from the process environment
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup
    ///
    /// # Variables
    /// * `API_ALLOW_ORIGINS` - required, comma-separated or `*`
    /// * `API_ALLOW_METHODS` - defaults to `*`
    /// * `API_ALLOW_HEADERS` - defaults to `*`
    /// * `API_ALLOW_CREDENTIALS` - defaults to `false`
    /// * `API_PORT` - defaults to 8000
    /// * `DATABASE_URL` - optional; without it the in-memory store is used
    /// * `JWT_SECRET` - required
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let origins = get("API_ALLOW_ORIGINS").ok_or(ConfigError::Missing("API_ALLOW_ORIGINS"))?;
        let origins = parse_list("API_ALLOW_ORIGINS", &origins, |origin| {
            HeaderValue::from_str(origin).map_err(|e| e.to_string())
        })?;

        let methods = get("API_ALLOW_METHODS").unwrap_or_else(|| "*".to_string());
        let methods = parse_list("API_ALLOW_METHODS", &methods, |method| {
            Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|e| e.to_string())
        })?;

        let headers = get("API_ALLOW_HEADERS").unwrap_or_else(|| "*".to_string());
        let headers = parse_list("API_ALLOW_HEADERS", &headers, |header| {
            HeaderName::from_bytes(header.as_bytes()).map_err(|e| e.to_string())
        })?;

        let allow_credentials = match get("API_ALLOW_CREDENTIALS") {
            Some(value) => parse_bool("API_ALLOW_CREDENTIALS", &value)?,
            None => false,
        };

        let port = match get("API_PORT") {
            Some(value) => value.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                key: "API_PORT",
                value,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            cors: CorsPolicy {
                origins,
                methods,
                headers,
                allow_credentials,
            },
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
        })
    }
}

fn parse_list<T, P>(key: &'static str, raw: &str, parse: P) -> Result<AllowList<T>, ConfigError>
where
    P: Fn(&str) -> Result<T, String>,
{
    let items: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    if items.contains(&"*") {
        return Ok(AllowList::Any);
    }
    if items.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "list is empty".to_string(),
        });
    }

    items
        .into_iter()
        .map(|item| {
            parse(item).map_err(|reason| ConfigError::Invalid {
                key,
                value: item.to_string(),
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowList::Only)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiSettings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiSettings::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("API_ALLOW_ORIGINS", "https://app.example.com"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_applied() {
        let settings = load(&REQUIRED).expect("valid settings");

        assert_eq!(settings.port, 8000);
        assert!(!settings.cors.allow_credentials);
        assert_eq!(settings.cors.methods, AllowList::Any);
        assert_eq!(settings.cors.headers, AllowList::Any);
        assert_eq!(settings.database_url, None);
    }

    #[test]
    fn origins_are_required() {
        let err = load(&[("JWT_SECRET", "secret")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("API_ALLOW_ORIGINS"));
    }

    #[test]
    fn jwt_secret_is_required() {
        let err = load(&[("API_ALLOW_ORIGINS", "*")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = load(&[("API_ALLOW_ORIGINS", "   "), ("JWT_SECRET", "secret")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("API_ALLOW_ORIGINS"));
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("API_ALLOW_ORIGINS", "https://a.example.com, https://b.example.com");
        vars.push(("API_ALLOW_METHODS", "get, post"));
        vars.push(("API_ALLOW_HEADERS", "Authorization,Content-Type"));

        let settings = load(&vars).expect("valid settings");

        assert_eq!(
            settings.cors.origins,
            AllowList::Only(vec![
                HeaderValue::from_static("https://a.example.com"),
                HeaderValue::from_static("https://b.example.com"),
            ])
        );
        assert_eq!(settings.cors.methods, AllowList::Only(vec![Method::GET, Method::POST]));
        assert_eq!(
            settings.cors.headers,
            AllowList::Only(vec![
                HeaderName::from_static("authorization"),
                HeaderName::from_static("content-type"),
            ])
        );
    }

    #[test]
    fn wildcard_wins_over_entries() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = ("API_ALLOW_ORIGINS", "https://a.example.com,*");

        let settings = load(&vars).expect("valid settings");
        assert_eq!(settings.cors.origins, AllowList::Any);
    }

    #[test]
    fn credentials_flag_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("API_ALLOW_CREDENTIALS", "TRUE"));

        let settings = load(&vars).expect("valid settings");
        assert!(settings.cors.allow_credentials);
    }

    #[test]
    fn invalid_credentials_flag_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("API_ALLOW_CREDENTIALS", "sometimes"));

        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "API_ALLOW_CREDENTIALS", .. })
        ));
    }

    #[test]
    fn invalid_port_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("API_PORT", "eighty"));

        assert!(matches!(load(&vars), Err(ConfigError::Invalid { key: "API_PORT", .. })));
    }

    #[test]
    fn invalid_header_name_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("API_ALLOW_HEADERS", "bad header"));

        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { key: "API_ALLOW_HEADERS", .. })
        ));
    }

    #[test]
    fn custom_port_and_database() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("API_PORT", "9100"));
        vars.push(("DATABASE_URL", "postgres://localhost/daycare"));

        let settings = load(&vars).expect("valid settings");
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/daycare"));
    }
}
