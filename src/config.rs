use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

const DEFAULT_TTL_MINUTES: i64 = 30;
/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: lookup("SECRET_KEY").context("SECRET_KEY is not set")?,
            ttl_minutes: lookup("ACCESS_TOKEN_EXPIRE_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|m| *m > 0)
                .map(|m| m.min(MAX_TTL_MINUTES))
                .unwrap_or(DEFAULT_TTL_MINUTES),
        };
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("APP_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/fintrack"),
            ("SECRET_KEY", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 30);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn reads_token_lifetime() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/fintrack"),
            ("SECRET_KEY", "s3cret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "90"),
            ("APP_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 90);
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn token_lifetime_is_clamped() {
        let lifetime = |raw: &str| {
            AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/fintrack"),
                ("SECRET_KEY", "s3cret"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", raw),
            ]))
            .unwrap()
            .jwt
            .ttl_minutes
        };
        assert_eq!(lifetime("9223372036854775807"), MAX_TTL_MINUTES);
        assert_eq!(lifetime("0"), DEFAULT_TTL_MINUTES);
        assert_eq!(lifetime("-5"), DEFAULT_TTL_MINUTES);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/fintrack",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }
}
