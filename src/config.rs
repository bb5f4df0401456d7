use std::env;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings of the HTTP mail service used for account emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub base_uri: String,
    pub request_uri: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means in-memory storage.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub token_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Absent means account emails are only logged.
    pub mail: Option<MailSettings>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mail = match (
            var("MAIL_BASE_URI"),
            var("MAIL_REQUEST_URI"),
            var("MAIL_API_KEY"),
            var("MAIL_FROM"),
        ) {
            (Some(base_uri), Some(request_uri), Some(api_key), Some(from)) => Some(MailSettings {
                base_uri,
                request_uri,
                api_key,
                from,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            server_port: parse(&var, "SERVER_PORT", 8080)?,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            token_secret: var("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?,
            token_ttl_hours: token_ttl_hours(&var)?,
            bcrypt_cost: parse(&var, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            mail,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Longest lifetime of a confirmation or reset token: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

fn token_ttl_hours<F>(var: &F) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let hours = parse(var, "TOKEN_TTL_HOURS", 24)?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid {
            name: "TOKEN_TTL_HOURS",
            reason: format!("must be between 1 and {} hours", MAX_TOKEN_TTL_HOURS),
        });
    }
    Ok(hours)
}

fn parse<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("TOKEN_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.mail, None);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_custom_values() {
        let config = config_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("MAIL_BASE_URI", "https://mail.example"),
            ("MAIL_REQUEST_URI", "v3/example/messages"),
            ("MAIL_API_KEY", "api:key"),
            ("MAIL_FROM", "Todoflow <no-reply@example.com>"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://test"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.mail.unwrap().request_uri, "v3/example/messages");
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let err = config_from(&[]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TOKEN_SECRET"));
        assert_eq!(err.to_string(), "TOKEN_SECRET must be set");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("TOKEN_SECRET", "s3cret"), ("SERVER_PORT", "eighty")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_token_ttl_must_be_in_range() {
        for ttl in ["0", "-5", "10000000000", "8761"] {
            let err = config_from(&[("TOKEN_SECRET", "s3cret"), ("TOKEN_TTL_HOURS", ttl)])
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "TOKEN_TTL_HOURS", .. }),
                "{} should be rejected",
                ttl
            );
        }

        let config = config_from(&[("TOKEN_SECRET", "s3cret"), ("TOKEN_TTL_HOURS", "8760")])
            .unwrap();
        assert_eq!(config.token_ttl_hours, MAX_TOKEN_TTL_HOURS);
    }

    #[test]
    fn test_partial_mail_settings_fall_back_to_logging() {
        let config = config_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("MAIL_BASE_URI", "https://mail.example"),
        ])
        .unwrap();
        assert_eq!(config.mail, None);
    }
}
