use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
    /// Insert the example rows on startup when the table is empty.
    pub seed_examples: bool,
}

/// Connection and pool settings for PostgreSQL.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
    pub connect_retries: usize,
    pub retry_delay: Duration,
    /// Abort startup when the connectivity probe is exhausted.
    pub required: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            db: DbConfig::from_env()?,
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 3000)?,
            seed_examples: parse_var("SEED_EXAMPLES", false)?,
        })
    }
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            user: var_or("DB_USER", "fridge_user"),
            password: var_or("DB_PASSWORD", "1234"),
            host: var_or("DB_HOST", "localhost"),
            port: parse_var("DB_PORT", 5432)?,
            name: var_or("DB_NAME", "fridge_db"),
            max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
            idle_timeout: Duration::from_millis(parse_var("DB_IDLE_TIMEOUT_MS", 30_000)?),
            connect_timeout: Duration::from_millis(parse_var("DB_CONNECT_TIMEOUT_MS", 2_000)?),
            connect_retries: parse_var("DB_CONNECT_RETRIES", 5)?,
            retry_delay: Duration::from_millis(parse_var("DB_RETRY_DELAY_MS", 5_000)?),
            required: parse_var("DB_REQUIRED", false)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid {}", key, std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so they can run in parallel.

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let port: u16 = parse_var("FRIDGE_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn parse_var_reads_and_trims_value() {
        std::env::set_var("FRIDGE_TEST_RETRIES", " 7 ");
        let retries: usize = parse_var("FRIDGE_TEST_RETRIES", 5).unwrap();
        assert_eq!(retries, 7);
    }

    #[test]
    fn parse_var_rejects_garbage() {
        std::env::set_var("FRIDGE_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("FRIDGE_TEST_BAD_PORT", 3000).unwrap_err();
        assert!(err.to_string().contains("FRIDGE_TEST_BAD_PORT"));
    }

    #[test]
    fn parse_var_reads_booleans() {
        std::env::set_var("FRIDGE_TEST_FLAG", "true");
        assert!(parse_var("FRIDGE_TEST_FLAG", false).unwrap());
    }

    #[test]
    fn var_or_uses_default() {
        assert_eq!(var_or("FRIDGE_TEST_UNSET_HOST", "localhost"), "localhost");
    }
}
