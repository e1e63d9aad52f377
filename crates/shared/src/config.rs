//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger read-side conventions.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Posting outbox worker configuration.
    #[serde(default)]
    pub outbox: OutboxConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Naming conventions used by ledger views and dashboard rollups.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Case-insensitive name fragments identifying cash and bank accounts.
    #[serde(default = "default_cash_account_patterns")]
    pub cash_account_patterns: Vec<String>,
    /// Counter-account label for party ledger rows spanning several accounts.
    #[serde(default = "default_multi_account_label")]
    pub multi_account_label: String,
}

fn default_cash_account_patterns() -> Vec<String> {
    vec!["cash".to_string(), "bank".to_string()]
}

fn default_multi_account_label() -> String {
    "Multiple Accounts".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cash_account_patterns: default_cash_account_patterns(),
            multi_account_label: default_multi_account_label(),
        }
    }
}

/// Posting outbox configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    /// Messages claimed per dispatch round.
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Attempts before a message is dead-lettered.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, doubled on each further attempt.
    #[serde(default = "default_base_backoff_secs")]
    pub base_backoff_secs: u64,
    /// Upper bound for the retry delay.
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    /// Worker polling interval.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_batch_size() -> u64 {
    50
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_backoff_secs() -> u64 {
    30
}

fn default_max_backoff_secs() -> u64 {
    3600 // 1 hour
}

fn default_poll_interval_secs() -> u64 {
    10
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            base_backoff_secs: default_base_backoff_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LOOM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LOOM__DATABASE__URL", Some("postgres://loom@localhost/loom_test")),
                ("LOOM__DATABASE__MAX_CONNECTIONS", Some("4")),
                ("LOOM__OUTBOX__MAX_ATTEMPTS", Some("7")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://loom@localhost/loom_test");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.outbox.max_attempts, 7);
                assert_eq!(config.outbox.batch_size, 50);
                assert_eq!(config.ledger.multi_account_label, "Multiple Accounts");
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars_unset(["LOOM__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_ledger_defaults() {
        let ledger = LedgerConfig::default();
        assert_eq!(ledger.cash_account_patterns, vec!["cash", "bank"]);
    }
}
