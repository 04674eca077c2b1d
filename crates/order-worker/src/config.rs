//! Worker configuration, read from `ORDER_WORKER_*` environment variables.

use crate::clients::BackoffPolicy;
use crate::pipeline::PipelineSettings;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use config::ConfigError;

/// Which key-value backend holds locks, ledger records and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process actor. State is lost on exit and not shared between replicas.
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkerConfig {
    #[serde(default = "default_customer_base_url")]
    pub customer_base_url: String,

    #[serde(default = "default_product_base_url")]
    pub product_base_url: String,

    /// Retries after the first call to a customer or product service
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default = "default_retry_initial_interval_ms")]
    pub retry_initial_interval_ms: u64,

    /// Growth factor between retry delays, at least 1.0
    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,

    /// Randomized fraction of each retry delay, within [0, 1]
    #[serde(default = "default_retry_jitter")]
    pub retry_jitter: f64,

    /// Per-request HTTP timeout
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    /// Retry count at which a failing order is abandoned
    #[serde(default = "default_retry_ceiling")]
    pub retry_ceiling: u32,

    #[serde(default)]
    pub store_backend: StoreBackend,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Deliveries processed concurrently by the consumer
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default)]
    pub clear_ledger_on_success: bool,
}

fn default_customer_base_url() -> String {
    "http://localhost:8080/customers".to_string()
}

fn default_product_base_url() -> String {
    "http://localhost:8080/products".to_string()
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_initial_interval_ms() -> u64 {
    500
}

fn default_retry_multiplier() -> f64 {
    2.0
}

fn default_retry_jitter() -> f64 {
    BackoffPolicy::DEFAULT_JITTER
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_lock_ttl_secs() -> u64 {
    60
}

fn default_retry_ceiling() -> u32 {
    3
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_max_in_flight() -> usize {
    16
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            customer_base_url: default_customer_base_url(),
            product_base_url: default_product_base_url(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_initial_interval_ms: default_retry_initial_interval_ms(),
            retry_multiplier: default_retry_multiplier(),
            retry_jitter: default_retry_jitter(),
            http_timeout_ms: default_http_timeout_ms(),
            lock_ttl_secs: default_lock_ttl_secs(),
            retry_ceiling: default_retry_ceiling(),
            store_backend: StoreBackend::default(),
            redis_url: default_redis_url(),
            max_in_flight: default_max_in_flight(),
            clear_ledger_on_success: false,
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(Environment::with_prefix("ORDER_WORKER"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects retry settings that would make backoff delays shrink, go negative or
    /// overflow to an endless sleep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.retry_multiplier.is_finite() || self.retry_multiplier < 1.0 {
            return Err(ConfigError::Message(format!(
                "retry_multiplier must be a finite number >= 1.0, got {}",
                self.retry_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.retry_jitter) {
            return Err(ConfigError::Message(format!(
                "retry_jitter must be within [0, 1], got {}",
                self.retry_jitter
            )));
        }
        Ok(())
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.retry_max_attempts,
            initial_interval: Duration::from_millis(self.retry_initial_interval_ms),
            multiplier: self.retry_multiplier,
            jitter: self.retry_jitter,
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            lock_ttl: Duration::from_secs(self.lock_ttl_secs),
            retry_ceiling: self.retry_ceiling,
            clear_ledger_on_success: self.clear_ledger_on_success,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
