use super::SurrealClient;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_POOL_IDLE_SECS: u64 = 30;
const DEFAULT_POOL_MAX_IDLE: usize = 16;

/// Configures the HTTP transport behind a [`SurrealClient`].
pub struct SurrealClientBuilder {
    timeout_ms: Option<u64>,
    pool_max_idle: Option<usize>,
}

impl SurrealClientBuilder {
    pub fn new() -> Self {
        Self {
            timeout_ms: None,
            pool_max_idle: None,
        }
    }

    /// Overall per-request timeout, applied to every rpc exchange.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub fn pool_max_idle(mut self, size: usize) -> Self {
        self.pool_max_idle = Some(size);
        self
    }

    pub fn build(self) -> SurrealClient {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(
                self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            ))
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_SECS))
            .pool_max_idle_per_host(self.pool_max_idle.unwrap_or(DEFAULT_POOL_MAX_IDLE))
            .build()
            .unwrap();

        SurrealClient::with_http(http)
    }
}

impl Default for SurrealClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
