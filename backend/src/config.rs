//! Configuration for the Cinder backend server.
//!
//! All configuration is loaded from environment variables.
//! No secrets exist server-side, so nothing here is sensitive to log.

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,

    /// Server port
    pub port: u16,

    /// Maximum stored message records (DoS protection).
    /// At ~1KB per record, 100k records stays under ~100MB of memory.
    pub max_records: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            max_records: std::env::var("MAX_RECORDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100_000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
