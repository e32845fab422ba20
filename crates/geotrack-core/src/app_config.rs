use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// SQLite file produced by the ingestion run; opened read-only.
    pub db_path: PathBuf,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_acquire_timeout_secs: u64,
    pub competitor_limit: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("db_path", &self.db_path)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("competitor_limit", &self.competitor_limit)
            .finish()
    }
}
