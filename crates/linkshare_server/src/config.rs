//! Configuration for the LinkShare HTTP server.

use clap::Parser;
use linkshare_core::{default_log_level, StorageResult, StorageTarget};

/// CLI arguments for the server; every flag can also come from the
/// environment.
#[derive(Debug, Parser)]
#[command(name = "linkshare")]
#[command(about = "LinkShare link submission server")]
pub struct CliArgs {
    /// Interface to bind.
    #[arg(long, env = "LINKSHARE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP server port.
    #[arg(long, env = "LINKSHARE_PORT", default_value = "6969")]
    pub port: u16,

    /// Record store connection string (`sqlite:///<path>`, `sqlite://`,
    /// or `postgresql://...`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:///local_database.db")]
    pub database_url: String,

    /// Log level: trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "LINKSHARE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset.
    #[arg(long, env = "LINKSHARE_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl CliArgs {
    /// Resolves the storage backend from the database URL.
    pub fn storage_target(&self) -> StorageResult<StorageTarget> {
        StorageTarget::parse(&self.database_url)
    }

    /// Effective log level.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

/// Configuration for the HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6969,
        }
    }
}

impl From<&CliArgs> for ServerConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
        }
    }
}
