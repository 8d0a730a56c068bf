//! Service configuration: CLI flags with environment fallback.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Online inference service
#[derive(Debug, Parser)]
#[command(name = "mlserve", version, about)]
pub struct Config {
    /// SQLite database path (created if missing)
    #[arg(long, env = "MLSERVE_DATABASE", default_value = "predictions.db")]
    pub database: PathBuf,

    /// Schema manifest artifact (expected columns and kinds)
    #[arg(long, env = "MLSERVE_COLUMNS", default_value = "columns.json")]
    pub columns: PathBuf,

    /// Trained model artifact
    #[arg(long, env = "MLSERVE_MODEL", default_value = "model.json")]
    pub model: PathBuf,

    /// Listen address
    #[arg(long, env = "MLSERVE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,
}
