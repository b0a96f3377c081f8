use clap::Parser;
use sheetfix_convert::summary::DEFAULT_SUMMARY_COLUMN;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// 16 MiB
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// sheetfix-server - convert numbers stored as text in uploaded spreadsheets
#[derive(Parser, Debug, Clone)]
#[command(name = "sheetfix-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "SHEETFIX_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Directory for uploaded and processed files
    #[arg(long, env = "SHEETFIX_UPLOAD_DIR", default_value = "tmp")]
    pub upload_dir: PathBuf,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MAX_CONTENT_LENGTH", default_value_t = DEFAULT_MAX_CONTENT_LENGTH)]
    pub max_content_length: usize,

    /// Seconds between sweeps of the upload directory
    #[arg(long, env = "SHEETFIX_CLEANUP_INTERVAL_SECS", default_value_t = 600)]
    pub cleanup_interval_secs: u64,

    /// Files older than this many seconds are deleted by the sweep
    #[arg(long, env = "SHEETFIX_MAX_FILE_AGE_SECS", default_value_t = 1800)]
    pub max_file_age_secs: u64,

    /// 0-based index of the column summarized on the download page
    #[arg(long, env = "SHEETFIX_SUMMARY_COLUMN", default_value_t = DEFAULT_SUMMARY_COLUMN)]
    pub summary_column: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    #[must_use]
    pub fn max_file_age(&self) -> Duration {
        Duration::from_secs(self.max_file_age_secs)
    }
}
