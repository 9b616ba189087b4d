//! Runtime configuration.
//!
//! Values are merged, later sources winning, from:
//! 1. built-in defaults ([`Config::default`])
//! 2. a YAML file (`student-records.yaml`, or the path given with `--config`)
//! 3. environment variables prefixed `STUDENT_RECORDS_` (e.g. `STUDENT_RECORDS_PAGE_SIZE=20`)
//!
//! ```no_run
//! use clap::Parser;
//! use student_records::config::{Args, Config};
//!
//! let args = Args::parse();
//! let config = Config::load(&args).expect("invalid configuration");
//! println!("{:?}", config.data_file);
//! ```

use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments of the demo binary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "STUDENT_RECORDS_CONFIG", default_value = "student-records.yaml")]
    pub config: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON snapshot file backing the student store. In-memory when unset.
    pub data_file: Option<PathBuf>,
    /// JSON snapshot file holding the registered users. Empty directory when unset.
    pub users_file: Option<PathBuf>,
    /// Capacity of every actor's request channel.
    pub channel_buffer: usize,
    /// Per-request deadline enforced by the transport.
    pub request_timeout_ms: u64,
    /// Rows per page in the list views.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            users_file: None,
            channel_buffer: 32,
            request_timeout_ms: 5000,
            page_size: 10,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        if config.channel_buffer == 0 {
            return Err(figment::Error::from("channel_buffer must be at least 1".to_string()));
        }
        if config.page_size == 0 {
            return Err(figment::Error::from("page_size must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("STUDENT_RECORDS_"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
