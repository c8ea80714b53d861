use crate::config::ShellConfig;
use crate::jobs::DEFAULT_CAPACITY;
use clap::Parser;
use std::path::PathBuf;

/// smallsh - a small shell with background jobs
#[derive(Parser, Debug)]
#[command(name = "smallsh", version, about)]
pub struct ShellArgs {
    /// Execute a single command line and exit
    #[arg(short = 'c')]
    pub command: Option<String>,

    /// Maximum number of background jobs tracked at once
    #[arg(long, env = "SMALLSH_MAX_JOBS", default_value_t = DEFAULT_CAPACITY)]
    pub max_jobs: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Script file to read command lines from
    pub script: Option<PathBuf>,
}

impl ShellArgs {
    pub fn config(&self) -> ShellConfig {
        ShellConfig::default().with_max_background_jobs(self.max_jobs)
    }
}
