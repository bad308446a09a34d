use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// SQLite database URL, e.g. `sqlite://litepost.db`.
    #[arg(long, env = "LITEPOST_DATABASE_URL")]
    pub store: Option<String>,
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

#[derive(Debug, Args, Clone)]
pub struct HttpArgs {
    /// Per-attempt timeout in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub timeout: u64,
    /// Retries after the first attempt for transport errors, and for
    /// 429/502/503/504 on idempotent methods.
    #[arg(long, default_value_t = 3)]
    pub retries: usize,
    /// Base backoff delay in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub retry_delay: u64,
    /// Also retry 429/502/503/504 for POST and PATCH.
    #[arg(long)]
    pub retry_non_idempotent: bool,
    #[arg(long)]
    pub no_follow_redirects: bool,
    #[arg(long, default_value_t = 32)]
    pub max_concurrency: usize,
}
