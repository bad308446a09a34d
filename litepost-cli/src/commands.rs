use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute request files (JSON or YAML) concurrently.
    Run {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Environment id used for `{{variable}}` substitution.
        #[arg(long)]
        env: Option<String>,
        /// Environment file to register before running.
        #[arg(long)]
        env_file: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        http: HttpArgs,
    },
    /// Execute a stored request by id.
    Send {
        request_id: String,
        #[arg(long)]
        env: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        http: HttpArgs,
    },
    /// List stored requests.
    Requests {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show stored responses of a request, newest first.
    History {
        request_id: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },
    /// Store a request file and print its id.
    Save {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Apply database migrations.
    Migrate {
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// List built-in and stored environments.
    List {
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Store an environment file.
    Save {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}
