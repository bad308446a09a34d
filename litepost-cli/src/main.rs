use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;

pub use args::*;
use commands::{Command, EnvCommand};

#[derive(Debug, Parser)]
#[command(name = "litepost", version, about = "Run and test HTTP API requests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    // A missing .env is fine; anything else is worth a warning once logging is up.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Run {
            files,
            env,
            env_file,
            output,
            store,
            http,
        } => cmd::run::run_cmd(&files, env.as_deref(), env_file.as_deref(), output, store, http).await,
        Command::Send {
            request_id,
            env,
            output,
            store,
            http,
        } => cmd::send::send_cmd(&request_id, env.as_deref(), output, store, http).await,
        Command::Requests { output, store } => cmd::requests::requests_cmd(output, store).await,
        Command::History {
            request_id,
            limit,
            output,
            store,
        } => cmd::history::history_cmd(&request_id, limit, output, store).await,
        Command::Env { command } => match command {
            EnvCommand::List { output, store } => cmd::env::list_cmd(output, store).await,
            EnvCommand::Save {
                file,
                output,
                store,
            } => cmd::env::save_cmd(&file, output, store).await,
        },
        Command::Save {
            file,
            output,
            store,
        } => cmd::save::save_cmd(&file, output, store).await,
        Command::Migrate { store, output } => cmd::migrate::migrate_cmd(store, output).await,
    }
}
