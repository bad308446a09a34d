use litepost_store::{run_migrations, SqliteStore};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::get_database_url;

#[derive(Serialize)]
struct MigrateResult {
    success: bool,
    message: String,
}

pub async fn migrate_cmd(store: StoreArgs, output: OutputArgs) -> i32 {
    let Some(database_url) = get_database_url(&store) else {
        print_error(
            output.format,
            output.quiet,
            "missing database url (use --store or set LITEPOST_DATABASE_URL / DATABASE_URL)",
        );
        return exit_codes::RUNTIME_ERROR;
    };

    let sqlite = match SqliteStore::connect(&database_url, store.max_connections).await {
        Ok(s) => s,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to open {database_url}: {e}"),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    match run_migrations(sqlite.pool()).await {
        Ok(()) => {
            let result = MigrateResult {
                success: true,
                message: "migrations applied".to_string(),
            };
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: migrations applied");
            } else {
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("migration failed: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}
