use std::path::Path;

use litepost_core::{Environment, EnvironmentRegistry};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::{get_database_url, load_document, open_store};

#[derive(Serialize)]
struct EnvironmentSummary {
    id: String,
    name: String,
    variables: Vec<String>,
}

/// Built-in environments, overlaid with stored ones when a database is configured.
pub async fn list_cmd(output: OutputArgs, store: StoreArgs) -> i32 {
    let registry = EnvironmentRegistry::new();
    if get_database_url(&store).is_some() {
        let Some(store) = open_store(&store, &output, true).await else {
            return exit_codes::RUNTIME_ERROR;
        };
        match store.list_environments().await {
            Ok(envs) => registry.extend(envs),
            Err(e) => {
                print_error(
                    output.format,
                    output.quiet,
                    &format!("failed to list environments: {e}"),
                );
                return exit_codes::RUNTIME_ERROR;
            }
        }
    }

    let summaries: Vec<EnvironmentSummary> = registry
        .list()
        .iter()
        .map(|env| EnvironmentSummary {
            id: env.id.clone(),
            name: env.name.clone(),
            variables: env.variables.keys().cloned().collect(),
        })
        .collect();

    if output.format == OutputFormat::Text && !output.quiet {
        for s in &summaries {
            println!("{:<14} {:<16} {}", s.id, s.name, s.variables.join(", "));
        }
    } else {
        print_result(output.format, output.quiet, &summaries);
    }
    exit_codes::SUCCESS
}

pub async fn save_cmd(file: &Path, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(environment) = load_document::<Environment>(file, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };
    let Some(store) = open_store(&store, &output, true).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.save_environment(environment).await {
        Ok(saved) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("{}", saved.id);
            } else {
                print_result(output.format, output.quiet, &saved);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to save environment: {e}"),
            );
            exit_codes::RUNTIME_ERROR
        }
    }
}
