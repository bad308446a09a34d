use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use litepost_core::{Environment, Request};

use crate::exit_codes;
use crate::{HttpArgs, OutputArgs, StoreArgs};

use super::config::{build_executor, load_document, open_store, read_document};
use super::report::{print_reports, ExecutionReport};

pub async fn run_cmd(
    files: &[PathBuf],
    env: Option<&str>,
    env_file: Option<&Path>,
    output: OutputArgs,
    store: StoreArgs,
    http: HttpArgs,
) -> i32 {
    let Some(store) = open_store(&store, &output, false).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let Some(executor) = build_executor(&http, store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };

    let mut env_id = env.map(String::from);
    if let Some(path) = env_file {
        let Some(environment) = load_document::<Environment>(path, &output) else {
            return exit_codes::RUNTIME_ERROR;
        };
        tracing::debug!(environment = %environment.id, "registered environment file");
        env_id.get_or_insert_with(|| environment.id.clone());
        executor.environments().set(environment);
    }

    let mut reports: Vec<Option<ExecutionReport>> = Vec::with_capacity(files.len());
    let mut loaded: Vec<(usize, String, Request)> = Vec::new();
    for (idx, path) in files.iter().enumerate() {
        let source = path.display().to_string();
        match read_document::<Request>(path) {
            Ok(mut request) => {
                if let Some(id) = &env_id {
                    request.environment_id = Some(id.clone());
                }
                loaded.push((idx, source, request));
                reports.push(None);
            }
            Err(e) => reports.push(Some(ExecutionReport::load_failed(source, e))),
        }
    }

    let results = join_all(
        loaded
            .iter()
            .map(|(_, _, request)| executor.execute_request(request)),
    )
    .await;

    for ((idx, source, request), result) in loaded.iter().zip(results) {
        reports[*idx] = Some(ExecutionReport::new(source.clone(), request, result));
    }
    let reports: Vec<ExecutionReport> = reports.into_iter().flatten().collect();
    print_reports(&reports, &output)
}
