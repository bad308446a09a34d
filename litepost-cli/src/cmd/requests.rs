use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::open_store;

#[derive(Serialize)]
struct RequestSummary {
    id: String,
    name: String,
    method: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment_id: Option<String>,
    tests: usize,
}

pub async fn requests_cmd(output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(&store, &output, true).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let requests = match store.list_requests().await {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to list requests: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let summaries: Vec<RequestSummary> = requests
        .into_iter()
        .map(|r| RequestSummary {
            id: r.id,
            name: r.name,
            method: r.method,
            url: r.url,
            environment_id: r.environment_id,
            tests: r.tests.len(),
        })
        .collect();

    if output.format == OutputFormat::Text && !output.quiet {
        if summaries.is_empty() {
            println!("no stored requests");
        }
        for s in &summaries {
            println!("{}  {:<7} {}  {}", s.id, s.method, s.name, s.url);
        }
    } else {
        print_result(output.format, output.quiet, &summaries);
    }
    exit_codes::SUCCESS
}
