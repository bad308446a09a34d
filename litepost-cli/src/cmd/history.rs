use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::open_store;

#[derive(Serialize)]
struct HistoryEntry {
    id: String,
    status_code: u16,
    duration_ms: u64,
    size: u64,
    created_at: String,
}

pub async fn history_cmd(
    request_id: &str,
    limit: usize,
    output: OutputArgs,
    store: StoreArgs,
) -> i32 {
    let Some(store) = open_store(&store, &output, true).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let responses = match store.responses_for_request(request_id).await {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to load history: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let entries: Vec<HistoryEntry> = responses
        .into_iter()
        .take(limit)
        .map(|r| HistoryEntry {
            id: r.id,
            status_code: r.status_code,
            duration_ms: r.duration.as_millis() as u64,
            size: r.size,
            created_at: r.created_at.to_rfc3339(),
        })
        .collect();

    if output.format == OutputFormat::Text && !output.quiet {
        if entries.is_empty() {
            println!("no responses recorded for {request_id}");
        }
        for e in &entries {
            println!(
                "{}  {}  {} ms  {} bytes  {}",
                e.created_at, e.status_code, e.duration_ms, e.size, e.id
            );
        }
    } else {
        print_result(output.format, output.quiet, &entries);
    }
    exit_codes::SUCCESS
}
