use crate::exit_codes;
use crate::{HttpArgs, OutputArgs, StoreArgs};

use super::config::{build_executor, open_store};
use super::report::{print_reports, ExecutionReport};

pub async fn send_cmd(
    request_id: &str,
    env: Option<&str>,
    output: OutputArgs,
    store: StoreArgs,
    http: HttpArgs,
) -> i32 {
    let Some(store) = open_store(&store, &output, true).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    let Some(executor) = build_executor(&http, store.clone(), &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };

    let report = match store.get_request(request_id).await {
        Ok(Some(mut request)) => {
            if let Some(id) = env {
                request.environment_id = Some(id.to_string());
            }
            let result = executor.execute_request(&request).await;
            ExecutionReport::new(request_id, &request, result)
        }
        Ok(None) => {
            ExecutionReport::load_failed(request_id, format!("request not found: {request_id}"))
        }
        Err(e) => ExecutionReport::load_failed(request_id, format!("store error: {e}")),
    };
    print_reports(&[report], &output)
}
