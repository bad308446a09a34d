use std::path::Path;

use litepost_core::Request;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, StoreArgs};

use super::config::{load_document, open_store};

pub async fn save_cmd(file: &Path, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(request) = load_document::<Request>(file, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };
    let Some(store) = open_store(&store, &output, true).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.save_request(request).await {
        Ok(saved) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("{}", saved.id);
            } else {
                print_result(output.format, output.quiet, &saved);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to save request: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}
