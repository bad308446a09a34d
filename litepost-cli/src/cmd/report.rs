use litepost_core::Request;
use litepost_exec::{Execution, ExecutionError, Stage, TestOutcome};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

/// Outcome of one execution as shown to the user.
#[derive(Debug, Serialize)]
pub struct ExecutionReport {
    pub source: String,
    pub request_id: String,
    pub name: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub tests: Vec<TestOutcome>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
}

impl ExecutionReport {
    fn blank(source: String, request: &Request) -> Self {
        Self {
            source,
            request_id: request.id.clone(),
            name: request.name.clone(),
            method: request.method.to_ascii_uppercase(),
            response_id: None,
            status_code: None,
            duration_ms: None,
            size: None,
            attempts: 0,
            body: None,
            tests: Vec::new(),
            warnings: Vec::new(),
            error: None,
            failed_stage: None,
        }
    }

    pub fn new(
        source: impl Into<String>,
        request: &Request,
        result: Result<Execution, ExecutionError>,
    ) -> Self {
        let mut report = Self::blank(source.into(), request);
        match result {
            Ok(exec) => {
                report.response_id = Some(exec.response.id.clone());
                report.status_code = Some(exec.response.status_code);
                report.duration_ms = Some(exec.response.duration.as_millis() as u64);
                report.size = Some(exec.response.size);
                report.attempts = exec.attempts;
                report.warnings = exec.warnings.iter().map(ToString::to_string).collect();
                report.tests = exec.tests;
                report.body = Some(exec.response.body);
            }
            Err(e) => {
                if let ExecutionError::Network { attempts, .. } = &e {
                    report.attempts = *attempts;
                }
                report.failed_stage = Some(e.stage());
                report.error = Some(e.to_string());
            }
        }
        report
    }

    /// Report for a file that could not be read or parsed.
    pub fn load_failed(source: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::blank(source.into(), &Request::new(""));
        report.request_id.clear();
        report.method.clear();
        report.failed_stage = Some(Stage::Load);
        report.error = Some(message.into());
        report
    }

    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() {
            exit_codes::RUNTIME_ERROR
        } else if self.tests.iter().any(|t| !t.result.passed) {
            exit_codes::TESTS_FAILED
        } else {
            exit_codes::SUCCESS
        }
    }
}

/// Print every report and return the combined exit code: any runtime error
/// wins over failed tests.
pub fn print_reports(reports: &[ExecutionReport], output: &OutputArgs) -> i32 {
    if output.format == OutputFormat::Text && !output.quiet {
        for report in reports {
            print_text(report, output);
        }
    } else if output.format == OutputFormat::Json {
        match reports {
            [single] => print_result(output.format, output.quiet, single),
            _ => print_result(output.format, output.quiet, &reports),
        }
    }
    reports
        .iter()
        .map(ExecutionReport::exit_code)
        .max()
        .unwrap_or(exit_codes::SUCCESS)
}

fn print_text(report: &ExecutionReport, output: &OutputArgs) {
    let label = if report.name.is_empty() {
        report.source.as_str()
    } else {
        report.name.as_str()
    };
    if let Some(err) = &report.error {
        let stage = report
            .failed_stage
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        print_error(output.format, output.quiet, &format!("{label}{stage}: {err}"));
        return;
    }
    println!(
        "{} {} -> {} ({} ms, {} bytes, {} attempt(s))",
        report.method,
        label,
        report.status_code.unwrap_or_default(),
        report.duration_ms.unwrap_or_default(),
        report.size.unwrap_or_default(),
        report.attempts,
    );
    for test in &report.tests {
        let mark = if test.result.passed { "PASS" } else { "FAIL" };
        println!("  {mark} {}: {}", test.name, test.result.message);
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}
