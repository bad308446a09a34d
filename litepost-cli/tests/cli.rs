use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn litepost(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("litepost").unwrap();
    cmd.current_dir(dir)
        .env_remove("LITEPOST_DATABASE_URL")
        .env_remove("DATABASE_URL")
        .env("RUST_LOG", "off");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let p = dir.join(name);
    fs::write(&p, contents).unwrap();
    p.to_string_lossy().into_owned()
}

async fn health_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"up"}"#))
        .mount(&server)
        .await;
    server
}

fn env_file(dir: &Path, base_url: &str) -> String {
    write(
        dir,
        "ci.json",
        &format!(r#"{{"id":"ci","name":"CI","variables":{{"base_url":"{base_url}"}}}}"#),
    )
}

#[test]
fn env_list_shows_builtins() {
    let tmp = TempDir::new().unwrap();
    let assert = litepost(tmp.path())
        .args(["env", "list", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let envs: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = envs
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["id"].as_str())
        .collect();
    assert!(ids.contains(&"default"));
    assert!(ids.contains(&"development"));
    assert!(ids.contains(&"production"));
}

#[test]
fn run_missing_file_is_runtime_error() {
    let tmp = TempDir::new().unwrap();
    litepost(tmp.path())
        .args(["run", "does-not-exist.json"])
        .assert()
        .code(4);
}

#[test]
fn failing_pre_script_is_runtime_error() {
    let tmp = TempDir::new().unwrap();
    let req = write(
        tmp.path(),
        "req.yaml",
        "name: broken\nurl: http://127.0.0.1:9/never\npre_script: 'throw \"boom\";'\n",
    );
    let assert = litepost(tmp.path()).args(["run", &req]).assert().code(4);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("pre-script failed"), "stderr: {stderr}");
}

#[test]
fn migrate_without_database_fails() {
    let tmp = TempDir::new().unwrap();
    litepost(tmp.path()).args(["migrate"]).assert().code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn run_with_env_file_and_passing_tests() {
    let server = health_server().await;
    let tmp = TempDir::new().unwrap();
    let env = env_file(tmp.path(), &server.uri());
    let req = write(
        tmp.path(),
        "health.json",
        r#"{
            "name": "health",
            "url": "{{base_url}}/health",
            "tests": [
                {"name": "is up", "script": "pm.expect(response.json.status).to.equal(\"up\")"},
                {"name": "ok", "script": "response.statusCode == 200"}
            ]
        }"#,
    );

    let assert = litepost(tmp.path())
        .args(["run", &req, "--env-file", &env, "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["status_code"], 200);
    assert_eq!(report["tests"].as_array().unwrap().len(), 2);
    assert_eq!(report["tests"][0]["passed"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_test_exits_with_three() {
    let server = health_server().await;
    let tmp = TempDir::new().unwrap();
    let env = env_file(tmp.path(), &server.uri());
    let req = write(
        tmp.path(),
        "health.yaml",
        "name: health\nurl: '{{base_url}}/health'\ntests:\n  - name: created\n    script: response.statusCode == 201\n",
    );

    let assert = litepost(tmp.path())
        .args(["run", &req, "--env-file", &env])
        .assert()
        .code(3);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("FAIL created"), "stdout: {stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn save_send_and_history_share_the_database() {
    let server = health_server().await;
    let tmp = TempDir::new().unwrap();
    let store = format!("sqlite://{}", tmp.path().join("litepost.db").display());

    let env = env_file(tmp.path(), &server.uri());
    litepost(tmp.path())
        .args(["env", "save", &env, "--store", &store])
        .assert()
        .success();

    let req = write(
        tmp.path(),
        "health.json",
        r#"{"name": "health", "url": "{{base_url}}/health", "environment_id": "ci"}"#,
    );
    let saved = litepost(tmp.path())
        .args(["save", &req, "--store", &store])
        .assert()
        .success();
    let request_id = String::from_utf8_lossy(&saved.get_output().stdout)
        .trim()
        .to_string();
    assert!(!request_id.is_empty());

    litepost(tmp.path())
        .args(["send", &request_id, "--store", &store])
        .assert()
        .success();

    let listed = litepost(tmp.path())
        .args(["requests", "--store", &store, "--format", "json"])
        .assert()
        .success();
    let requests: serde_json::Value =
        serde_json::from_slice(&listed.get_output().stdout).unwrap();
    assert_eq!(requests[0]["id"], request_id.as_str());

    let history = litepost(tmp.path())
        .args(["history", &request_id, "--store", &store, "--format", "json"])
        .assert()
        .success();
    let entries: serde_json::Value =
        serde_json::from_slice(&history.get_output().stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["status_code"], 200);
}
