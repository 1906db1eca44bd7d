//! End-to-end runs of the run handler: config, script loading and batch execution.

use std::io::Write;

use mockito::{Matcher, Server};
use serde_json::json;
use sqlbatch::{
    config::{
        Config, ADMIN_SECRET_ARN, DATA_API_URL, OBJECT_STORE_URL, PREVIEW_LENGTH, REQUEST_TIMEOUT,
        S3_BUCKET_NAME, SQL_FILE_NAME, WORKGROUP_NAME,
    },
    handlers,
    response::RunResponse,
    source::ScriptInput,
};

fn config_for(server: &Server) -> Config {
    let url = server.url();
    let mut cfg = Config::from_pairs([
        (WORKGROUP_NAME, "analytics"),
        (ADMIN_SECRET_ARN, "arn:secret"),
        (S3_BUCKET_NAME, "sql-assets"),
        (SQL_FILE_NAME, "tables.sql"),
    ]);
    cfg.set(DATA_API_URL, url.clone());
    cfg.set(OBJECT_STORE_URL, url);
    cfg
}

#[tokio::test]
async fn local_file_runs_every_statement() {
    let mut server = Server::new_async().await;
    let created = server
        .mock("POST", "/execute-statement")
        .match_body(Matcher::PartialJson(json!({ "Sql": "CREATE TABLE a (x int)" })))
        .with_status(200)
        .with_body(json!({ "Id": "id-a" }).to_string())
        .create_async()
        .await;
    let exists = server
        .mock("POST", "/execute-statement")
        .match_body(Matcher::PartialJson(json!({ "Sql": "CREATE SCHEMA s" })))
        .with_status(400)
        .with_body(json!({ "message": "schema \"s\" already exists" }).to_string())
        .create_async()
        .await;
    let broken = server
        .mock("POST", "/execute-statement")
        .match_body(Matcher::PartialJson(json!({ "Sql": "CREAT TABLE b (x int)" })))
        .with_status(400)
        .with_body(json!({ "message": "syntax error at or near \"CREAT\"" }).to_string())
        .create_async()
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "-- bootstrap\nCREATE SCHEMA s;\nCREAT TABLE b (x int);\nCREATE TABLE a (x int)\n"
    )
    .unwrap();

    let mut cfg = config_for(&server);
    cfg.set(PREVIEW_LENGTH, "10");
    let outcome = handlers::run::run(&ScriptInput::File(file.path().to_path_buf()), &cfg)
        .await
        .unwrap();

    created.assert_async().await;
    exists.assert_async().await;
    broken.assert_async().await;

    assert_eq!(outcome.attempted(), 3);
    assert_eq!(outcome.executions[0].execution_id, "id-a");
    assert_eq!(outcome.executions[0].statement_preview, "CREATE TAB");
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors[0].skipped);
    assert!(!outcome.errors[1].skipped);
    assert!(outcome.errors[1].error_message.contains("syntax error"));
}

#[tokio::test]
async fn object_store_script_is_fetched_and_run() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sql-assets/redshift-sql/tables.sql")
        .with_status(200)
        .with_body("INSERT INTO t VALUES ('a;b');")
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/execute-statement")
        .match_body(Matcher::PartialJson(json!({ "Sql": "INSERT INTO t VALUES ('a;b')" })))
        .with_status(200)
        .with_body(json!({ "Id": "id-1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let outcome = handlers::run::run(&ScriptInput::ObjectStore, &config_for(&server))
        .await
        .unwrap();

    submit.assert_async().await;
    assert_eq!(outcome.executions.len(), 1);
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn fetch_failure_is_top_level() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sql-assets/redshift-sql/tables.sql")
        .with_status(403)
        .with_body("AccessDenied")
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/execute-statement")
        .expect(0)
        .create_async()
        .await;

    let err = handlers::run::run(&ScriptInput::ObjectStore, &config_for(&server))
        .await
        .unwrap_err();
    submit.assert_async().await;

    let response = serde_json::to_value(RunResponse::failed(&err)).unwrap();
    assert_eq!(response["statusCode"], 500);
    let message = response["body"]["message"].as_str().unwrap();
    assert!(message.starts_with("Error executing SQL: fetching script from s3://sql-assets/redshift-sql/tables.sql"), "{message}");
    assert!(message.contains("AccessDenied"), "{message}");
    assert!(response["body"].get("executions").is_none());
}

#[tokio::test]
async fn missing_target_fails_before_loading() {
    let server = Server::new_async().await;
    let mut cfg = config_for(&server);
    cfg.set(WORKGROUP_NAME, "");

    let err = handlers::run::run(&ScriptInput::ObjectStore, &cfg).await.unwrap_err();
    assert!(err.to_string().contains(WORKGROUP_NAME), "{err}");
}

#[tokio::test]
async fn zero_timeout_fails_before_any_submission() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", "/execute-statement")
        .with_status(200)
        .with_body(r#"{"Id":"never"}"#)
        .expect(0)
        .create_async()
        .await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "SELECT 1; SELECT 2;").unwrap();
    let mut cfg = config_for(&server);
    cfg.set(REQUEST_TIMEOUT, "0");

    let err = handlers::run::run(&ScriptInput::File(file.path().to_path_buf()), &cfg)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains(REQUEST_TIMEOUT), "{err:#}");
    assert_eq!(RunResponse::failed(&err).status_code, 500);
    submit.assert_async().await;
}

#[tokio::test]
async fn dry_run_only_splits() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "SELECT 1; SELECT 'x;y'; -- trailing;\n").unwrap();

    let statements = handlers::dry_run::run(&ScriptInput::File(file.path().to_path_buf()), &Config::default())
        .await
        .unwrap();
    assert_eq!(statements, vec!["SELECT 1", "SELECT 'x;y'"]);
}

#[tokio::test]
async fn unreadable_file_is_top_level() {
    let err = handlers::dry_run::run(&ScriptInput::File("/nonexistent/schema.sql".into()), &Config::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/schema.sql"), "{err}");
}
