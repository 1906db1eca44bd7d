//! Reqwest client for an HTTP SQL execution API (Redshift Data API style).
//!
//! `POST {base}/execute-statement` queues one statement and answers with its
//! execution id. Rejections come back as non-2xx responses whose JSON body
//! carries a `message` (or `Message`) field.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExecutionHandle, StatementExecutor, SubmitError, TargetContext};
use crate::config::{Config, API_TOKEN, DATA_API_URL};

#[derive(Debug)]
pub struct DataApiClient {
    client: Client,
    base: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteStatementRequest<'a> {
    sql: &'a str,
    workgroup_name: &'a str,
    database: &'a str,
    secret_arn: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteStatementResponse {
    #[serde(rename = "Id")]
    id: String,
}

impl DataApiClient {
    pub fn new(base: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base: base.into(), token })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.require(DATA_API_URL)?, cfg.get(API_TOKEN), cfg.request_timeout()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/execute-statement", self.base.trim_end_matches('/'))
    }
}

#[async_trait]
impl StatementExecutor for DataApiClient {
    async fn submit(
        &self,
        sql: &str,
        target: &TargetContext,
    ) -> Result<ExecutionHandle, SubmitError> {
        let body = ExecuteStatementRequest {
            sql,
            workgroup_name: &target.workgroup_name,
            database: &target.database_name,
            secret_arn: &target.secret_arn,
        };

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %text, "execute-statement rejected");
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let text = resp.text().await?;
        let parsed: ExecuteStatementResponse =
            serde_json::from_str(&text).map_err(|e| SubmitError::Decode(format!("{}: {}", e, text)))?;
        Ok(ExecutionHandle::new(parsed.id))
    }
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw text when it is not JSON or has no message field.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["message", "Message"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_owned))
    });
    match from_json {
        Some(msg) => msg,
        None if body.trim().is_empty() => "<empty body>".to_string(),
        None => body.trim().to_string(),
    }
}
