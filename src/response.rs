//! Status-code envelope returned for every run.

use serde::Serialize;

use crate::batch::BatchOutcome;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseBody {
    pub message: String,
    #[serde(flatten)]
    pub outcome: Option<BatchOutcome>,
}

impl RunResponse {
    pub fn completed(outcome: BatchOutcome) -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResponseBody {
                message: "SQL execution completed".to_string(),
                outcome: Some(outcome),
            },
        }
    }

    /// A failure outside per-statement handling. No partial outcome is kept.
    pub fn failed(err: &anyhow::Error) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: ResponseBody {
                message: format!("Error executing SQL: {:#}", err),
                outcome: None,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_flattens_outcome_into_body() {
        let value = serde_json::to_value(RunResponse::completed(BatchOutcome::default())).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": 200,
                "body": { "message": "SQL execution completed", "executions": [], "errors": [] }
            })
        );
    }

    #[test]
    fn failed_carries_only_the_message() {
        let err = anyhow::anyhow!("bucket not found").context("fetching script");
        let resp = RunResponse::failed(&err);
        assert!(!resp.is_success());
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": 500,
                "body": { "message": "Error executing SQL: fetching script: bucket not found" }
            })
        );
    }
}
