//! Invocation event: the JSON document that names the target and the script.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{
    Config, ADMIN_SECRET_ARN, DATABASE_NAME, S3_BUCKET_NAME, S3_KEY_PREFIX, SQL_FILE_NAME,
    WORKGROUP_NAME,
};

/// Every field is optional; present fields override the loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEvent {
    pub workgroup_name: Option<String>,
    pub database_name: Option<String>,
    pub admin_secret_arn: Option<String>,
    pub s3_bucket_name: Option<String>,
    pub s3_key_prefix: Option<String>,
    pub sql_file_name: Option<String>,
}

impl RunEvent {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading event file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing event file: {}", path.display()))
    }

    pub fn apply(&self, cfg: &mut Config) {
        let fields = [
            (WORKGROUP_NAME, &self.workgroup_name),
            (DATABASE_NAME, &self.database_name),
            (ADMIN_SECRET_ARN, &self.admin_secret_arn),
            (S3_BUCKET_NAME, &self.s3_bucket_name),
            (S3_KEY_PREFIX, &self.s3_key_prefix),
            (SQL_FILE_NAME, &self.sql_file_name),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                cfg.set(key, v.clone());
            }
        }
    }
}
