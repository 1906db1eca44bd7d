//! Reqwest client for an S3-compatible object store exposing `GET {base}/{bucket}/{key}`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::{ScriptLocation, ScriptSource, SourceError};
use crate::config::{Config, API_TOKEN, OBJECT_STORE_URL};

#[derive(Debug)]
pub struct ObjectStoreClient {
    client: Client,
    base: String,
    token: Option<String>,
}

impl ObjectStoreClient {
    pub fn new(base: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base: base.into(), token })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.require(OBJECT_STORE_URL)?, cfg.get(API_TOKEN), cfg.request_timeout()?)
    }

    fn object_url(&self, location: &ScriptLocation) -> String {
        format!(
            "{}/{}/{}",
            self.base.trim_end_matches('/'),
            location.bucket,
            location.key
        )
    }
}

#[async_trait]
impl ScriptSource for ObjectStoreClient {
    async fn fetch(&self, location: &ScriptLocation) -> Result<Vec<u8>, SourceError> {
        let mut req = self.client.get(self.object_url(location));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                location: location.to_string(),
                body,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
