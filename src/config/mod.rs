use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use directories::BaseDirs;

use crate::{
    batch::{BatchOptions, DEFAULT_PREVIEW_LENGTH},
    executor::TargetContext,
    source::ScriptLocation,
};

pub const WORKGROUP_NAME: &str = "WORKGROUP_NAME";
pub const DATABASE_NAME: &str = "DATABASE_NAME";
pub const ADMIN_SECRET_ARN: &str = "ADMIN_SECRET_ARN";
pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
pub const S3_KEY_PREFIX: &str = "S3_KEY_PREFIX";
pub const SQL_FILE_NAME: &str = "SQL_FILE_NAME";
pub const DATA_API_URL: &str = "DATA_API_URL";
pub const OBJECT_STORE_URL: &str = "OBJECT_STORE_URL";
pub const API_TOKEN: &str = "API_TOKEN";
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const PREVIEW_LENGTH: &str = "PREVIEW_LENGTH";

const ENV_PREFIX: &str = "SQLBATCH_";

const KEYS: &[&str] = &[
    WORKGROUP_NAME,
    DATABASE_NAME,
    ADMIN_SECRET_ARN,
    S3_BUCKET_NAME,
    S3_KEY_PREFIX,
    SQL_FILE_NAME,
    DATA_API_URL,
    OBJECT_STORE_URL,
    API_TOKEN,
    REQUEST_TIMEOUT,
    PREVIEW_LENGTH,
];

/// Layered key/value configuration: defaults, then the rc file, then the
/// environment. Callers apply event and CLI overrides with [`Config::set`].
///
/// Resolved once at startup; the batch pipeline only ever sees the typed
/// values produced by the accessors below.
#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::load_from(&config_path);
        // Environment takes precedence over the rc file
        cfg.apply_env(env::vars());
        cfg
    }

    /// Overlay environment variables. A `SQLBATCH_`-prefixed name wins over
    /// the plain spelling of the same key, whatever order they arrive in.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        let mut prefixed = Vec::new();
        for (k, v) in vars {
            let Some(key) = config_key(&k) else { continue };
            if k.starts_with(ENV_PREFIX) {
                prefixed.push((key.to_string(), v));
            } else {
                self.inner.insert(key.to_string(), v);
            }
        }
        self.inner.extend(prefixed);
    }

    /// Defaults overlaid with the rc file at `path`, without the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();
        if let Ok(file) = fs::File::open(path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(|l| l.ok()) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }
        Self { inner: map, config_path: path.to_path_buf() }
    }

    /// Defaults plus the given pairs. Never reads the file system or environment.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        Self { inner: map, config_path: PathBuf::new() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| {
            anyhow!(
                "missing configuration value {}. Set it in env, {} or on the command line",
                key,
                self.config_path.display()
            )
        })
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>> {
        self.get(key)
            .map(|v| {
                v.parse::<usize>()
                    .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, v))
            })
            .transpose()
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        let secs = self.get_usize(REQUEST_TIMEOUT)?.unwrap_or(60);
        if secs == 0 {
            bail!("{} must be at least 1 second, got 0", REQUEST_TIMEOUT);
        }
        Ok(Duration::from_secs(secs as u64))
    }

    pub fn target_context(&self) -> Result<TargetContext> {
        Ok(TargetContext {
            workgroup_name: self.require(WORKGROUP_NAME)?,
            database_name: self.require(DATABASE_NAME)?,
            secret_arn: self.require(ADMIN_SECRET_ARN)?,
        })
    }

    pub fn script_location(&self) -> Result<ScriptLocation> {
        Ok(ScriptLocation::new(
            self.require(S3_BUCKET_NAME)?,
            &self.get(S3_KEY_PREFIX).unwrap_or_default(),
            &self.require(SQL_FILE_NAME)?,
        ))
    }

    pub fn batch_options(&self) -> Result<BatchOptions> {
        let preview_length = self
            .get_usize(PREVIEW_LENGTH)?
            .unwrap_or(DEFAULT_PREVIEW_LENGTH);
        Ok(BatchOptions { preview_length })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { inner: default_map(), config_path: PathBuf::new() }
    }
}

/// Map an environment variable name to a config key. `SQLBATCH_`-prefixed
/// names are accepted as aliases so generic names can be avoided.
fn config_key(k: &str) -> Option<&str> {
    let key = k.strip_prefix(ENV_PREFIX).unwrap_or(k);
    KEYS.contains(&key).then_some(key)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("sqlbatch").join(".sqlbatchrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert(DATABASE_NAME.into(), "dev".into());
    m.insert(S3_KEY_PREFIX.into(), "redshift-sql".into());
    m.insert(SQL_FILE_NAME.into(), "redshift-tables.sql".into());
    m.insert(REQUEST_TIMEOUT.into(), "60".into());
    m.insert(PREVIEW_LENGTH.into(), DEFAULT_PREVIEW_LENGTH.to_string());
    m
}
