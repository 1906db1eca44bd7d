use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    Config, ADMIN_SECRET_ARN, DATABASE_NAME, DATA_API_URL, OBJECT_STORE_URL, PREVIEW_LENGTH,
    S3_BUCKET_NAME, S3_KEY_PREFIX, SQL_FILE_NAME, WORKGROUP_NAME,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sqlbatch",
    about = "Run every statement of a SQL script against a remote SQL execution API",
    version
)]
pub struct Cli {
    /// Local SQL script. Use `-` for stdin. When omitted the script is fetched
    /// from the object store (bucket / key prefix / file name).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// JSON event file with workgroupName, databaseName, adminSecretArn,
    /// s3BucketName, s3KeyPrefix and sqlFileName.
    #[arg(long, value_name = "PATH")]
    pub event: Option<PathBuf>,

    /// Target workgroup.
    #[arg(long)]
    pub workgroup: Option<String>,

    /// Target database.
    #[arg(long)]
    pub database: Option<String>,

    /// Reference to the admin credential used by the execution API.
    #[arg(long = "secret-arn")]
    pub secret_arn: Option<String>,

    /// Object store bucket holding the script.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix of the script inside the bucket.
    #[arg(long = "key-prefix")]
    pub key_prefix: Option<String>,

    /// Script file name inside the key prefix.
    #[arg(long = "file-name")]
    pub file_name: Option<String>,

    /// Base URL of the SQL execution API.
    #[arg(long = "data-api-url")]
    pub data_api_url: Option<String>,

    /// Base URL of the object store.
    #[arg(long = "object-store-url")]
    pub object_store_url: Option<String>,

    /// Number of statement characters kept in results.
    #[arg(long = "preview-length", value_parser = clap::value_parser!(usize))]
    pub preview_length: Option<usize>,

    /// Print the split statements and exit without executing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 1 if any statement failed with a non-skippable error.
    #[arg(long)]
    pub strict: bool,

    /// Pretty-print the JSON response.
    #[arg(long)]
    pub pretty: bool,

    /// Print a per-statement summary to stderr.
    #[arg(long)]
    pub summary: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Command-line values take precedence over event, env and rc file.
    pub fn apply(&self, cfg: &mut Config) {
        let overrides = [
            (WORKGROUP_NAME, &self.workgroup),
            (DATABASE_NAME, &self.database),
            (ADMIN_SECRET_ARN, &self.secret_arn),
            (S3_BUCKET_NAME, &self.bucket),
            (S3_KEY_PREFIX, &self.key_prefix),
            (SQL_FILE_NAME, &self.file_name),
            (DATA_API_URL, &self.data_api_url),
            (OBJECT_STORE_URL, &self.object_store_url),
        ];
        for (key, value) in overrides {
            if let Some(v) = value {
                cfg.set(key, v.clone());
            }
        }
        if let Some(n) = self.preview_length {
            cfg.set(PREVIEW_LENGTH, n.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = <Cli as Parser>::parse_from([
            "sqlbatch",
            "--workgroup",
            "wg",
            "--secret-arn",
            "arn:secret",
            "--preview-length",
            "10",
            "schema.sql",
        ]);
        let mut cfg = Config::from_pairs([(WORKGROUP_NAME, "other")]);
        cli.apply(&mut cfg);
        assert_eq!(cli.file, Some(PathBuf::from("schema.sql")));
        let target = cfg.target_context().unwrap();
        assert_eq!(target.workgroup_name, "wg");
        assert_eq!(target.secret_arn, "arn:secret");
        assert_eq!(cfg.batch_options().unwrap().preview_length, 10);
    }
}
