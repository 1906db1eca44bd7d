//! Sequential batch execution with per-statement error classification.
//!
//! Every statement is attempted exactly once, in script order. A failed
//! submission is recorded as data and never stops the batch; only failures
//! outside the per-statement loop (config, script acquisition) surface as
//! errors, and those are raised before any statement is submitted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    executor::{StatementExecutor, TargetContext},
    script,
    utils::unicode::truncate_chars,
};

pub const DEFAULT_PREVIEW_LENGTH: usize = 50;

/// Substrings in a service error that mean the statement was already applied.
/// Matched case-sensitively.
pub const SKIPPABLE_MARKERS: &[&str] = &["already exists", "Duplicate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of characters of a statement kept in the outcome.
    pub preview_length: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { preview_length: DEFAULT_PREVIEW_LENGTH }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The object already exists; safe to ignore when re-running a script.
    Skippable,
    Fatal,
}

impl ErrorClass {
    pub fn is_skippable(self) -> bool {
        self == Self::Skippable
    }
}

pub fn classify(error_message: &str) -> ErrorClass {
    if SKIPPABLE_MARKERS.iter().any(|m| error_message.contains(m)) {
        ErrorClass::Skippable
    } else {
        ErrorClass::Fatal
    }
}

/// Bounded prefix of a statement, used in outcomes and logs.
pub fn preview(statement: &str, max_chars: usize) -> String {
    truncate_chars(statement, max_chars).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    #[serde(rename = "statement")]
    pub statement_preview: String,
    pub execution_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    #[serde(rename = "statement")]
    pub statement_preview: String,
    #[serde(rename = "error")]
    pub error_message: String,
    pub skipped: bool,
}

/// Result of attempting every statement of a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub executions: Vec<ExecutionRecord>,
    pub errors: Vec<ExecutionError>,
}

impl BatchOutcome {
    pub fn attempted(&self) -> usize {
        self.executions.len() + self.errors.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.errors.iter().filter(|e| e.skipped).count()
    }

    pub fn fatal_count(&self) -> usize {
        self.errors.iter().filter(|e| !e.skipped).count()
    }

    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(|e| !e.skipped)
    }
}

/// Submit `statements` one at a time, in order, and fold the results.
///
/// Blank statements are skipped without an entry. Each submission is awaited
/// before the next one starts, since later statements may depend on objects
/// created by earlier ones.
pub async fn execute_batch<E, I>(
    executor: &E,
    target: &TargetContext,
    statements: I,
    options: &BatchOptions,
) -> BatchOutcome
where
    E: StatementExecutor + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut outcome = BatchOutcome::default();

    for (idx, statement) in statements.into_iter().enumerate() {
        let sql = statement.as_ref().trim();
        if sql.is_empty() {
            continue;
        }
        let statement_preview = preview(sql, options.preview_length);

        match executor.submit(sql, target).await {
            Ok(handle) => {
                debug!(index = idx, statement = %statement_preview, execution_id = %handle, "statement submitted");
                outcome.executions.push(ExecutionRecord {
                    statement_preview,
                    execution_id: handle.into_string(),
                });
            }
            Err(err) => {
                let error_message = err.to_string();
                let skipped = classify(&error_message).is_skippable();
                if skipped {
                    info!(index = idx, statement = %statement_preview, error = %error_message, "skipping statement, object already exists");
                } else {
                    warn!(index = idx, statement = %statement_preview, error = %error_message, "statement failed");
                }
                outcome.errors.push(ExecutionError {
                    statement_preview,
                    error_message,
                    skipped,
                });
            }
        }
    }

    info!(
        submitted = outcome.executions.len(),
        skipped = outcome.skipped_count(),
        failed = outcome.fatal_count(),
        "batch finished"
    );
    outcome
}

/// Strip comments, split and execute `script` as one batch.
pub async fn run_script<E>(
    executor: &E,
    target: &TargetContext,
    script: &str,
    options: &BatchOptions,
) -> BatchOutcome
where
    E: StatementExecutor + ?Sized,
{
    let statements = script::parse_script(script);
    info!(statements = statements.len(), "script parsed");
    execute_batch(executor, target, &statements, options).await
}
