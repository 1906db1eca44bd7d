//! Run handler: resolve the target, load the script and execute it as one batch.

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    batch::{self, BatchOutcome},
    config::Config,
    executor::DataApiClient,
    source::{self, ObjectStoreClient, ScriptInput, ScriptSource},
};

/// Read the script text for `input`. Any failure here aborts the whole run.
pub async fn load_script(input: &ScriptInput, cfg: &Config) -> Result<String> {
    let bytes = match input {
        ScriptInput::File(path) => source::read_file(path).await?,
        ScriptInput::Stdin => source::read_stdin().await?,
        ScriptInput::ObjectStore => {
            let location = cfg.script_location()?;
            let store = ObjectStoreClient::from_config(cfg)?;
            info!(%location, "fetching script");
            store
                .fetch(&location)
                .await
                .with_context(|| format!("fetching script from {}", location))?
        }
    };
    info!(bytes = bytes.len(), "script loaded");
    Ok(source::decode_script(bytes)?)
}

pub async fn run(input: &ScriptInput, cfg: &Config) -> Result<BatchOutcome> {
    let target = cfg.target_context()?;
    let options = cfg.batch_options()?;
    let executor = DataApiClient::from_config(cfg)?;

    let script = load_script(input, cfg).await?;
    info!(
        workgroup = %target.workgroup_name,
        database = %target.database_name,
        "executing script"
    );
    Ok(batch::run_script(&executor, &target, &script, &options).await)
}
