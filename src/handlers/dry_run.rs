//! Dry run: show how a script would be split without contacting the execution API.

use anyhow::Result;

use crate::{config::Config, script, source::ScriptInput};

pub async fn run(input: &ScriptInput, cfg: &Config) -> Result<Vec<String>> {
    let script = super::run::load_script(input, cfg).await?;
    Ok(script::parse_script(&script))
}
