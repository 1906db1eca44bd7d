use std::{io, path::Path, process::ExitCode};

use anyhow::Result;
use is_terminal::IsTerminal;
use tracing::error;

use sqlbatch::{
    cli::Cli,
    config::Config,
    event::RunEvent,
    handlers,
    logging,
    printer::{self, SummaryPrinter},
    response::RunResponse,
    source::ScriptInput,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose, args.log_json);

    let printer = SummaryPrinter { color: io::stderr().is_terminal() };
    let input = script_input(&args);

    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => return fail(&e, args.pretty),
    };

    if args.dry_run {
        return match handlers::dry_run::run(&input, &cfg).await {
            Ok(statements) => {
                printer.print_statements(&statements);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e, args.pretty),
        };
    }

    let outcome = match handlers::run::run(&input, &cfg).await {
        Ok(outcome) => outcome,
        Err(e) => return fail(&e, args.pretty),
    };
    if args.summary {
        printer.print(&outcome);
    }
    let strict_failure = args.strict && outcome.has_fatal();
    if let Err(e) = printer::print_response(&RunResponse::completed(outcome), args.pretty) {
        error!("failed to write response: {:#}", e);
        return ExitCode::from(2);
    }
    if strict_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// rc file and env, then the event file, then command-line flags.
fn resolve_config(args: &Cli) -> Result<Config> {
    let mut cfg = Config::load();
    if let Some(path) = &args.event {
        RunEvent::from_path(path)?.apply(&mut cfg);
    }
    args.apply(&mut cfg);
    Ok(cfg)
}

fn script_input(args: &Cli) -> ScriptInput {
    match &args.file {
        Some(p) if p.as_path() == Path::new("-") => ScriptInput::Stdin,
        Some(p) => ScriptInput::File(p.clone()),
        None => ScriptInput::ObjectStore,
    }
}

fn fail(err: &anyhow::Error, pretty: bool) -> ExitCode {
    error!("Error executing SQL: {:#}", err);
    if let Err(e) = printer::print_response(&RunResponse::failed(err), pretty) {
        error!("failed to write response: {:#}", e);
    }
    ExitCode::from(2)
}
