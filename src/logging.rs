use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays JSON.
pub fn init(verbose: bool, json: bool) {
    let default = if verbose { "sqlbatch=debug" } else { "sqlbatch=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
