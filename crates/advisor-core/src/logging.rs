use tracing_subscriber::{fmt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize logging/tracing for the relay.
pub fn init(service_name: &str) -> Result<()> {
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init()
        .map_err(|e| Error::Config(format!("logging init failed: {e}")))
}

fn default_directives(service_name: &str) -> String {
    format!(
        "info,advisor=info,advisor_core=info,advisor_http=info,advisor_openai=info,advisor_telegram=info,{}=info",
        service_name.replace('-', "_")
    )
}
