//! Tracing subscriber setup.

use crate::{config::LogFormat, error::StartupError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "repurpose_api=info,actix_web=info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default filter. JSON output flattens event
/// fields so log shippers can index `policy`, `client` and `request_id`.
pub fn init_tracing(format: LogFormat) -> Result<(), StartupError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}
