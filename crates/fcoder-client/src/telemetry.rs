//! Log output setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(environment: &Environment) -> String {
    format!(
        "{level},fcoder_client={level},fcoder_validate={level}",
        level = environment.default_log_level()
    )
}

/// Install a formatted stderr subscriber. `RUST_LOG` wins over the
/// environment default. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(environment: &Environment) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(environment))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
