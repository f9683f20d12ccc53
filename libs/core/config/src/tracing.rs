use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default directives for development when `RUST_LOG` is unset
const DEVELOPMENT_FILTER: &str = "debug,sqlx=warn,hyper=info,tower_http=debug";

/// Default directives for production when `RUST_LOG` is unset
const PRODUCTION_FILTER: &str = "info,sqlx=warn";

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware defaults.
///
/// - **Production** (`APP_ENV=production`): JSON events, module targets hidden.
/// - **Development** (default): pretty, human-readable output.
///
/// Both variants carry an `ErrorLayer` so eyre reports include span traces.
/// `RUST_LOG` overrides the default directives.
pub fn init_tracing(environment: &Environment) {
    let default_filter = if environment.is_production() {
        PRODUCTION_FILTER
    } else {
        DEVELOPMENT_FILTER
    };
    init_tracing_with_filter(environment, default_filter);
}

/// Same as [`init_tracing`] with caller-provided default directives.
///
/// Command-line tools use this to keep logs quiet unless `RUST_LOG` asks otherwise.
/// Output always goes to stderr so stdout stays free for rendered views.
pub fn init_tracing_with_filter(environment: &Environment, default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        // Already initialized (common in tests)
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
