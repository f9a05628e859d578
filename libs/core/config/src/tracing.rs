use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

const PRODUCTION_FILTER: &str = "info,sqlx=warn,sea_orm=warn";
const DEVELOPMENT_FILTER: &str = "debug,hyper=info,sqlx=info,tower_http=debug";

/// Install the color-eyre report hook. Call once at the top of `main`.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Set up the global subscriber.
///
/// Production emits flattened JSON events; development uses the pretty
/// formatter. Both carry an `ErrorLayer` so eyre reports include span traces.
/// `RUST_LOG` overrides the default filter. Repeated calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if environment.is_production() {
            PRODUCTION_FILTER
        } else {
            DEVELOPMENT_FILTER
        })
    });

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(?environment, "tracing initialized"),
        Err(_) => debug!("tracing already initialized"),
    }
}
