//! slashmux runtime: everything around the router that a bot process needs.
//!
//! - Layered configuration ([`config`]) with figment
//! - Logging setup ([`logging`]) on `tracing-subscriber`
//! - Serving until Ctrl+C or SIGTERM ([`run_until_shutdown`])
//!
//! ```ignore
//! use slashmux_runtime::{config::load_config, logging, run_until_shutdown};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let mut mux = Mux::new(session).with_scope(config.bot.scope());
//!     mux.handle_fn("/ping", ping)?;
//!     run_until_shutdown(mux).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runner;

pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, SlashmuxConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runner::{run_until, run_until_shutdown, wait_for_shutdown};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
