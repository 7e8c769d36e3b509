//! Configuration for slashmux bots.
//!
//! Settings are layered with figment: built-in defaults, a `slashmux.toml`
//! file, the conventional `DISCORD_TOKEN` / `DISCORD_GUILD_ID` variables and
//! finally `SLASHMUX_*` environment overrides.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use schema::{
    BotConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, SlashmuxConfig, SpanEventConfig,
};
pub use validation::validate_config;
