//! # slashmux
//!
//! Declare slash commands as one-line patterns and route interactions back
//! to the handler registered for each.
//!
//! ```text
//! "/math add num1:integer num2:integer"
//!   │     │   └──────────────────────── typed options
//!   │     └──────────────────────────── sub-command (up to two levels)
//!   └────────────────────────────────── command name
//! ```
//!
//! Registration parses every pattern into the platform's command schema and
//! derives a dispatch key (`"/math add"`). On startup the whole command set
//! is published in one bulk overwrite; each incoming interaction is mapped
//! back onto a key and handed to its handler through the middleware chain.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slashmux::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let mut mux = Mux::new(session).with_scope(config.bot.scope());
//!     mux.use_middleware(logger());
//!     mux.handle_fn("/hi happy:string<happy,sad>", |session, interaction| async move {
//!         let mood = interaction.option("happy").and_then(|o| o.string_value()).unwrap_or("?");
//!         let _ = session
//!             .respond(&interaction, InteractionResponse::message(format!("you are {mood}")))
//!             .await;
//!     })?;
//!
//!     run_until_shutdown(mux).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): `slashmux.toml` configuration files
//! - `yaml-config`: `slashmux.yaml` configuration files
//! - `json-log`: JSON log output

pub use slashmux_core as core;
pub use slashmux_framework as framework;
pub use slashmux_runtime as runtime;

/// Commonly used types for building bots.
pub mod prelude {
    // Patterns and the command model
    pub use slashmux_core::{
        ApplicationCommand, CommandDataOption, DispatchKey, Interaction, InteractionResponse,
        OptionType, Permissions, command_option, dispatch_key,
    };

    // Routing
    pub use slashmux_framework::{
        BoxedHandler, CommandScope, Handler, LocalSession, Middleware, Mux, MuxError, Next,
        ServingMux, Session, SessionError, SessionRef, from_fn, handler_fn, logger,
        require_admin,
    };

    // Process lifecycle
    pub use slashmux_runtime::config::load_config;
    pub use slashmux_runtime::{logging, run_until_shutdown};
}
