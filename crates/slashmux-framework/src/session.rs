//! The platform session seam.
//!
//! The router never talks to the network itself. Everything it needs from the
//! chat platform goes through [`Session`]: installing the interaction
//! callback, opening and closing the connection, publishing command
//! definitions, replying, and permission lookups for middleware.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::SessionResult;
use slashmux_core::{ApplicationCommand, Interaction, InteractionResponse, Permissions};

/// Callback invoked by a session for every incoming interaction.
pub type InteractionCallback = Arc<dyn Fn(Arc<Interaction>) -> BoxFuture<'static, ()> + Send + Sync>;

/// A shared, type-erased session.
pub type SessionRef = Arc<dyn Session>;

/// Where command definitions are published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CommandScope {
    /// Visible in every guild the application is installed in.
    #[default]
    Global,
    /// Visible in a single guild only. Updates propagate immediately, which
    /// makes this the usual choice during development.
    Guild(String),
}

impl CommandScope {
    /// Builds a scope from an optional guild id. `None` and the empty string
    /// both mean global.
    pub fn from_guild_id(guild_id: Option<impl Into<String>>) -> Self {
        match guild_id.map(Into::into) {
            Some(id) if !id.is_empty() => Self::Guild(id),
            _ => Self::Global,
        }
    }

    pub fn guild_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Guild(id) => Some(id),
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Guild(id) => write!(f, "guild {id}"),
        }
    }
}

/// A connection to the chat platform.
///
/// Implementations must be usable from many tasks at once: the router calls
/// [`respond`](Session::respond) and
/// [`user_channel_permissions`](Session::user_channel_permissions) from
/// concurrently running handlers.
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Installs a callback that receives every interaction once the session
    /// is open. May be called before [`open`](Session::open).
    fn add_interaction_handler(&self, callback: InteractionCallback);

    async fn open(&self) -> SessionResult<()>;

    async fn close(&self) -> SessionResult<()>;

    /// The bot's application id. Only guaranteed to be known after a
    /// successful [`open`](Session::open).
    fn application_id(&self) -> Option<String>;

    /// Replaces the full set of command definitions in `scope` with
    /// `commands`, returning the definitions as stored by the platform.
    async fn bulk_overwrite_commands(
        &self,
        application_id: &str,
        scope: &CommandScope,
        commands: &[ApplicationCommand],
    ) -> SessionResult<Vec<ApplicationCommand>>;

    /// Sends the initial response to an interaction.
    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> SessionResult<()>;

    /// Resolves the effective permissions of `user_id` in `channel_id`.
    async fn user_channel_permissions(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> SessionResult<Permissions>;
}
