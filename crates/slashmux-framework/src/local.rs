//! An in-process [`Session`] with no network behind it.
//!
//! [`LocalSession`] records everything the router sends it and lets callers
//! push interactions in with [`LocalSession::deliver`]. It backs the tests and
//! the offline demo, and is handy for exercising a bot's routes without a
//! platform connection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{SessionError, SessionResult};
use crate::session::{CommandScope, InteractionCallback, Session};
use slashmux_core::{ApplicationCommand, Interaction, InteractionResponse, Permissions};

#[derive(Default)]
struct LocalState {
    open: bool,
    callbacks: Vec<InteractionCallback>,
    published: HashMap<CommandScope, Vec<ApplicationCommand>>,
    publish_count: usize,
    reject_publish: Option<SessionError>,
    responses: Vec<(String, InteractionResponse)>,
    permissions: HashMap<(String, String), Permissions>,
}

/// A recording, in-memory session.
///
/// Publishing and delivering require the session to be open. Responses and
/// permission lookups work in any state so that handlers and middleware can
/// be driven directly.
pub struct LocalSession {
    application_id: String,
    state: Mutex<LocalState>,
}

impl LocalSession {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            state: Mutex::new(LocalState::default()),
        }
    }

    /// Grants `permissions` to `user_id` in `channel_id` (builder pattern).
    pub fn with_permissions(
        self,
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        permissions: Permissions,
    ) -> Self {
        self.set_permissions(user_id, channel_id, permissions);
        self
    }

    pub fn set_permissions(
        &self,
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        permissions: Permissions,
    ) {
        self.state
            .lock()
            .permissions
            .insert((user_id.into(), channel_id.into()), permissions);
    }

    /// Makes every following publish fail with `error`.
    pub fn reject_publish(&self, error: SessionError) {
        self.state.lock().reject_publish = Some(error);
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Feeds an interaction to every installed callback, in installation
    /// order, and waits for them to finish.
    pub async fn deliver(&self, interaction: Interaction) -> SessionResult<()> {
        let callbacks = {
            let state = self.state.lock();
            if !state.open {
                return Err(SessionError::NotConnected);
            }
            state.callbacks.clone()
        };
        let interaction = Arc::new(interaction);
        trace!(id = %interaction.id, callbacks = callbacks.len(), "delivering interaction");
        for callback in callbacks {
            callback(Arc::clone(&interaction)).await;
        }
        Ok(())
    }

    /// Returns the commands last published to `scope`.
    pub fn published(&self, scope: &CommandScope) -> Option<Vec<ApplicationCommand>> {
        self.state.lock().published.get(scope).cloned()
    }

    /// Number of successful bulk overwrites so far.
    pub fn publish_count(&self) -> usize {
        self.state.lock().publish_count
    }

    /// Returns `(interaction id, response)` pairs in the order they were sent.
    pub fn responses(&self) -> Vec<(String, InteractionResponse)> {
        self.state.lock().responses.clone()
    }

    /// Drains the recorded responses.
    pub fn take_responses(&self) -> Vec<(String, InteractionResponse)> {
        std::mem::take(&mut self.state.lock().responses)
    }
}

#[async_trait]
impl Session for LocalSession {
    fn add_interaction_handler(&self, callback: InteractionCallback) {
        self.state.lock().callbacks.push(callback);
    }

    async fn open(&self) -> SessionResult<()> {
        let mut state = self.state.lock();
        if state.open {
            return Err(SessionError::Connection("session already open".into()));
        }
        state.open = true;
        debug!(application_id = %self.application_id, "local session opened");
        Ok(())
    }

    async fn close(&self) -> SessionResult<()> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(SessionError::NotConnected);
        }
        state.open = false;
        state.callbacks.clear();
        debug!("local session closed");
        Ok(())
    }

    fn application_id(&self) -> Option<String> {
        self.state
            .lock()
            .open
            .then(|| self.application_id.clone())
    }

    async fn bulk_overwrite_commands(
        &self,
        application_id: &str,
        scope: &CommandScope,
        commands: &[ApplicationCommand],
    ) -> SessionResult<Vec<ApplicationCommand>> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(SessionError::NotConnected);
        }
        if let Some(err) = state.reject_publish.clone() {
            return Err(err);
        }

        let stored: Vec<ApplicationCommand> = commands
            .iter()
            .enumerate()
            .map(|(idx, command)| {
                let mut command = command.clone();
                command.id = Some((idx + 1).to_string());
                command.application_id = Some(application_id.to_string());
                command.guild_id = scope.guild_id().map(str::to_string);
                command
            })
            .collect();
        state.published.insert(scope.clone(), stored.clone());
        state.publish_count += 1;
        Ok(stored)
    }

    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> SessionResult<()> {
        self.state
            .lock()
            .responses
            .push((interaction.id.clone(), response));
        Ok(())
    }

    async fn user_channel_permissions(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> SessionResult<Permissions> {
        self.state
            .lock()
            .permissions
            .get(&(user_id.to_string(), channel_id.to_string()))
            .copied()
            .ok_or_else(|| SessionError::rejected(404, format!("unknown member {user_id}")))
    }
}
