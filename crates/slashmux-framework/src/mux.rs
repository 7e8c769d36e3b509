//! The interaction router.
//!
//! A [`Mux`] is built in two phases. While registering, patterns are parsed,
//! folded into command definitions and bound to handlers; nothing touches the
//! network. [`Mux::serve`] then consumes the router, installs it as the
//! session's interaction callback, opens the session and publishes every
//! definition in one bulk overwrite. The returned [`ServingMux`] is
//! read-only, so concurrent dispatch needs no locking.
//!
//! ```rust,ignore
//! let mut mux = Mux::new(session).with_scope(CommandScope::Guild(guild_id));
//! mux.use_middleware(logger());
//! mux.handle_fn("/math add num1:integer num2:integer", add)?;
//! let serving = mux.serve().await?;
//! // ... wait for shutdown ...
//! serving.close().await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tower::{BoxError, Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::error::{MuxError, MuxResult};
use crate::handler::{BoxedHandler, Handler, handler_fn};
use crate::middleware::{self, Middleware};
use crate::service::{HandlerService, InteractionRequest, filter_middleware, layer_middleware};
use crate::session::{CommandScope, SessionRef};
use slashmux_core::{
    ApplicationCommand, CommandRegistry, DispatchKey, Interaction, RegistryError, parse,
};

// ============================================================================
// Router
// ============================================================================

/// Handler table plus the global middleware list.
#[derive(Default)]
struct Router {
    handlers: HashMap<DispatchKey, BoxedHandler>,
    middlewares: Vec<Middleware>,
}

impl Router {
    /// Routes one interaction. Returns `true` if a handler ran.
    async fn dispatch(&self, session: SessionRef, interaction: Arc<Interaction>) -> bool {
        let Some(data) = interaction.command_data() else {
            debug!(id = %interaction.id, kind = ?interaction.kind, "ignoring non-command interaction");
            return false;
        };
        let key = DispatchKey::from_interaction(data);
        let span = span!(Level::DEBUG, "dispatch", key = %key);

        let Some(handler) = self.handlers.get(&key) else {
            span.in_scope(|| debug!("no handler registered"));
            return false;
        };

        let handler = middleware::chain(&self.middlewares, Arc::clone(handler));
        handler
            .handle_interaction(session, interaction)
            .instrument(span)
            .await;
        true
    }
}

// ============================================================================
// Mux
// ============================================================================

/// A router in its registration phase.
pub struct Mux {
    session: SessionRef,
    scope: CommandScope,
    registry: CommandRegistry,
    router: Router,
}

impl Mux {
    /// Creates an empty router bound to `session`, publishing globally.
    pub fn new(session: SessionRef) -> Self {
        Self {
            session,
            scope: CommandScope::Global,
            registry: CommandRegistry::new(),
            router: Router::default(),
        }
    }

    /// Sets where command definitions are published (builder pattern).
    pub fn with_scope(mut self, scope: CommandScope) -> Self {
        self.scope = scope;
        self
    }

    /// Registers `handler` for `pattern`.
    ///
    /// Fails if the pattern is malformed, if its dispatch key is already
    /// taken, or if it does not fit the command tree built so far. A failed
    /// call leaves the router unchanged.
    pub fn handle<H: Handler>(&mut self, pattern: &str, handler: H) -> MuxResult<&mut Self> {
        let parsed = parse(pattern)?;
        let key = parsed.key();
        if self.router.handlers.contains_key(&key) {
            return Err(RegistryError::duplicate(key.as_str()).into());
        }
        self.registry.register(&parsed)?;

        debug!(key = %key, "handler registered");
        self.router.handlers.insert(key, Arc::new(handler));
        Ok(self)
    }

    /// Registers an async closure for `pattern`.
    pub fn handle_fn<F, Fut>(&mut self, pattern: &str, f: F) -> MuxResult<&mut Self>
    where
        F: Fn(SessionRef, Arc<Interaction>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handle(pattern, handler_fn(f))
    }

    /// Appends a middleware. Applies to every route, including routes
    /// registered before this call; the first middleware added is outermost.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.router.middlewares.push(middleware);
        self
    }

    /// Appends several middlewares, in order.
    pub fn use_middlewares(&mut self, middlewares: impl IntoIterator<Item = Middleware>) -> &mut Self {
        self.router.middlewares.extend(middlewares);
        self
    }

    /// Appends a tower layer as middleware.
    pub fn use_layer<L>(&mut self, layer: L) -> &mut Self
    where
        L: Layer<HandlerService> + Send + Sync + 'static,
        L::Service: Service<InteractionRequest> + Clone + Send + Sync + 'static,
        <L::Service as Service<InteractionRequest>>::Response: Send,
        <L::Service as Service<InteractionRequest>>::Error: Into<BoxError>,
        <L::Service as Service<InteractionRequest>>::Future: Send,
    {
        self.use_middleware(layer_middleware(layer))
    }

    /// Drops every interaction for which `predicate` returns `false`.
    pub fn use_filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Interaction) -> bool + Send + Sync + 'static,
    {
        self.use_middleware(filter_middleware(predicate))
    }

    /// Routes an interaction using the given session, as the serving router
    /// would. Useful for exercising routes before going live.
    pub async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>) -> bool {
        self.router.dispatch(session, interaction).await
    }

    /// The command definitions built so far, in registration order.
    pub fn commands(&self) -> &[ApplicationCommand] {
        self.registry.commands()
    }

    pub fn handler_count(&self) -> usize {
        self.router.handlers.len()
    }

    pub fn scope(&self) -> &CommandScope {
        &self.scope
    }

    /// Goes live.
    ///
    /// Installs the dispatch callback, opens the session and bulk-overwrites
    /// the command definitions in the configured scope. If anything fails
    /// after the session was opened, the session is closed again before the
    /// error is returned.
    ///
    /// The callback routes nothing until the overwrite has succeeded, and
    /// stops routing once the returned [`ServingMux`] is closed.
    pub async fn serve(self) -> MuxResult<ServingMux> {
        let Mux {
            session,
            scope,
            registry,
            router,
        } = self;
        let router = Arc::new(router);
        let live = Arc::new(AtomicBool::new(false));

        // Weak so the session does not keep itself alive through its own callback.
        let weak = Arc::downgrade(&session);
        let callback_router = Arc::clone(&router);
        let callback_live = Arc::clone(&live);
        session.add_interaction_handler(Arc::new(move |interaction: Arc<Interaction>| {
            let router = Arc::clone(&callback_router);
            let session = callback_live
                .load(Ordering::Acquire)
                .then(|| weak.upgrade())
                .flatten();
            async move {
                if let Some(session) = session {
                    router.dispatch(session, interaction).await;
                }
            }
            .boxed()
        }));

        session.open().await.map_err(MuxError::Open)?;

        let Some(application_id) = session.application_id() else {
            close_quietly(&session).await;
            return Err(MuxError::MissingApplicationId);
        };

        let commands = registry.into_commands();
        let published = match session
            .bulk_overwrite_commands(&application_id, &scope, &commands)
            .await
        {
            Ok(published) => published,
            Err(e) => {
                close_quietly(&session).await;
                return Err(MuxError::Publish(e));
            }
        };
        info!(
            count = published.len(),
            scope = %scope,
            "application commands published"
        );
        live.store(true, Ordering::Release);

        Ok(ServingMux {
            session,
            scope,
            router,
            live,
            commands: published,
        })
    }
}

async fn close_quietly(session: &SessionRef) {
    if let Err(e) = session.close().await {
        warn!("Failed to close session after startup error: {e}");
    }
}

// ============================================================================
// ServingMux
// ============================================================================

/// A live router. Dispatch happens through the session callback; the table
/// can no longer change.
pub struct ServingMux {
    session: SessionRef,
    scope: CommandScope,
    router: Arc<Router>,
    live: Arc<AtomicBool>,
    commands: Vec<ApplicationCommand>,
}

impl ServingMux {
    /// Routes an interaction through this router's session.
    pub async fn handle_interaction(&self, interaction: Arc<Interaction>) -> bool {
        self.router
            .dispatch(Arc::clone(&self.session), interaction)
            .await
    }

    /// The definitions as stored by the platform.
    pub fn commands(&self) -> &[ApplicationCommand] {
        &self.commands
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn scope(&self) -> &CommandScope {
        &self.scope
    }

    /// Closes the session. Published commands stay registered on the
    /// platform.
    pub async fn close(self) -> MuxResult<()> {
        self.live.store(false, Ordering::Release);
        self.session.close().await.map_err(MuxError::Close)?;
        info!("session closed");
        Ok(())
    }
}
