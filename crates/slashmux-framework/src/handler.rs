//! Interaction handlers.
//!
//! A [`Handler`] receives the session and the interaction that matched its
//! pattern. It produces no result: replying, logging and error reporting are
//! its own business.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::session::SessionRef;
use slashmux_core::Interaction;

/// Processes one routed interaction.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>);
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Adapts an async closure into a [`Handler`].
///
/// ```rust,ignore
/// mux.handle("/ping", handler_fn(|session, interaction| async move {
///     let _ = session.respond(&interaction, InteractionResponse::message("pong")).await;
/// }))?;
/// ```
#[derive(Clone)]
pub struct HandlerFn<F>(F);

/// Wraps `f` in a [`HandlerFn`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(SessionRef, Arc<Interaction>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(SessionRef, Arc<Interaction>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>) {
        (self.0)(session, interaction).await
    }
}

#[async_trait]
impl Handler for BoxedHandler {
    async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>) {
        (**self).handle_interaction(session, interaction).await
    }
}

/// Boxes a handler.
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}
