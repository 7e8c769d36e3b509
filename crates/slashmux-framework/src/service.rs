//! Bridging handlers and tower.
//!
//! [`HandlerService`] exposes a [`BoxedHandler`] as a
//! `tower::Service<InteractionRequest>`, and [`ServiceHandler`] turns any such
//! service back into a handler. Together they let ordinary tower [`Layer`]s
//! act as router middleware via [`layer_middleware`].

use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tower::filter::{FilterLayer, Predicate};
use tower::{BoxError, Layer, Service, ServiceExt};
use tracing::error;

use crate::error::EventSkipped;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::session::SessionRef;
use slashmux_core::Interaction;

/// The request type flowing through tower services.
#[derive(Clone)]
pub struct InteractionRequest {
    pub session: SessionRef,
    pub interaction: Arc<Interaction>,
}

// ============================================================================
// HandlerService
// ============================================================================

/// A tower [`Service`] that calls a boxed handler.
#[derive(Clone)]
pub struct HandlerService {
    handler: BoxedHandler,
}

impl HandlerService {
    pub fn new(handler: BoxedHandler) -> Self {
        Self { handler }
    }
}

impl Service<InteractionRequest> for HandlerService {
    type Response = ();
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<(), Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: InteractionRequest) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        async move {
            handler
                .handle_interaction(req.session, req.interaction)
                .await;
            Ok(())
        }
        .boxed()
    }
}

// ============================================================================
// ServiceHandler
// ============================================================================

/// A [`Handler`] that drives a tower service.
///
/// Errors from the service are logged, except [`EventSkipped`], which means a
/// filter turned the interaction away and is silently dropped.
#[derive(Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S> Handler for ServiceHandler<S>
where
    S: Service<InteractionRequest> + Clone + Send + Sync + 'static,
    S::Response: Send,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>) {
        let service = self.service.clone();
        let result = service
            .oneshot(InteractionRequest {
                session,
                interaction,
            })
            .await;
        if let Err(e) = result {
            let e: BoxError = e.into();
            if !e.is::<EventSkipped>() {
                error!("Handler service error: {e}");
            }
        }
    }
}

/// Turns a tower layer into router middleware.
pub fn layer_middleware<L>(layer: L) -> Middleware
where
    L: Layer<HandlerService> + Send + Sync + 'static,
    L::Service: Service<InteractionRequest> + Clone + Send + Sync + 'static,
    <L::Service as Service<InteractionRequest>>::Response: Send,
    <L::Service as Service<InteractionRequest>>::Error: Into<BoxError>,
    <L::Service as Service<InteractionRequest>>::Future: Send,
{
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        Arc::new(ServiceHandler::new(layer.layer(HandlerService::new(next))))
    })
}

// ============================================================================
// InteractionPredicate
// ============================================================================

/// A type-erased [`Predicate`] over interactions.
///
/// When the closure returns `false` the request is rejected with
/// [`EventSkipped`].
#[derive(Clone)]
pub struct InteractionPredicate(Arc<dyn Fn(&Interaction) -> bool + Send + Sync>);

impl InteractionPredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Interaction) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl Predicate<InteractionRequest> for InteractionPredicate {
    type Request = InteractionRequest;

    fn check(&mut self, request: InteractionRequest) -> Result<InteractionRequest, BoxError> {
        if (self.0)(&request.interaction) {
            Ok(request)
        } else {
            Err(Box::new(EventSkipped))
        }
    }
}

/// Middleware that only lets interactions matching `predicate` through.
pub fn filter_middleware<F>(predicate: F) -> Middleware
where
    F: Fn(&Interaction) -> bool + Send + Sync + 'static,
{
    layer_middleware(FilterLayer::new(InteractionPredicate::new(predicate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::local::LocalSession;
    use crate::middleware::chain;
    use slashmux_core::CommandData;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, BoxedHandler) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler: BoxedHandler = Arc::new(handler_fn(move |_, _| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        (calls, handler)
    }

    fn interaction(name: &str) -> Arc<Interaction> {
        Arc::new(Interaction::command("1", CommandData::new(name, Vec::new())))
    }

    #[tokio::test]
    async fn test_handler_service_calls_handler() {
        let (calls, handler) = counting();
        let session: SessionRef = Arc::new(LocalSession::new("app"));
        let svc = HandlerService::new(handler);
        svc.oneshot(InteractionRequest {
            session,
            interaction: interaction("ping"),
        })
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_filter_middleware() {
        let (calls, handler) = counting();
        let session: SessionRef = Arc::new(LocalSession::new("app"));
        let wrapped = chain(
            &[filter_middleware(|i| {
                i.command_data().is_some_and(|d| d.name == "ping")
            })],
            handler,
        );

        wrapped
            .handle_interaction(Arc::clone(&session), interaction("ping"))
            .await;
        wrapped
            .handle_interaction(Arc::clone(&session), interaction("other"))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_layer_middleware_with_map_request() {
        let (calls, handler) = counting();
        let session: SessionRef = Arc::new(LocalSession::new("app"));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_layer = Arc::clone(&seen);
        let layer = tower::util::MapRequestLayer::new(move |req: InteractionRequest| {
            seen_in_layer.fetch_add(1, Ordering::SeqCst);
            req
        });

        let wrapped = chain(&[layer_middleware(layer)], handler);
        wrapped.handle_interaction(session, interaction("ping")).await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
