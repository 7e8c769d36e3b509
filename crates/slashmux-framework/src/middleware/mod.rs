//! Handler middleware.
//!
//! A [`Middleware`] takes the next handler and returns a new handler that
//! wraps it. Middleware registered on a [`Mux`](crate::Mux) applies to every
//! route; the first one registered is the outermost, so its "before" logic
//! runs first and its "after" logic runs last.
//!
//! [`from_fn`] is the convenient way to write one: the closure gets the
//! session, the interaction and a [`Next`] it may or may not run.

mod admin;
mod logger;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::handler::{BoxedHandler, Handler};
use crate::session::SessionRef;
use slashmux_core::Interaction;

pub use admin::{PERMISSION_DENIED, require_admin};
pub use logger::logger;

/// Transforms a handler into a wrapping handler.
pub type Middleware = Arc<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync>;

/// Wraps `handler` with `middlewares` so that `middlewares[0]` is outermost.
pub fn chain(middlewares: &[Middleware], handler: BoxedHandler) -> BoxedHandler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware(next))
}

/// The remainder of the chain, handed to a [`from_fn`] closure.
#[derive(Clone)]
pub struct Next(BoxedHandler);

impl Next {
    /// Runs the wrapped handler. Dropping `Next` without calling this
    /// short-circuits the chain.
    pub async fn run(self, session: SessionRef, interaction: Arc<Interaction>) {
        self.0.handle_interaction(session, interaction).await
    }
}

struct FromFn<F> {
    f: Arc<F>,
    next: BoxedHandler,
}

#[async_trait]
impl<F, Fut> Handler for FromFn<F>
where
    F: Fn(SessionRef, Arc<Interaction>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle_interaction(&self, session: SessionRef, interaction: Arc<Interaction>) {
        (self.f)(session, interaction, Next(Arc::clone(&self.next))).await
    }
}

/// Builds a middleware from an async closure.
///
/// ```rust,ignore
/// mux.use_middleware(from_fn(|session, interaction, next: Next| async move {
///     tracing::info!("before");
///     next.run(session, interaction).await;
///     tracing::info!("after");
/// }));
/// ```
pub fn from_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(SessionRef, Arc<Interaction>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        Arc::new(FromFn {
            f: Arc::clone(&f),
            next,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::local::LocalSession;
    use parking_lot::Mutex;
    use slashmux_core::CommandData;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn recording(trace: &Trace, name: &'static str) -> Middleware {
        let trace = Arc::clone(trace);
        from_fn(move |session, interaction, next: Next| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().push(format!("{name}-before"));
                next.run(session, interaction).await;
                trace.lock().push(format!("{name}-after"));
            }
        })
    }

    #[tokio::test]
    async fn test_first_registered_is_outermost() {
        let trace: Trace = Arc::default();
        let handler_trace = Arc::clone(&trace);
        let handler: BoxedHandler = Arc::new(handler_fn(move |_, _| {
            let trace = Arc::clone(&handler_trace);
            async move { trace.lock().push("H".to_string()) }
        }));

        let wrapped = chain(&[recording(&trace, "A"), recording(&trace, "B")], handler);
        let session: SessionRef = Arc::new(LocalSession::new("app"));
        let interaction = Arc::new(Interaction::command("1", CommandData::new("ping", Vec::new())));
        wrapped.handle_interaction(session, interaction).await;

        assert_eq!(
            *trace.lock(),
            ["A-before", "B-before", "H", "B-after", "A-after"]
        );
    }

    #[tokio::test]
    async fn test_dropping_next_short_circuits() {
        let trace: Trace = Arc::default();
        let handler_trace = Arc::clone(&trace);
        let handler: BoxedHandler = Arc::new(handler_fn(move |_, _| {
            let trace = Arc::clone(&handler_trace);
            async move { trace.lock().push("H".to_string()) }
        }));
        let gate = from_fn(|_, _, _next: Next| async {});

        let wrapped = chain(&[recording(&trace, "A"), gate], handler);
        let session: SessionRef = Arc::new(LocalSession::new("app"));
        let interaction = Arc::new(Interaction::command("1", CommandData::new("ping", Vec::new())));
        wrapped.handle_interaction(session, interaction).await;

        assert_eq!(*trace.lock(), ["A-before", "A-after"]);
    }

    #[test]
    fn test_empty_chain_returns_handler() {
        let handler: BoxedHandler = Arc::new(handler_fn(|_, _| async {}));
        let wrapped = chain(&[], Arc::clone(&handler));
        assert!(Arc::ptr_eq(&handler, &wrapped));
    }
}
