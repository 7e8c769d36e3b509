//! # slashmux framework
//!
//! The live half of slashmux: handlers, middleware and the router that ties
//! registered patterns to a platform session.
//!
//! This layer provides:
//! - [`Handler`] and [`handler_fn`] for writing interaction handlers
//! - [`Middleware`] chains, plus the built-in [`logger`] and [`require_admin`]
//! - Tower integration, so any [`tower::Layer`] can wrap routes
//! - The [`Session`] seam and an in-memory [`LocalSession`]
//! - [`Mux`], which registers patterns, publishes commands and dispatches

pub mod error;
pub mod handler;
pub mod local;
pub mod middleware;
pub mod mux;
pub mod service;
pub mod session;

pub use error::{EventSkipped, MuxError, MuxResult, SessionError, SessionResult};
pub use handler::{BoxedHandler, Handler, HandlerFn, boxed, handler_fn};
pub use local::LocalSession;
pub use middleware::{Middleware, Next, from_fn, logger, require_admin};
pub use mux::{Mux, ServingMux};
pub use service::{HandlerService, InteractionPredicate, InteractionRequest, ServiceHandler};
pub use session::{CommandScope, InteractionCallback, Session, SessionRef};
