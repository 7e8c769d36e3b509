use std::sync::Arc;

use tracing::debug;

use super::{Middleware, Next, from_fn};
use crate::session::SessionRef;
use slashmux_core::Interaction;

/// Logs the invoking user and channel of every routed interaction at debug
/// level, then continues the chain.
pub fn logger() -> Middleware {
    from_fn(
        |session: SessionRef, interaction: Arc<Interaction>, next: Next| async move {
            debug!(
                user = interaction.invoker().map(|u| u.id.as_str()).unwrap_or("-"),
                channel = interaction.channel_id.as_deref().unwrap_or("-"),
                "interaction"
            );
            next.run(session, interaction).await;
        },
    )
}
