use std::sync::Arc;

use tracing::{debug, error, warn};

use super::{Middleware, Next, from_fn};
use crate::session::SessionRef;
use slashmux_core::{Interaction, InteractionResponse, Permissions};

/// Reply sent to users who invoke an admin-only command without the
/// administrator permission.
pub const PERMISSION_DENIED: &str = "You don't have permission to do that.";

/// Only lets interactions through when the invoker has the administrator
/// permission in the channel the interaction came from.
///
/// Everyone else gets a [`PERMISSION_DENIED`] reply. If the permission lookup
/// itself fails, the error is logged and nothing is sent.
pub fn require_admin() -> Middleware {
    from_fn(
        |session: SessionRef, interaction: Arc<Interaction>, next: Next| async move {
            let user_id = interaction.invoker().map(|u| u.id.clone());
            let channel_id = interaction.channel_id.clone();
            let (Some(user_id), Some(channel_id)) = (user_id, channel_id) else {
                warn!(id = %interaction.id, "interaction has no user or channel, rejecting");
                return;
            };

            match session.user_channel_permissions(&user_id, &channel_id).await {
                Ok(perms) if perms.contains(Permissions::ADMINISTRATOR) => {
                    next.run(session, interaction).await;
                }
                Ok(_) => {
                    debug!(user = %user_id, channel = %channel_id, "permission denied");
                    let reply = InteractionResponse::message(PERMISSION_DENIED);
                    if let Err(e) = session.respond(&interaction, reply).await {
                        error!("Failed to send permission reply: {e}");
                    }
                }
                Err(e) => {
                    error!(user = %user_id, "failed to get user permissions: {e}");
                }
            }
        },
    )
}
