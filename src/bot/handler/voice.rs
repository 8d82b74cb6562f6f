//! Voice state event handler.
//!
//! Only updates for the bot's own member are relevant; they are forwarded to
//! the sticky voice service, which decides whether a reconnection is needed.

use serenity::all::{Context, VoiceState};

use super::sticky_voice;

/// Handles the voice_state_update event.
///
/// # Arguments
/// - `ctx` - Discord context holding the cache and client data
/// - `_old` - Previous voice state if cached (unused)
/// - `new` - New voice state
pub async fn handle_voice_state_update(ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
    let bot_id = ctx.cache.current_user().id;
    if new.user_id != bot_id {
        return;
    }

    let Some(guild_id) = new.guild_id else {
        return;
    };

    tracing::debug!(
        "Bot voice state in guild {} is now {:?}",
        guild_id,
        new.channel_id
    );

    let Some(service) = sticky_voice(&ctx).await else {
        return;
    };

    service.handle_voice_state(guild_id, new.channel_id).await;
}
