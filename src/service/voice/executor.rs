use serenity::all::{ChannelId, GuildId};

use crate::data::voice::transport::VoiceTransport;
use crate::error::voice::VoiceError;
use crate::model::voice::Placement;
use crate::service::voice::keepalive::KeepAliveEmitter;

/// Performs a single physical placement against the voice transport.
///
/// The executor compares where the connection is with where it must be and
/// issues at most one connect or move. It never retries; the caller decides
/// what a failure means.
pub struct ConnectionExecutor<'a> {
    transport: &'a dyn VoiceTransport,
}

impl<'a> ConnectionExecutor<'a> {
    pub fn new(transport: &'a dyn VoiceTransport) -> Self {
        Self { transport }
    }

    /// Places the bot in `target`.
    ///
    /// After a successful placement self-mute and self-deafen are re-asserted
    /// and the keep-alive payload is ensured. Failures of those follow-ups are
    /// logged but do not fail the placement.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the connection
    /// - `target` - Channel the bot must occupy
    ///
    /// # Returns
    /// - `Ok(Placement)` - Operation that was performed
    /// - `Err(VoiceError::Transport)` - Connect or move failed
    pub async fn place(
        &self,
        guild_id: GuildId,
        target: ChannelId,
    ) -> Result<Placement, VoiceError> {
        let placement = match self.transport.current_channel(guild_id).await {
            None => {
                self.transport.connect(guild_id, target).await?;
                Placement::Connected
            }
            Some(current) if current == target => Placement::AlreadyPresent,
            Some(current) => {
                tracing::debug!(
                    "Moving voice connection in guild {} from {} to {}",
                    guild_id,
                    current,
                    target
                );
                self.transport.move_to(guild_id, target).await?;
                Placement::Moved
            }
        };

        if let Err(e) = self.transport.ensure_self_muted(guild_id).await {
            tracing::warn!(
                "Failed to re-assert self-mute in guild {}: {}",
                guild_id,
                e
            );
        }

        KeepAliveEmitter::new(self.transport).ensure(guild_id).await;

        Ok(placement)
    }
}
