//! "Unstick" command operation.

use serenity::all::GuildId;

use crate::error::voice::VoiceError;
use crate::model::voice::{SupervisorAction, UnstickOutcome};

use super::transition::SupervisorEvent;
use super::StickyVoiceService;

impl StickyVoiceService {
    /// Clears the guild's session and leaves voice.
    ///
    /// The session is deleted first, which aborts any scheduled retry and
    /// invalidates an attempt already in flight. The disconnect then waits for
    /// the guild lock so it lands after any placement that was mid-flight.
    ///
    /// # Returns
    /// - `Ok(UnstickOutcome)` - Whether a live connection was closed
    /// - `Err(VoiceError::Transport)` - Closing the connection failed
    pub async fn unstick(&self, guild_id: GuildId) -> Result<UnstickOutcome, VoiceError> {
        let actions = self
            .commit(guild_id, None, SupervisorEvent::Unstuck)
            .await
            .map(|applied| applied.actions)
            .unwrap_or_default();

        let mut was_connected = false;
        if actions.contains(&SupervisorAction::Disconnect) {
            let lock = self.guild_lock(guild_id).await;
            let _guard = lock.lock().await;

            was_connected = self.inner.transport.disconnect(guild_id).await?;
        }

        tracing::info!(
            "Unstuck in guild {} (was connected: {})",
            guild_id,
            was_connected
        );

        Ok(UnstickOutcome { was_connected })
    }
}
