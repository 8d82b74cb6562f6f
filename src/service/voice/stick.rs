//! "Stick" command operation.

use serenity::all::{ChannelId, GuildId};

use crate::model::voice::{GateDecision, StickDenial, StickPlacement};

use super::executor::ConnectionExecutor;
use super::gate;
use super::transition::SupervisorEvent;
use super::StickyVoiceService;

impl StickyVoiceService {
    /// Places the bot in the invoker's voice channel and keeps it there.
    ///
    /// Runs the gate and a single placement synchronously. On success the
    /// guild's session is created or overwritten with zero failures and any
    /// retry scheduled for a previous target is cancelled. On failure no session
    /// is written and an existing one is left untouched.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the command was issued in
    /// - `invoker_channel` - Voice channel of the invoking member, if any
    ///
    /// # Returns
    /// - `Ok(StickPlacement)` - Bot placed and session stored
    /// - `Err(StickDenial::NotInVoice)` - Invoker is not in a voice channel
    /// - `Err(StickDenial::NotConnectable)` - Channel is not a voice or stage channel
    /// - `Err(StickDenial::PermissionDenied)` - Gate refused; the operator is notified
    /// - `Err(StickDenial::ConnectFailed)` - Lookup or transport failed
    pub async fn stick(
        &self,
        guild_id: GuildId,
        invoker_channel: Option<ChannelId>,
    ) -> Result<StickPlacement, StickDenial> {
        let channel_id = invoker_channel.ok_or(StickDenial::NotInVoice)?;

        let lock = self.guild_lock(guild_id).await;
        let _guard = lock.lock().await;

        let snapshot = match self
            .inner
            .directory
            .voice_channel(guild_id, channel_id)
            .await
        {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Err(StickDenial::NotConnectable),
            Err(e) => {
                tracing::warn!("Stick could not look up channel {}: {}", channel_id, e);
                return Err(StickDenial::ConnectFailed);
            }
        };

        if let GateDecision::Denied(reason) = gate::evaluate(&snapshot) {
            self.inner
                .notifier
                .notify(&format!(
                    "Stick: cannot connect to {} in guild {} ({})",
                    channel_id, guild_id, reason
                ))
                .await;
            return Err(StickDenial::PermissionDenied(reason));
        }

        let placement = ConnectionExecutor::new(self.inner.transport.as_ref())
            .place(guild_id, channel_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Stick failed to place bot in channel {} of guild {}: {}",
                    channel_id,
                    guild_id,
                    e
                );
                StickDenial::ConnectFailed
            })?;

        self.commit(guild_id, None, SupervisorEvent::Stuck { channel_id })
            .await;

        tracing::info!(
            "Stuck to channel {} ({}) in guild {}: {:?}",
            snapshot.name,
            snapshot.channel_id,
            guild_id,
            placement
        );

        Ok(StickPlacement {
            channel_name: snapshot.name,
            placement,
        })
    }
}
