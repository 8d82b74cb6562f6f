use std::collections::HashMap;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};
use serenity::async_trait;
use songbird::error::JoinResult;
use songbird::input::{Input, RawAdapter};
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Call, Driver, Songbird};
use tokio::sync::Mutex;

use crate::data::voice::keepalive::{KeepAliveTone, KEEPALIVE_CHANNELS, KEEPALIVE_SAMPLE_RATE};
use crate::error::voice::TransportError;

/// Physical voice operations for the bot's own connection in a guild.
///
/// Implementations perform exactly one operation per call and never retry;
/// retry policy belongs to the reconnection supervisor.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Channel the live connection is attached to, if any.
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId>;

    /// Opens a fresh connection requesting self-muted and self-deafened state.
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId)
        -> Result<(), TransportError>;

    /// Moves the live connection to another channel.
    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId)
        -> Result<(), TransportError>;

    /// Forcibly closes the connection.
    ///
    /// # Returns
    /// - `Ok(true)` - A live connection was closed
    /// - `Ok(false)` - There was nothing to close
    async fn disconnect(&self, guild_id: GuildId) -> Result<bool, TransportError>;

    /// Re-asserts self-mute and self-deafen on the live connection.
    async fn ensure_self_muted(&self, guild_id: GuildId) -> Result<(), TransportError>;

    /// Whether the live connection is currently carrying a stream.
    async fn is_streaming(&self, guild_id: GuildId) -> bool;

    /// Starts the keep-alive payload on the live connection.
    async fn start_keepalive(&self, guild_id: GuildId) -> Result<(), TransportError>;
}

/// Voice transport backed by songbird.
///
/// Tracks the keep-alive handle per guild so the stream state can be queried
/// and dropped together with the connection.
pub struct SongbirdTransport {
    manager: Arc<Songbird>,
    keepalive: Mutex<HashMap<GuildId, TrackHandle>>,
}

impl SongbirdTransport {
    /// Creates a transport over the songbird manager registered with the client.
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self {
            manager,
            keepalive: Mutex::new(HashMap::new()),
        }
    }

    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), TransportError> {
        self.manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| TransportError::new(format!("join failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        let call = self.manager.get(guild_id)?;
        let channel = call.lock().await.current_channel();
        channel.map(|channel| ChannelId::new(channel.0.get()))
    }

    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), TransportError> {
        // The flags are stored on the call and sent with the join. The update
        // itself fails while no channel is joined yet.
        {
            let call = self.manager.get_or_insert(guild_id);
            let mut call = call.lock().await;
            if let Err(e) = self_mute(&mut call).await {
                tracing::debug!(
                    "Self-mute stored before joining in guild {}: {}",
                    guild_id,
                    e
                );
            }
        }

        self.join(guild_id, channel_id).await
    }

    async fn move_to(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), TransportError> {
        self.join(guild_id, channel_id).await
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<bool, TransportError> {
        self.keepalive.lock().await.remove(&guild_id);

        if self.manager.get(guild_id).is_none() {
            return Ok(false);
        }

        let was_connected = self.current_channel(guild_id).await.is_some();

        self.manager
            .remove(guild_id)
            .await
            .map_err(|e| TransportError::new(format!("leave failed: {}", e)))?;

        Ok(was_connected)
    }

    async fn ensure_self_muted(&self, guild_id: GuildId) -> Result<(), TransportError> {
        let Some(call) = self.manager.get(guild_id) else {
            return Ok(());
        };
        let mut call = call.lock().await;

        if call.current_channel().is_none() || is_self_muted(&call) {
            return Ok(());
        }

        self_mute(&mut call)
            .await
            .map_err(|e| TransportError::new(format!("self-mute failed: {}", e)))
    }

    async fn is_streaming(&self, guild_id: GuildId) -> bool {
        let handle = self.keepalive.lock().await.get(&guild_id).cloned();
        let Some(handle) = handle else {
            return false;
        };

        match handle.get_info().await {
            Ok(state) => matches!(state.playing, PlayMode::Play),
            Err(e) => {
                tracing::debug!("Keep-alive track in guild {} is gone: {}", guild_id, e);
                false
            }
        }
    }

    async fn start_keepalive(&self, guild_id: GuildId) -> Result<(), TransportError> {
        let call = self
            .manager
            .get(guild_id)
            .ok_or_else(|| TransportError::new("no voice connection"))?;

        let input: Input = RawAdapter::new(
            KeepAliveTone::new(),
            KEEPALIVE_SAMPLE_RATE,
            KEEPALIVE_CHANNELS,
        )
        .into();

        let handle = {
            let mut call = call.lock().await;
            if call.current_channel().is_none() {
                return Err(TransportError::new("no voice connection"));
            }
            call.play_input(input)
        };

        if let Some(previous) = self.keepalive.lock().await.insert(guild_id, handle) {
            let _ = previous.stop();
        }

        Ok(())
    }
}

/// Sets the gateway self-mute and self-deafen flags on a call.
///
/// `Call::mute` also mutes the driver, whose mixer then stops sending packets
/// and would swallow the keep-alive payload. The driver is unmuted again so
/// only the gateway flag remains.
async fn self_mute(call: &mut Call) -> JoinResult<()> {
    let muted = call.mute(true).await;
    let deafened = call.deafen(true).await;

    let driver: &mut Driver = call;
    driver.mute(false);

    muted.and(deafened)
}

/// Whether the gateway flags are set and the driver still sends audio.
fn is_self_muted(call: &Call) -> bool {
    let driver: &Driver = call;
    call.is_mute() && call.is_deaf() && !driver.is_mute()
}
