use serenity::all::GuildId;

use crate::data::voice::transport::VoiceTransport;
use crate::model::voice::KeepAliveStatus;

/// Makes sure a live voice connection always carries a payload.
pub struct KeepAliveEmitter<'a> {
    transport: &'a dyn VoiceTransport,
}

impl<'a> KeepAliveEmitter<'a> {
    pub fn new(transport: &'a dyn VoiceTransport) -> Self {
        Self { transport }
    }

    /// Starts the keep-alive payload unless something is already streaming.
    ///
    /// Idempotent: calling it on a connection that already carries the payload
    /// (or any other stream) does nothing.
    pub async fn ensure(&self, guild_id: GuildId) -> KeepAliveStatus {
        if self.transport.current_channel(guild_id).await.is_none() {
            return KeepAliveStatus::NotConnected;
        }

        if self.transport.is_streaming(guild_id).await {
            return KeepAliveStatus::AlreadyStreaming;
        }

        match self.transport.start_keepalive(guild_id).await {
            Ok(()) => {
                tracing::debug!("Started keep-alive stream in guild {}", guild_id);
                KeepAliveStatus::Started
            }
            Err(e) => {
                tracing::warn!("Failed to start keep-alive in guild {}: {}", guild_id, e);
                KeepAliveStatus::Failed
            }
        }
    }
}
