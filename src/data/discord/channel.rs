use std::sync::Arc;

use serenity::all::{Cache, ChannelId, ChannelType, Guild, GuildId, Http, Member};
use serenity::async_trait;

use crate::error::voice::DirectoryError;
use crate::model::voice::{VoiceChannelKind, VoiceChannelSnapshot};

/// Read-only view of guild voice channels as the bot sees them.
#[async_trait]
pub trait VoiceDirectory: Send + Sync {
    /// Resolves a channel for a placement decision.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the channel belongs to
    /// - `channel_id` - Channel to resolve
    ///
    /// # Returns
    /// - `Ok(Some(VoiceChannelSnapshot))` - Channel exists and can hold a voice connection
    /// - `Ok(None)` - Channel is gone, unknown, or not a voice or stage channel
    /// - `Err(DirectoryError)` - The lookup could not be answered right now
    async fn voice_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>, DirectoryError>;
}

/// Voice directory backed by the gateway cache.
///
/// The bot's own member is read from the cache and fetched over HTTP only when
/// the cache does not hold it. A failed fetch is reported as an error so the
/// caller can retry instead of treating the channel as gone.
pub struct CacheVoiceDirectory {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl CacheVoiceDirectory {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        Self { cache, http }
    }

    async fn bot_member(&self, guild_id: GuildId) -> Result<Member, DirectoryError> {
        let bot_id = self.cache.current_user().id;

        let cached = self
            .cache
            .member(guild_id, bot_id)
            .map(|member| Member::clone(&member));
        if let Some(member) = cached {
            return Ok(member);
        }

        self.http.get_member(guild_id, bot_id).await.map_err(|e| {
            DirectoryError::new(format!(
                "failed to fetch bot member in guild {}: {}",
                guild_id, e
            ))
        })
    }

    /// An uncached guild is usually unavailable during an outage, so it is an
    /// error rather than a missing channel.
    fn snapshot(
        &self,
        guild_id: GuildId,
        bot_member: &Member,
        channel_id: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>, DirectoryError> {
        let guild = self
            .cache
            .guild(guild_id)
            .ok_or_else(|| DirectoryError::new(format!("guild {} is not cached", guild_id)))?;

        Ok(snapshot_voice_channel(&guild, bot_member, channel_id))
    }
}

#[async_trait]
impl VoiceDirectory for CacheVoiceDirectory {
    async fn voice_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>, DirectoryError> {
        let bot_member = self.bot_member(guild_id).await?;
        self.snapshot(guild_id, &bot_member, channel_id)
    }
}

/// Builds a voice channel snapshot from a guild.
///
/// Permissions are resolved for `bot_member` including role permissions and
/// channel overwrites. The user limit only applies to regular voice channels;
/// stage channels report no limit. Occupancy never counts the bot itself.
///
/// # Arguments
/// - `guild` - Guild holding the channel, its roles, and voice states
/// - `bot_member` - The bot's own member in the guild
/// - `channel_id` - Channel to snapshot
///
/// # Returns
/// - `Some(VoiceChannelSnapshot)` - Voice or stage channel found
/// - `None` - Channel missing or of another kind
pub fn snapshot_voice_channel(
    guild: &Guild,
    bot_member: &Member,
    channel_id: ChannelId,
) -> Option<VoiceChannelSnapshot> {
    let channel = guild.channels.get(&channel_id)?;

    let kind = match channel.kind {
        ChannelType::Voice => VoiceChannelKind::Voice,
        ChannelType::Stage => VoiceChannelKind::Stage,
        _ => return None,
    };

    let user_limit = match kind {
        VoiceChannelKind::Voice => channel.user_limit.filter(|limit| *limit > 0),
        VoiceChannelKind::Stage => None,
    };

    let occupancy = guild
        .voice_states
        .values()
        .filter(|state| state.channel_id == Some(channel_id))
        .filter(|state| state.user_id != bot_member.user.id)
        .count();

    Some(VoiceChannelSnapshot {
        channel_id,
        name: channel.name.clone(),
        kind,
        user_limit,
        occupancy,
        permissions: guild.user_permissions_in(channel, bot_member),
    })
}
