//! Test factories for creating Serenity GuildChannel objects.

use serenity::all::{GuildChannel, PermissionOverwrite, Permissions};

const TEXT: u8 = 0;
const VOICE: u8 = 2;
const STAGE: u8 = 13;

fn create_test_channel(
    channel_id: u64,
    guild_id: u64,
    name: &str,
    kind: u8,
    user_limit: Option<u32>,
) -> GuildChannel {
    let bitrate = (kind != TEXT).then_some(64000);

    serde_json::from_value(serde_json::json!({
        "id": channel_id.to_string(),
        "guild_id": guild_id.to_string(),
        "type": kind,
        "name": name,
        "position": 0,
        "nsfw": false,
        "permission_overwrites": [],
        "user_limit": user_limit,
        "bitrate": bitrate,
        "flags": 0,
        "available_tags": [],
        "applied_tags": [],
    }))
    .expect("Failed to create test channel - invalid JSON structure")
}

/// Creates a test voice channel.
///
/// # Arguments
/// - `channel_id` - Discord channel ID (snowflake)
/// - `guild_id` - Guild the channel belongs to
/// - `name` - Channel name
/// - `user_limit` - Member cap; `None` or `Some(0)` for unlimited
pub fn create_test_voice_channel(
    channel_id: u64,
    guild_id: u64,
    name: &str,
    user_limit: Option<u32>,
) -> GuildChannel {
    create_test_channel(channel_id, guild_id, name, VOICE, user_limit)
}

/// Creates a test stage channel.
pub fn create_test_stage_channel(
    channel_id: u64,
    guild_id: u64,
    name: &str,
    user_limit: Option<u32>,
) -> GuildChannel {
    create_test_channel(channel_id, guild_id, name, STAGE, user_limit)
}

/// Creates a test text channel.
pub fn create_test_text_channel(channel_id: u64, guild_id: u64, name: &str) -> GuildChannel {
    create_test_channel(channel_id, guild_id, name, TEXT, None)
}

/// Adds a role overwrite denying `deny` on a channel.
///
/// # Panics
/// - If the JSON cannot be deserialized into a PermissionOverwrite
pub fn deny_role_permissions(channel: &mut GuildChannel, role_id: u64, deny: Permissions) {
    let overwrite: PermissionOverwrite = serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "type": 0,
        "allow": "0",
        "deny": deny.bits().to_string(),
    }))
    .expect("Failed to create test overwrite - invalid JSON structure");

    channel.permission_overwrites.push(overwrite);
}
