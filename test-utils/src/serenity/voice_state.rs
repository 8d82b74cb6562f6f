//! Test factory for creating Serenity VoiceState objects.

use serenity::all::VoiceState;

/// Creates a test voice state.
///
/// # Arguments
/// - `user_id` - User the state belongs to
/// - `guild_id` - Guild of the voice connection
/// - `channel_id` - Channel the user sits in, `None` when disconnected
///
/// # Panics
/// - If the JSON cannot be deserialized into a VoiceState (indicates invalid test data)
pub fn create_test_voice_state(user_id: u64, guild_id: u64, channel_id: Option<u64>) -> VoiceState {
    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "channel_id": channel_id.map(|id| id.to_string()),
        "user_id": user_id.to_string(),
        "session_id": format!("session-{}", user_id),
        "deaf": false,
        "mute": false,
        "self_deaf": false,
        "self_mute": false,
        "self_stream": false,
        "self_video": false,
        "suppress": false,
        "request_to_speak_timestamp": null,
    }))
    .expect("Failed to create test voice state - invalid JSON structure")
}
