use crate::data::discord::channel::snapshot_voice_channel;
use crate::model::voice::VoiceChannelKind;
use serenity::all::{ChannelId, Guild, Member, Permissions};
use test_utils::serenity::{
    create_test_guild, create_test_member, create_test_role, create_test_stage_channel,
    create_test_text_channel, create_test_voice_channel, create_test_voice_state,
    deny_role_permissions,
};


const GUILD_ID: u64 = 1;
const BOT_ID: u64 = 500;
const BOT_ROLE_ID: u64 = 20;
const VOICE_ID: u64 = 10;

/// Guild where `@everyone` can view and connect, with one voice channel and
/// the bot as a member holding one extra role.
fn guild_with_bot() -> (Guild, Member) {
    let mut guild = create_test_guild(GUILD_ID, "Test Guild");

    let everyone = create_test_role(
        GUILD_ID,
        "@everyone",
        Permissions::VIEW_CHANNEL | Permissions::CONNECT,
    );
    guild.roles.insert(everyone.id, everyone);
    let bot_role = create_test_role(BOT_ROLE_ID, "Bot", Permissions::empty());
    guild.roles.insert(bot_role.id, bot_role);

    let channel = create_test_voice_channel(VOICE_ID, GUILD_ID, "Lounge", None);
    guild.channels.insert(channel.id, channel);

    let bot = create_test_member(BOT_ID, GUILD_ID, "sticky", &[BOT_ROLE_ID]);
    guild.members.insert(bot.user.id, bot.clone());

    (guild, bot)
}

fn add_voice_state(guild: &mut Guild, user_id: u64, channel_id: u64) {
    let state = create_test_voice_state(user_id, GUILD_ID, Some(channel_id));
    guild.voice_states.insert(state.user_id, state);
}
