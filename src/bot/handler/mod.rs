use serenity::all::{Context, GuildId, Interaction, Ready, VoiceState};
use serenity::async_trait;
use serenity::prelude::EventHandler;

use crate::bot::start::StickyVoiceKey;
use crate::service::voice::StickyVoiceService;

pub mod interaction;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    /// Guild to register commands in; global registration when `None`.
    pub command_guild: Option<GuildId>,
}

impl Handler {
    pub fn new(command_guild: Option<GuildId>) -> Self {
        Self { command_guild }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, self.command_guild).await;
    }

    /// Called when a member's voice state changes, including the bot's own
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(ctx, old, new).await;
    }

    /// Called when a slash command is invoked
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction_create(ctx, interaction).await;
    }
}

/// Gets the sticky voice service from the client data.
async fn sticky_voice(ctx: &Context) -> Option<StickyVoiceService> {
    let data = ctx.data.read().await;
    let service = data.get::<StickyVoiceKey>().cloned();
    if service.is_none() {
        tracing::error!("Sticky voice service not found in client data");
    }
    service
}
