//! Slash command interaction handler.

use serenity::all::{
    ChannelId, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, GuildId, Interaction, UserId,
};

use crate::bot::command::{self, stick};

use super::sticky_voice;

/// Handles the interaction_create event for the sticky voice commands.
///
/// Replies are ephemeral. Placement can take a few seconds, so the response
/// is deferred before the service is called.
pub async fn handle_interaction_create(ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    match command.data.name.as_str() {
        command::STICK => handle_stick(&ctx, &command).await,
        command::UNSTICK => handle_unstick(&ctx, &command).await,
        other => tracing::debug!("Ignoring unknown command /{}", other),
    }
}

async fn handle_stick(ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        respond(ctx, command, stick::GUILD_ONLY).await;
        return;
    };
    let Some(service) = sticky_voice(ctx).await else {
        return;
    };
    if !defer(ctx, command).await {
        return;
    }

    let invoker_channel = invoker_voice_channel(ctx, guild_id, command.user.id);
    let result = service.stick(guild_id, invoker_channel).await;

    edit(ctx, command, &stick::stick_reply(&result)).await;
}

async fn handle_unstick(ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        respond(ctx, command, stick::GUILD_ONLY).await;
        return;
    };
    let Some(service) = sticky_voice(ctx).await else {
        return;
    };
    if !defer(ctx, command).await {
        return;
    }

    let result = service.unstick(guild_id).await;
    if let Err(e) = &result {
        tracing::error!("Unstick failed in guild {}: {}", guild_id, e);
    }

    edit(ctx, command, &stick::unstick_reply(&result)).await;
}

/// Voice channel the invoking member currently sits in, from the cache.
fn invoker_voice_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild.voice_states.get(&user_id)?.channel_id
}

async fn respond(ctx: &Context, command: &CommandInteraction, content: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );

    if let Err(e) = command.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to /{}: {}", command.data.name, e);
    }
}

async fn defer(ctx: &Context, command: &CommandInteraction) -> bool {
    match command.defer_ephemeral(&ctx.http).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to defer /{}: {}", command.data.name, e);
            false
        }
    }
}

async fn edit(ctx: &Context, command: &CommandInteraction, content: &str) {
    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
    {
        tracing::error!("Failed to edit response to /{}: {}", command.data.name, e);
    }
}
