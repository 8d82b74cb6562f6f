//! Ready event handler for bot initialization.
//!
//! The ready handler logs the connection and registers the slash commands,
//! either in the configured guild or globally.

use serenity::all::{Context, GuildId, Ready};

use crate::bot::command;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context for command registration
/// - `ready` - Ready event data containing bot user information
/// - `command_guild` - Guild to register commands in, global when `None`
pub async fn handle_ready(ctx: Context, ready: Ready, command_guild: Option<GuildId>) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    if let Err(e) = command::register_commands(&ctx.http, command_guild).await {
        tracing::error!("Failed to register slash commands: {}", e);
    }
}
