//! Slash command definitions and registration.

pub mod stick;

use serenity::all::{Command, CreateCommand, GuildId};
use serenity::http::Http;

pub const STICK: &str = "stick";
pub const UNSTICK: &str = "unstick";

/// Every slash command the bot exposes.
pub fn commands() -> Vec<CreateCommand> {
    vec![stick::create_stick_command(), stick::create_unstick_command()]
}

/// Registers the slash commands.
///
/// Guild registration takes effect immediately and is meant for development;
/// global registration can take a while to propagate.
///
/// # Arguments
/// - `http` - Discord HTTP client
/// - `guild_id` - Guild to register in, global when `None`
pub async fn register_commands(
    http: &Http,
    guild_id: Option<GuildId>,
) -> Result<(), serenity::Error> {
    match guild_id {
        Some(guild_id) => {
            guild_id.set_commands(http, commands()).await?;
            tracing::info!("Registered slash commands in guild {}", guild_id);
        }
        None => {
            Command::set_global_commands(http, commands()).await?;
            tracing::info!("Registered global slash commands");
        }
    }

    Ok(())
}
