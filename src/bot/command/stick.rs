//! `/stick` and `/unstick` commands.

use serenity::all::CreateCommand;

use crate::error::voice::VoiceError;
use crate::model::voice::{Placement, StickDenial, StickPlacement, UnstickOutcome};

use super::{STICK, UNSTICK};

pub const GUILD_ONLY: &str = "This command is only available in a server.";

pub fn create_stick_command() -> CreateCommand {
    CreateCommand::new(STICK)
        .description("Join your current voice channel and stay there")
}

pub fn create_unstick_command() -> CreateCommand {
    CreateCommand::new(UNSTICK)
        .description("Leave voice and stop reconnecting")
}

/// Reply text for a `/stick` result.
pub fn stick_reply(result: &Result<StickPlacement, StickDenial>) -> String {
    match result {
        Ok(placed) => {
            let verb = match placed.placement {
                Placement::Connected => "Joined",
                Placement::Moved => "Moved to",
                Placement::AlreadyPresent => "Already in",
            };
            format!(
                "{} **{}** and will stay there (muted).",
                verb, placed.channel_name
            )
        }
        Err(StickDenial::NotInVoice) => {
            "Join a voice channel and run the command again.".to_string()
        }
        Err(StickDenial::NotConnectable) => "That is not a voice channel.".to_string(),
        Err(StickDenial::PermissionDenied(reason)) => format!("Can't connect: {}.", reason),
        Err(StickDenial::ConnectFailed) => {
            "Couldn't connect to the voice channel, try again later.".to_string()
        }
    }
}

/// Reply text for an `/unstick` result.
pub fn unstick_reply(result: &Result<UnstickOutcome, VoiceError>) -> String {
    match result {
        Ok(UnstickOutcome {
            was_connected: true,
        }) => "Disconnected, sticky mode is off.".to_string(),
        Ok(UnstickOutcome {
            was_connected: false,
        }) => "I'm not in a voice channel. Sticky mode is off.".to_string(),
        Err(_) => "Sticky mode is off, but leaving the voice channel failed.".to_string(),
    }
}
