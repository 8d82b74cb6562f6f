//! Discord bot integration for sticky voice presence.
//!
//! This module wires the sticky voice service into the Discord gateway. The
//! bot listens for its own voice state changes to drive reconnection, and
//! exposes `/stick` and `/unstick` slash commands to place it in a channel or
//! release it.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild, channel, and role data for permission resolution
//! - `GUILD_VOICE_STATES` - Voice state updates for the bot and for occupancy
//!
//! Neither intent is privileged.

pub mod command;
pub mod handler;
pub mod start;
