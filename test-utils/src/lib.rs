//! Sticky Voice Test Utils
//!
//! Provides shared testing utilities for the sticky voice bot. Discord state is
//! modelled with real Serenity structs built from JSON, the same shape the
//! gateway delivers, so permission and occupancy logic can be tested against a
//! guild without a live connection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use serenity::all::Permissions;
//! use test_utils::serenity::{
//!     create_test_guild, create_test_member, create_test_role, create_test_voice_channel,
//! };
//!
//! let mut guild = create_test_guild(1, "Test Guild");
//! let everyone = create_test_role(1, "@everyone", Permissions::VIEW_CHANNEL | Permissions::CONNECT);
//! guild.roles.insert(everyone.id, everyone);
//!
//! let channel = create_test_voice_channel(10, 1, "Lounge", None);
//! guild.channels.insert(channel.id, channel);
//!
//! let bot = create_test_member(500, 1, "bot", &[]);
//! ```

pub mod serenity;
