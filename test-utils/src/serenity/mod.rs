//! Test factories for creating Serenity API objects.
//!
//! This module provides factory functions for creating mock Serenity structs
//! (Guild, Role, Channel, Member, VoiceState) for testing purposes. These
//! factories create valid Serenity objects by deserializing JSON, simulating
//! what Discord's gateway would deliver.
//!
//! # Available Factories
//!
//! - `guild::create_test_guild` - Create Serenity Guild objects
//! - `role::create_test_role` - Create Serenity Role objects with permissions
//! - `channel::create_test_voice_channel` - Create voice channels
//! - `channel::create_test_stage_channel` - Create stage channels
//! - `channel::create_test_text_channel` - Create text channels
//! - `channel::deny_role_permissions` - Add a role overwrite to a channel
//! - `member::create_test_member` - Create guild members
//! - `voice_state::create_test_voice_state` - Create voice states

pub mod channel;
pub mod guild;
pub mod member;
pub mod role;
pub mod voice_state;

pub use channel::{
    create_test_stage_channel, create_test_text_channel, create_test_voice_channel,
    deny_role_permissions,
};
pub use guild::create_test_guild;
pub use member::create_test_member;
pub use role::create_test_role;
pub use voice_state::create_test_voice_state;
