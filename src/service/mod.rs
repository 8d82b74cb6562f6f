//! Service layer for the sticky voice subsystem.
//!
//! Services hold the policy: which channel the bot must occupy, when to retry,
//! when to give up, and who hears about it. They work with domain models from
//! `model` and reach Discord only through the traits in `data`.

pub mod notify;
pub mod voice;
