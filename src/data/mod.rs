//! Data access layer.
//!
//! Holds the in-memory sticky session store, the Discord cache view used to
//! resolve voice channels, and the songbird-backed voice transport. Nothing in
//! this layer makes policy decisions; it only reads and performs.

pub mod discord;
pub mod voice;
