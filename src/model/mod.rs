//! Domain models shared across the data, service, and bot layers.

pub mod voice;
