//! Voice session storage and voice transport access.

pub mod keepalive;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test;

pub use session::VoiceSessionRepository;
pub use transport::{SongbirdTransport, VoiceTransport};
