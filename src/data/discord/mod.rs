pub mod channel;

#[cfg(test)]
mod test;

pub use channel::{CacheVoiceDirectory, VoiceDirectory};
