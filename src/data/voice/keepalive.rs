//! Keep-alive audio source.
//!
//! An idle voice connection that sends nothing can be reclaimed by the remote
//! side. [`KeepAliveTone`] is an endless stream of very low amplitude PCM that is
//! inaudible but never encodes to pure silence, so the connection always has a
//! live payload while the bot sits in a channel.

use std::io::{self, Read, Seek, SeekFrom};

use symphonia_core::io::MediaSource;

/// Sample rate of the keep-alive stream in Hz.
pub const KEEPALIVE_SAMPLE_RATE: u32 = 48_000;
/// Interleaved channel count of the keep-alive stream.
pub const KEEPALIVE_CHANNELS: u32 = 2;

/// Peak amplitude of the tone, far below audibility.
const AMPLITUDE: f32 = 1.0e-4;

const BYTES_PER_SAMPLE: u64 = 4;

/// Endless raw `f32` little-endian PCM square wave at [`AMPLITUDE`].
///
/// The sign flips every stereo frame. Reads may end mid-sample; the next read
/// continues from the exact byte where the previous one stopped.
#[derive(Debug, Default)]
pub struct KeepAliveTone {
    position: u64,
}

impl KeepAliveTone {
    pub fn new() -> Self {
        Self::default()
    }

    fn sample(index: u64) -> f32 {
        let frame = index / KEEPALIVE_CHANNELS as u64;
        if frame % 2 == 0 {
            AMPLITUDE
        } else {
            -AMPLITUDE
        }
    }
}

impl Read for KeepAliveTone {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for byte in buf.iter_mut() {
            let sample = Self::sample(self.position / BYTES_PER_SAMPLE);
            *byte = sample.to_le_bytes()[(self.position % BYTES_PER_SAMPLE) as usize];
            self.position += 1;
        }
        Ok(buf.len())
    }
}

impl Seek for KeepAliveTone {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "keep-alive tone is an endless stream",
        ))
    }
}

impl MediaSource for KeepAliveTone {
    fn is_seekable(&self) -> bool {
        false
    }

    fn byte_len(&self) -> Option<u64> {
        None
    }
}
