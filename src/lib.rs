//! Sound effects for a spin-to-win game
//!
//! This crate provides:
//! - Synthesized win and spin effects from a piano pitch table
//! - Pre-recorded win and spin clips, looped on demand
//! - Mute toggling
//! - Timer-based completion signals for every effect
//!
//! Audio goes through rodio by default; every capability can be swapped for
//! a host-specific or test implementation via [`Platform`].

pub mod audio;
pub mod config;
pub mod platform;
pub mod player;
pub mod schedule;

#[cfg(test)]
mod testing;

pub use platform::Platform;
pub use player::SoundPlayer;

// Re-exports for convenience
pub use rodio;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::audio::{AudioError, AudioOutput, PianoKey, ToneOptions, Waveform};
    pub use crate::config::PlayerConfig;
    pub use crate::platform::Platform;
    pub use crate::player::SoundPlayer;
    pub use crate::schedule::Completion;
}
