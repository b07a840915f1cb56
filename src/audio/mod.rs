//! Audio capabilities for sound effects
//!
//! Built on top of the rodio audio library. Tone synthesis and clip
//! playback sit behind the [`Synth`] and [`ClipLoader`] traits so a host
//! without audio, or a test, can supply its own.

mod clip;
mod output;
mod pitch;
mod synth;
mod tone;

pub use clip::{AudioError, Clip, ClipLoader, NoOutput, RodioClip, RodioClips};
pub use output::AudioOutput;
pub use pitch::PianoKey;
pub use synth::{BurstSource, RodioSynth, Synth};
pub use tone::{
    DEFAULT_FREQUENCY, EASE_OUT_FLOOR, EASE_OUT_WINDOW, FrequencyStep, Note, ToneBurst,
    ToneOptions, Waveform, total_duration,
};
