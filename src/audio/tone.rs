//! Note sequences and the tone bursts built from them
//!
//! A [`ToneBurst`] is the complete schedule for one oscillator: waveform,
//! gain envelope and the frequency changes over its lifetime. Synth backends
//! only render it.

use super::pitch::PianoKey;

/// Gain reached at the end of an ease-out
pub const EASE_OUT_FLOOR: f32 = 0.01;

/// Length of the ease-out ramp, in seconds
pub const EASE_OUT_WINDOW: f64 = 0.1;

/// Frequency an oscillator runs at before its first scheduled change
pub const DEFAULT_FREQUENCY: f32 = 440.0;

/// Shape of the oscillator signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    /// Pure sine tone
    #[default]
    Sine,
    /// Square wave
    Square,
    /// Triangle wave
    Triangle,
    /// Rising sawtooth
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase`, a fraction of one period in `[0, 1)`.
    ///
    /// All shapes start at zero (or their rising edge) and peak at ±1.
    #[must_use]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Self::Sine => (std::f32::consts::TAU * phase).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => {
                let shifted = (phase + 0.25).fract();
                1.0 - 4.0 * (shifted - 0.5).abs()
            }
            Self::Sawtooth => 2.0 * (phase + 0.5).fract() - 1.0,
        }
    }
}

/// One note of a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Piano key to sound
    pub key: PianoKey,
    /// How long the key sounds, in seconds
    pub duration: f64,
}

impl Note {
    /// Create a note
    #[must_use]
    pub const fn new(key: PianoKey, duration: f64) -> Self {
        Self { key, duration }
    }
}

/// Total length of a note sequence, in seconds
#[must_use]
pub fn total_duration(notes: &[Note]) -> f64 {
    notes.iter().map(|note| note.duration).sum()
}

/// How a sequence is voiced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneOptions {
    /// Oscillator shape
    pub waveform: Waveform,
    /// Ramp down to [`EASE_OUT_FLOOR`] during the final [`EASE_OUT_WINDOW`]
    pub ease_out: bool,
    /// Gain while the burst sounds, nominally in `[0.1, 1]`
    pub volume: f32,
}

impl Default for ToneOptions {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            ease_out: true,
            volume: 0.1,
        }
    }
}

impl ToneOptions {
    /// Set the waveform
    #[must_use]
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Enable or disable the ease-out ramp
    #[must_use]
    pub fn with_ease_out(mut self, ease_out: bool) -> Self {
        self.ease_out = ease_out;
        self
    }

    /// Set the volume. Not clamped; out of range values reach the backend as is.
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

/// A frequency change at an offset from the start of a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyStep {
    /// Seconds from the start of the burst
    pub offset: f64,
    /// New frequency in Hz
    pub frequency: f32,
}

/// One synthesized sound: a single oscillator through a single gain stage
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBurst {
    waveform: Waveform,
    volume: f32,
    ease_out: bool,
    steps: Vec<FrequencyStep>,
    duration: f64,
}

impl ToneBurst {
    /// Schedule `notes` back to back, each at the cumulative offset of the
    /// notes before it.
    #[must_use]
    pub fn new(notes: &[Note], options: ToneOptions) -> Self {
        let mut offset = 0.0;
        let steps = notes
            .iter()
            .map(|note| {
                let step = FrequencyStep {
                    offset,
                    frequency: note.key.frequency(),
                };
                offset += note.duration;
                step
            })
            .collect();

        Self {
            waveform: options.waveform,
            volume: options.volume,
            ease_out: options.ease_out,
            steps,
            duration: offset,
        }
    }

    /// Oscillator shape
    #[must_use]
    pub const fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Gain before any ease-out
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether the burst eases out
    #[must_use]
    pub const fn eases_out(&self) -> bool {
        self.ease_out
    }

    /// Scheduled frequency changes, in order
    #[must_use]
    pub fn steps(&self) -> &[FrequencyStep] {
        &self.steps
    }

    /// Time from start to stop, in seconds
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Check if the burst has no notes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Frequency at `time` seconds. A later step at the same offset wins.
    #[must_use]
    pub fn frequency_at(&self, time: f64) -> f32 {
        let upto = self.steps.partition_point(|step| step.offset <= time);
        upto.checked_sub(1)
            .map_or(DEFAULT_FREQUENCY, |last| self.steps[last].frequency)
    }

    /// Gain at `time` seconds; zero once the burst has stopped
    #[must_use]
    pub fn gain_at(&self, time: f64) -> f32 {
        if time < 0.0 || time >= self.duration {
            return 0.0;
        }
        if !self.ease_out || self.volume <= 0.0 {
            return self.volume;
        }

        let ramp_start = (self.duration - EASE_OUT_WINDOW).max(0.0);
        if time <= ramp_start {
            return self.volume;
        }
        let progress = ((time - ramp_start) / (self.duration - ramp_start)) as f32;
        self.volume * (EASE_OUT_FLOOR / self.volume).powf(progress)
    }
}
