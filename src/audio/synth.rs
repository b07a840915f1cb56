//! Tone synthesis capability and its rodio renderer

use std::time::Duration;

use rodio::{ChannelCount, Sample, SampleRate, Sink, Source, mixer::Mixer};

use super::tone::ToneBurst;
use crate::schedule::seconds;

/// Something that can sound a [`ToneBurst`] starting now
pub trait Synth: Send + Sync {
    /// Start the burst. Returns immediately; the burst stops on its own.
    fn play(&self, burst: ToneBurst);
}

/// Synth that mixes bursts into a rodio output
#[derive(Clone)]
pub struct RodioSynth {
    mixer: Mixer,
    sample_rate: SampleRate,
}

impl RodioSynth {
    /// Render into `mixer` at `sample_rate` Hz
    #[must_use]
    pub fn new(mixer: Mixer, sample_rate: SampleRate) -> Self {
        Self {
            mixer,
            sample_rate: sample_rate.max(1),
        }
    }
}

impl Synth for RodioSynth {
    fn play(&self, burst: ToneBurst) {
        log::debug!(
            "Synth: {} steps, {:?}, {:.3}s",
            burst.steps().len(),
            burst.waveform(),
            burst.duration()
        );
        let sink = Sink::connect_new(&self.mixer);
        sink.append(BurstSource::new(burst, self.sample_rate));
        sink.detach();
    }
}

impl std::fmt::Debug for RodioSynth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSynth")
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

/// Mono oscillator rendering one burst, sample by sample
#[derive(Debug, Clone)]
pub struct BurstSource {
    burst: ToneBurst,
    sample_rate: SampleRate,
    position: u64,
    length: u64,
    phase: f32,
}

impl BurstSource {
    /// Prepare `burst` for rendering at `sample_rate` Hz
    #[must_use]
    pub fn new(burst: ToneBurst, sample_rate: SampleRate) -> Self {
        let sample_rate = sample_rate.max(1);
        let length = (burst.duration() * f64::from(sample_rate)).ceil() as u64;
        Self {
            burst,
            sample_rate,
            position: 0,
            length,
            phase: 0.0,
        }
    }
}

impl Iterator for BurstSource {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.position >= self.length {
            return None;
        }

        let time = self.position as f64 / f64::from(self.sample_rate);
        let value = self.burst.waveform().sample(self.phase) * self.burst.gain_at(time);

        let frequency = self.burst.frequency_at(time);
        self.phase = (self.phase + frequency / self.sample_rate as f32).fract();
        self.position += 1;

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.length - self.position) as usize;
        (remaining, Some(remaining))
    }
}

impl Source for BurstSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> ChannelCount {
        1
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(seconds(self.burst.duration()))
    }
}
