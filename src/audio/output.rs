//! Audio output device

use std::path::PathBuf;

use rodio::{OutputStream, OutputStreamBuilder, SampleRate, mixer::Mixer};

use super::clip::{AudioError, RodioClips};
use super::synth::RodioSynth;

/// The default output device, open for as long as this value lives
pub struct AudioOutput {
    /// The output stream (must be kept alive)
    _stream: OutputStream,
    /// The mixer every synth and clip plays into
    mixer: Mixer,
}

impl AudioOutput {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        stream.log_on_drop(false);
        let mixer = stream.mixer().clone();
        log::info!("Opened audio output");

        Ok(Self {
            _stream: stream,
            mixer,
        })
    }

    /// A synth rendering at `sample_rate` Hz into this output
    #[must_use]
    pub fn synth(&self, sample_rate: SampleRate) -> RodioSynth {
        RodioSynth::new(self.mixer.clone(), sample_rate)
    }

    /// A clip loader resolving assets under `root`
    #[must_use]
    pub fn clips(&self, root: impl Into<PathBuf>) -> RodioClips {
        RodioClips::new(self.mixer.clone(), root)
    }
}

impl std::fmt::Debug for AudioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioOutput").finish_non_exhaustive()
    }
}
