//! Host capabilities handed to the player at construction

use std::sync::Arc;

use crate::audio::{AudioOutput, ClipLoader, NoOutput, Synth};
use crate::config::PlayerConfig;
use crate::schedule::{Scheduler, TimerThread};

/// Everything a [`SoundPlayer`](crate::player::SoundPlayer) needs from the host
pub struct Platform {
    /// Tone synthesis, absent when the host cannot synthesize
    pub synth: Option<Arc<dyn Synth>>,
    /// Clip playback
    pub clips: Arc<dyn ClipLoader>,
    /// Timers for effect completion
    pub scheduler: Arc<dyn Scheduler>,
    /// Keeps the device stream open
    output: Option<AudioOutput>,
}

impl Platform {
    /// Assemble a platform from explicit capabilities
    pub fn new(
        synth: Option<Arc<dyn Synth>>,
        clips: Arc<dyn ClipLoader>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            synth,
            clips,
            scheduler,
            output: None,
        }
    }

    /// Open the default output device and a timer thread.
    ///
    /// Without a device the platform has no synth and every clip load fails
    /// with [`AudioError::NoDevice`](crate::audio::AudioError::NoDevice).
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread cannot be spawned
    pub fn open(config: &PlayerConfig) -> std::io::Result<Self> {
        let scheduler: Arc<dyn Scheduler> = Arc::new(TimerThread::spawn()?);

        match AudioOutput::open_default() {
            Ok(output) => {
                let synth = output.synth(config.sample_rate);
                let clips = output.clips(&config.asset_dir);
                Ok(Self {
                    synth: Some(Arc::new(synth)),
                    clips: Arc::new(clips),
                    scheduler,
                    output: Some(output),
                })
            }
            Err(e) => {
                log::warn!("{e}; sound effects are disabled");
                Ok(Self::new(None, Arc::new(NoOutput), scheduler))
            }
        }
    }

    /// Check if a device stream is held open
    #[must_use]
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("synth", &self.synth.is_some())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
