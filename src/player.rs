//! Sound effects for the spin-to-win screen
//!
//! Every effect returns a [`Completion`] that a timer resolves; nothing waits
//! on the audio itself. Effects do not cancel each other and overlap freely.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::audio::{
    AudioError, Clip, Note, PianoKey, ToneBurst, ToneOptions, Waveform, total_duration,
};
use crate::config::PlayerConfig;
use crate::platform::Platform;
use crate::schedule::{Completion, Repeat, seconds};

/// Ascending win chime
pub const WIN_NOTES: [Note; 6] = [
    Note::new(PianoKey::C4, 0.175),
    Note::new(PianoKey::D4, 0.175),
    Note::new(PianoKey::E4, 0.175),
    Note::new(PianoKey::G4, 0.275),
    Note::new(PianoKey::E4, 0.15),
    Note::new(PianoKey::G4, 0.9),
];

/// One cycle of the spin tick
pub const SPIN_NOTES: [Note; 3] = [
    Note::new(PianoKey::A_SHARP4, 0.1),
    Note::new(PianoKey::A_SHARP3, 0.1),
    Note::new(PianoKey::A3, 0.1),
];

/// Spin ticks run above unity gain and rely on the output to clamp
const SPIN_VOLUME: f32 = 2.0;

/// Most notes a single spin tick burst holds: one hour of ticking
pub const MAX_SPIN_NOTES: usize = 36_000;

/// Build the spin tick sequence for `duration_secs`: one 0.1s note per
/// tenth of a second, cycling through [`SPIN_NOTES`], at most
/// [`MAX_SPIN_NOTES`] long
#[must_use]
pub fn spin_sequence(duration_secs: f64) -> Vec<Note> {
    let count = ((duration_secs * 10.0).floor() as usize).min(MAX_SPIN_NOTES);
    SPIN_NOTES.iter().copied().cycle().take(count).collect()
}

/// Plays the game's sound effects
pub struct SoundPlayer {
    platform: Platform,
    muted: bool,
    win_clip: PathBuf,
    spin_clip: PathBuf,
    clip_poll: Duration,
}

impl SoundPlayer {
    /// Create an unmuted player with default settings
    pub fn new(platform: Platform) -> Self {
        Self::from_config(platform, &PlayerConfig::default())
    }

    /// Create a player from a config
    pub fn from_config(platform: Platform, config: &PlayerConfig) -> Self {
        if platform.synth.is_none() {
            log::debug!("No synth available; tone effects are silent");
        }
        Self {
            platform,
            muted: config.muted,
            win_clip: config.win_clip.clone(),
            spin_clip: config.spin_clip.clone(),
            clip_poll: config.clip_poll_interval(),
        }
    }

    /// Set the initial mute state
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Mute or unmute. Effects already playing are not affected.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Check if the player is muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Sound `notes` as one burst. Silent without a synth.
    pub(crate) fn play_tones(&self, notes: &[Note], options: ToneOptions) {
        let Some(synth) = &self.platform.synth else {
            return;
        };
        synth.play(ToneBurst::new(notes, options));
    }

    fn resolve_after(&self, delay: Duration) -> Completion {
        let (resolver, completion) = Completion::pending();
        self.platform
            .scheduler
            .schedule(delay, Box::new(move || resolver.resolve(true)));
        completion
    }

    /// Play the win chime. Resolves `true` once the chime's length has passed.
    pub fn win(&self) -> Completion {
        if self.muted {
            return Completion::resolved(false);
        }

        let options = ToneOptions::default()
            .with_waveform(Waveform::Triangle)
            .with_volume(1.0)
            .with_ease_out(true);
        self.play_tones(&WIN_NOTES, options);

        self.resolve_after(seconds(total_duration(&WIN_NOTES)))
    }

    /// Tick for `duration_secs`.
    ///
    /// Resolves `true` after a single tick cycle (0.3s), however long the
    /// ticking itself lasts.
    pub fn spin(&self, duration_secs: f64) -> Completion {
        if self.muted {
            return Completion::resolved(false);
        }

        let options = ToneOptions::default()
            .with_waveform(Waveform::Triangle)
            .with_ease_out(false)
            .with_volume(SPIN_VOLUME);
        self.play_tones(&spin_sequence(duration_secs), options);

        self.resolve_after(seconds(total_duration(&SPIN_NOTES)))
    }

    /// Play the recorded win clip. Resolves `true` after the clip's length,
    /// or right away if the length is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the clip cannot be loaded
    pub fn win_sound(&self) -> Result<Completion, AudioError> {
        if self.muted {
            return Ok(Completion::resolved(false));
        }

        let mut clip = self.platform.clips.load(&self.win_clip)?;
        clip.play();
        let length = clip.duration().unwrap_or(Duration::ZERO);

        let (resolver, completion) = Completion::pending();
        self.platform.scheduler.schedule(
            length,
            Box::new(move || {
                clip.release();
                resolver.resolve(true);
            }),
        );
        Ok(completion)
    }

    /// Loop the recorded spin clip for `duration_secs`, restarting it from
    /// the top whenever it ends. At the deadline the clip is paused and
    /// rewound, then the completion resolves `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clip cannot be loaded
    pub fn spin_sound(&self, duration_secs: f64) -> Result<Completion, AudioError> {
        if self.muted {
            return Ok(Completion::resolved(false));
        }

        let mut clip = self.platform.clips.load(&self.spin_clip)?;
        clip.play();

        let clip = Arc::new(Mutex::new(clip));
        let looping = Arc::clone(&clip);
        let (resolver, completion) = Completion::pending();

        Repeat::until(
            Arc::clone(&self.platform.scheduler),
            self.clip_poll,
            seconds(duration_secs),
            move || {
                let mut clip = looping.lock().unwrap_or_else(PoisonError::into_inner);
                if clip.has_ended() {
                    clip.rewind();
                    clip.play();
                }
            },
            move || {
                stop(&clip);
                resolver.resolve(true);
            },
        );
        Ok(completion)
    }
}

fn stop(clip: &Mutex<Box<dyn Clip>>) {
    let mut clip = clip.lock().unwrap_or_else(PoisonError::into_inner);
    clip.pause();
    clip.rewind();
}

impl std::fmt::Debug for SoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundPlayer")
            .field("muted", &self.muted)
            .field("synth", &self.platform.synth.is_some())
            .field("win_clip", &self.win_clip)
            .field("spin_clip", &self.spin_clip)
            .finish()
    }
}
