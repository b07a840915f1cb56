//! Recording doubles for the audio capabilities

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::audio::{AudioError, Clip, ClipLoader, Synth, ToneBurst};
use crate::config::PlayerConfig;
use crate::platform::Platform;
use crate::player::SoundPlayer;
use crate::schedule::ManualScheduler;

/// Synth that keeps every burst it is asked to play
#[derive(Default)]
pub struct RecordingSynth {
    bursts: Mutex<Vec<ToneBurst>>,
}

impl RecordingSynth {
    pub fn bursts(&self) -> Vec<ToneBurst> {
        self.bursts.lock().unwrap().clone()
    }
}

impl Synth for RecordingSynth {
    fn play(&self, burst: ToneBurst) {
        self.bursts.lock().unwrap().push(burst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEvent {
    Play,
    Pause,
    Rewind,
    Release,
}

#[derive(Default)]
struct ClipState {
    events: Vec<ClipEvent>,
    playing: bool,
    ended: bool,
    dropped: bool,
}

/// Observer side of a [`FakeClip`]
pub struct ClipMonitor {
    asset: String,
    state: Arc<Mutex<ClipState>>,
}

impl ClipMonitor {
    fn state(&self) -> MutexGuard<'_, ClipState> {
        self.state.lock().unwrap()
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn events(&self) -> Vec<ClipEvent> {
        self.state().events.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    pub fn is_dropped(&self) -> bool {
        self.state().dropped
    }

    /// Simulate the clip reaching its end
    pub fn finish_playthrough(&self) {
        let mut state = self.state();
        state.playing = false;
        state.ended = true;
    }
}

struct FakeClip {
    state: Arc<Mutex<ClipState>>,
    duration: Option<Duration>,
}

impl FakeClip {
    fn record(&self, event: ClipEvent) -> MutexGuard<'_, ClipState> {
        let mut state = self.state.lock().unwrap();
        state.events.push(event);
        state
    }
}

impl Clip for FakeClip {
    fn play(&mut self) {
        let mut state = self.record(ClipEvent::Play);
        state.playing = true;
        state.ended = false;
    }

    fn pause(&mut self) {
        self.record(ClipEvent::Pause).playing = false;
    }

    fn rewind(&mut self) {
        self.record(ClipEvent::Rewind);
    }

    fn has_ended(&self) -> bool {
        self.state.lock().unwrap().ended
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn release(self: Box<Self>) {
        self.record(ClipEvent::Release);
    }
}

impl Drop for FakeClip {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.dropped = true;
        }
    }
}

/// Clip loader handing out [`FakeClip`]s
pub struct FakeClips {
    duration: Option<Duration>,
    failure: Mutex<Option<AudioError>>,
    loaded: Mutex<Vec<Arc<ClipMonitor>>>,
}

impl FakeClips {
    pub fn new(duration: Option<Duration>) -> Self {
        Self {
            duration,
            failure: Mutex::new(None),
            loaded: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_with(&self, error: AudioError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn loads(&self) -> usize {
        self.loaded.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Arc<ClipMonitor>> {
        self.loaded.lock().unwrap().last().cloned()
    }
}

impl ClipLoader for FakeClips {
    fn load(&self, asset: &Path) -> Result<Box<dyn Clip>, AudioError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        let state = Arc::new(Mutex::new(ClipState::default()));
        self.loaded.lock().unwrap().push(Arc::new(ClipMonitor {
            asset: asset.display().to_string(),
            state: Arc::clone(&state),
        }));
        Ok(Box::new(FakeClip {
            state,
            duration: self.duration,
        }))
    }
}

/// Doubles for every capability, on virtual time
pub struct Harness {
    pub synth: Arc<RecordingSynth>,
    pub clips: Arc<FakeClips>,
    pub scheduler: Arc<ManualScheduler>,
    has_synth: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_clip_length(Some(Duration::from_secs(3)))
    }

    pub fn with_clip_length(duration: Option<Duration>) -> Self {
        Self {
            synth: Arc::new(RecordingSynth::default()),
            clips: Arc::new(FakeClips::new(duration)),
            scheduler: Arc::new(ManualScheduler::new()),
            has_synth: true,
        }
    }

    pub fn without_synth() -> Self {
        Self {
            has_synth: false,
            ..Self::new()
        }
    }

    pub fn platform(&self) -> Platform {
        let synth: Option<Arc<dyn Synth>> = if self.has_synth {
            Some(self.synth.clone())
        } else {
            None
        };
        Platform::new(synth, self.clips.clone(), self.scheduler.clone())
    }

    pub fn player(&self) -> SoundPlayer {
        SoundPlayer::new(self.platform())
    }

    pub fn player_with(&self, config: &PlayerConfig) -> SoundPlayer {
        SoundPlayer::from_config(self.platform(), config)
    }
}
