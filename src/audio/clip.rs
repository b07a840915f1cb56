//! Pre-recorded clip playback

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rodio::{Decoder, Sink, Source, mixer::Mixer};

/// A loaded clip, controlled like a media element
pub trait Clip: Send {
    /// Start or resume playback. Plays from the start once the clip has ended.
    fn play(&mut self);

    /// Pause, keeping the position
    fn pause(&mut self);

    /// Move the position back to the start
    fn rewind(&mut self);

    /// Check if playback has reached the end
    fn has_ended(&self) -> bool;

    /// Length of the clip, if the decoder knows it
    fn duration(&self) -> Option<Duration>;

    /// Give up control and let the clip play out on its own
    fn release(self: Box<Self>);
}

/// Loads clips by asset path
pub trait ClipLoader: Send + Sync {
    /// Load `asset`, ready to play
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be read or decoded, or there is
    /// nothing to play it on
    fn load(&self, asset: &Path) -> Result<Box<dyn Clip>, AudioError>;
}

/// Clip loader for hosts without an audio output
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutput;

impl ClipLoader for NoOutput {
    fn load(&self, _asset: &Path) -> Result<Box<dyn Clip>, AudioError> {
        Err(AudioError::NoDevice)
    }
}

/// Loads clips into a rodio mixer, resolving assets under a root directory
pub struct RodioClips {
    mixer: Mixer,
    root: PathBuf,
    cache: Mutex<HashMap<PathBuf, Arc<[u8]>>>,
}

impl RodioClips {
    /// Create a loader playing into `mixer`
    pub fn new(mixer: Mixer, root: impl Into<PathBuf>) -> Self {
        Self {
            mixer,
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn bytes(&self, path: &Path) -> Result<Arc<[u8]>, AudioError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bytes) = cache.get(path) {
            return Ok(Arc::clone(bytes));
        }
        let bytes: Arc<[u8]> = fs::read(path)
            .map_err(|e| AudioError::IoError(format!("{}: {e}", path.display())))?
            .into();
        cache.insert(path.to_path_buf(), Arc::clone(&bytes));
        Ok(bytes)
    }
}

impl ClipLoader for RodioClips {
    fn load(&self, asset: &Path) -> Result<Box<dyn Clip>, AudioError> {
        let path = self.root.join(asset);
        let bytes = self.bytes(&path)?;
        let name = asset.display().to_string();
        let clip = RodioClip::new(&self.mixer, bytes, name)?;
        log::debug!("Loaded clip {} ({:?})", clip.name, clip.duration);
        Ok(Box::new(clip))
    }
}

impl std::fmt::Debug for RodioClips {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("RodioClips")
            .field("root", &self.root)
            .field("cached", &cached)
            .finish()
    }
}

/// A clip playing through its own sink
///
/// Each playthrough decodes a fresh stream from the shared bytes, so a clip
/// that ended can be played again.
pub struct RodioClip {
    sink: Sink,
    bytes: Arc<[u8]>,
    duration: Option<Duration>,
    name: String,
}

impl RodioClip {
    fn new(mixer: &Mixer, bytes: Arc<[u8]>, name: String) -> Result<Self, AudioError> {
        let source = decode(&bytes)?;
        let duration = source.total_duration();

        let sink = Sink::connect_new(mixer);
        sink.append(source);
        sink.pause(); // Start paused

        Ok(Self {
            sink,
            bytes,
            duration,
            name,
        })
    }
}

fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
    Decoder::new(Cursor::new(Arc::clone(bytes)))
        .map_err(|e| AudioError::DecodeError(e.to_string()))
}

impl Clip for RodioClip {
    fn play(&mut self) {
        if self.sink.empty() {
            match decode(&self.bytes) {
                Ok(source) => self.sink.append(source),
                Err(e) => {
                    log::warn!("Cannot replay {}: {e}", self.name);
                    return;
                }
            }
        }
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) {
        if self.sink.empty() {
            return;
        }
        if let Err(e) = self.sink.try_seek(Duration::ZERO) {
            // Not every format seeks; drop the stream and decode afresh on play
            log::debug!("Seek failed for {}: {e}", self.name);
            self.sink.clear();
        }
    }

    fn has_ended(&self) -> bool {
        self.sink.empty()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn release(self: Box<Self>) {
        self.sink.detach();
    }
}

impl std::fmt::Debug for RodioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioClip")
            .field("name", &self.name)
            .field("paused", &self.sink.is_paused())
            .field("ended", &self.sink.empty())
            .field("duration", &self.duration)
            .finish()
    }
}

/// Errors that can occur during audio operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// IO error reading an asset
    IoError(String),
    /// Error decoding audio data
    DecodeError(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::NoDevice => write!(f, "No audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_output_refuses_to_load() {
        let result = NoOutput.load(Path::new("winner.mp3"));
        assert_eq!(result.err(), Some(AudioError::NoDevice));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AudioError::IoError("spin.mp3: not found".into()).to_string(),
            "IO error: spin.mp3: not found"
        );
        assert_eq!(
            AudioError::NoDevice.to_string(),
            "No audio output device available"
        );
    }
}
