//! Piano key pitch table
//!
//! The 88 keys of a standard piano, A0 to C8, tuned in equal temperament
//! with A4 at 440 Hz.

use std::fmt;

/// Note name and frequency (Hz) for every key, lowest first
static PIANO_KEYS: [(&str, f32); PianoKey::COUNT] = [
    ("A0", 27.5000),
    ("A#0", 29.1352),
    ("B0", 30.8677),
    ("C1", 32.7032),
    ("C#1", 34.6478),
    ("D1", 36.7081),
    ("D#1", 38.8909),
    ("E1", 41.2034),
    ("F1", 43.6535),
    ("F#1", 46.2493),
    ("G1", 48.9994),
    ("G#1", 51.9131),
    ("A1", 55.0000),
    ("A#1", 58.2705),
    ("B1", 61.7354),
    ("C2", 65.4064),
    ("C#2", 69.2957),
    ("D2", 73.4162),
    ("D#2", 77.7817),
    ("E2", 82.4069),
    ("F2", 87.3071),
    ("F#2", 92.4986),
    ("G2", 97.9989),
    ("G#2", 103.8262),
    ("A2", 110.0000),
    ("A#2", 116.5409),
    ("B2", 123.4708),
    ("C3", 130.8128),
    ("C#3", 138.5913),
    ("D3", 146.8324),
    ("D#3", 155.5635),
    ("E3", 164.8138),
    ("F3", 174.6141),
    ("F#3", 184.9972),
    ("G3", 195.9977),
    ("G#3", 207.6523),
    ("A3", 220.0000),
    ("A#3", 233.0819),
    ("B3", 246.9417),
    ("C4", 261.6256),
    ("C#4", 277.1826),
    ("D4", 293.6648),
    ("D#4", 311.1270),
    ("E4", 329.6276),
    ("F4", 349.2282),
    ("F#4", 369.9944),
    ("G4", 391.9954),
    ("G#4", 415.3047),
    ("A4", 440.0000),
    ("A#4", 466.1638),
    ("B4", 493.8833),
    ("C5", 523.2511),
    ("C#5", 554.3653),
    ("D5", 587.3295),
    ("D#5", 622.2540),
    ("E5", 659.2551),
    ("F5", 698.4565),
    ("F#5", 739.9888),
    ("G5", 783.9909),
    ("G#5", 830.6094),
    ("A5", 880.0000),
    ("A#5", 932.3275),
    ("B5", 987.7666),
    ("C6", 1046.5023),
    ("C#6", 1108.7305),
    ("D6", 1174.6591),
    ("D#6", 1244.5079),
    ("E6", 1318.5102),
    ("F6", 1396.9129),
    ("F#6", 1479.9777),
    ("G6", 1567.9817),
    ("G#6", 1661.2188),
    ("A6", 1760.0000),
    ("A#6", 1864.6550),
    ("B6", 1975.5332),
    ("C7", 2093.0045),
    ("C#7", 2217.4610),
    ("D7", 2349.3181),
    ("D#7", 2489.0159),
    ("E7", 2637.0205),
    ("F7", 2793.8259),
    ("F#7", 2959.9554),
    ("G7", 3135.9635),
    ("G#7", 3322.4376),
    ("A7", 3520.0000),
    ("A#7", 3729.3101),
    ("B7", 3951.0664),
    ("C8", 4186.0090),
];

/// A key on the piano, indexing the static pitch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PianoKey(usize);

impl PianoKey {
    /// A3 (220 Hz)
    pub const A3: Self = Self(36);
    /// A#3
    pub const A_SHARP3: Self = Self(37);
    /// C4, middle C
    pub const C4: Self = Self(39);
    /// D4
    pub const D4: Self = Self(41);
    /// E4
    pub const E4: Self = Self(43);
    /// G4
    pub const G4: Self = Self(46);
    /// A4 (440 Hz)
    pub const A4: Self = Self(48);
    /// A#4
    pub const A_SHARP4: Self = Self(49);

    /// Number of keys in the table
    pub const COUNT: usize = 88;

    /// Look up a key by name, e.g. `"C4"` or `"A#3"`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PIANO_KEYS
            .iter()
            .position(|(key, _)| *key == name)
            .map(Self)
    }

    /// Note name
    #[must_use]
    pub fn name(self) -> &'static str {
        PIANO_KEYS[self.0].0
    }

    /// Frequency in Hz
    #[must_use]
    pub fn frequency(self) -> f32 {
        PIANO_KEYS[self.0].1
    }

    /// Iterate over every key, lowest first
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}

impl fmt::Display for PianoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitches() {
        assert_eq!(PianoKey::A4.frequency(), 440.0);
        assert_eq!(PianoKey::A3.frequency(), 220.0);
        assert!((PianoKey::C4.frequency() - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(PianoKey::from_name("A#4"), Some(PianoKey::A_SHARP4));
        assert_eq!(PianoKey::from_name("A#3"), Some(PianoKey::A_SHARP3));
        assert_eq!(PianoKey::from_name("G4"), Some(PianoKey::G4));
        assert_eq!(PianoKey::from_name("H2"), None);
        assert_eq!(PianoKey::from_name("c4"), None);
    }

    #[test]
    fn test_named_constants_match_table() {
        for key in [
            PianoKey::A3,
            PianoKey::A_SHARP3,
            PianoKey::C4,
            PianoKey::D4,
            PianoKey::E4,
            PianoKey::G4,
            PianoKey::A4,
            PianoKey::A_SHARP4,
        ] {
            assert_eq!(PianoKey::from_name(key.name()), Some(key));
        }
        assert_eq!(PianoKey::C4.to_string(), "C4");
    }

    #[test]
    fn test_table_ascends_by_semitones() {
        let keys: Vec<_> = PianoKey::all().collect();
        assert_eq!(keys.len(), 88);
        assert_eq!(keys[0].name(), "A0");
        assert_eq!(keys[87].name(), "C8");

        let semitone = 2f32.powf(1.0 / 12.0);
        for pair in keys.windows(2) {
            let ratio = pair[1].frequency() / pair[0].frequency();
            assert!((ratio - semitone).abs() < 1e-3, "{} -> {}", pair[0], pair[1]);
        }
    }
}
