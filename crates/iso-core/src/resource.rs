use serde::{Deserialize, Serialize};

/// Opaque handle to an image owned by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// Opaque handle to a sound owned by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Opaque handle to a font owned by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle(pub u32);

/// An opaque colour, used as the transparency key when loading images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Left and right channel volume, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Left channel.
    pub left: f32,
    /// Right channel.
    pub right: f32,
}

impl Volume {
    /// Same volume on both channels.
    pub fn even(level: f32) -> Self {
        Self {
            left: level,
            right: level,
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::even(1.0)
    }
}

/// A sound that plays at most once per `frequency_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclicSound {
    /// The sound to play.
    pub sound: SoundHandle,
    /// Playback volume.
    pub volume: Volume,
    /// Minimum gap between two emissions, in milliseconds.
    pub frequency_ms: u64,
    last_emitted_ms: Option<u64>,
}

impl CyclicSound {
    /// A cyclic sound that may emit every `frequency_ms`.
    pub fn new(sound: SoundHandle, frequency_ms: u64) -> Self {
        Self {
            sound,
            volume: Volume::default(),
            frequency_ms,
            last_emitted_ms: None,
        }
    }

    /// Set the playback volume.
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = volume;
        self
    }

    /// Whether the sound should play at `now_ms`. Records the emission when
    /// it does.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let due = match self.last_emitted_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.frequency_ms,
        };
        if due {
            self.last_emitted_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_sound_emits_once_per_period() {
        let mut step = CyclicSound::new(SoundHandle(3), 300);
        assert!(step.poll(1_000));
        assert!(!step.poll(1_050));
        assert!(!step.poll(1_299));
        assert!(step.poll(1_300));
        assert!(!step.poll(1_310));
    }
}
