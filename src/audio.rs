//! Mood-based track selection for the MP3 player.
//!
//! The player module holds the audio files in numbered folders, one per mood.
//! [`MoodPlayer`] picks a folder and a random track within it and fires a
//! play command without waiting for playback.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// How many times a folder file count is re-queried before falling back.
pub const FILE_COUNT_RETRIES: u8 = 3;

/// Track count assumed when the player never reports one.
pub const DEFAULT_TRACK_COUNT: u16 = 1;

/// Errors reported by an audio player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// The player did not answer during initialisation.
    NotFound,
    /// The player answered with something unusable.
    InvalidResponse,
}

impl core::fmt::Display for AudioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AudioError::NotFound => write!(f, "audio player not found"),
            AudioError::InvalidResponse => write!(f, "audio player returned an invalid response"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AudioError {}

/// Trait for abstracting a folder/track MP3 player.
pub trait AudioPlayer {
    /// Brings the player up. Fails if the device cannot be reached.
    fn begin(&mut self) -> Result<(), AudioError>;

    /// Sets the output volume.
    fn set_volume(&mut self, volume: u8);

    /// Returns true while a track is playing.
    fn is_busy(&mut self) -> bool;

    /// Starts playing `track` (1-based) from `folder`. Does not block.
    fn play_folder_track(&mut self, folder: u8, track: u16);

    /// Queries how many files `folder` holds. May fail transiently.
    fn count_files_in_folder(&mut self, folder: u8) -> Result<u16, AudioError>;
}

/// Picks a mood folder and a random track, then starts playback.
pub struct MoodPlayer<'m> {
    moods: &'m [u8],
    next_mood: usize,
    rng: SmallRng,
}

impl<'m> MoodPlayer<'m> {
    /// Cycles through `moods` (folder ids), picking tracks with a PRNG seeded by `seed`.
    pub fn new(moods: &'m [u8], seed: u64) -> Self {
        Self {
            moods,
            next_mood: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Plays a random track from the next mood.
    ///
    /// Returns the `(folder, track)` that was started, or `None` if the player
    /// is busy or no moods are configured.
    pub fn play_next<P: AudioPlayer>(&mut self, player: &mut P) -> Option<(u8, u16)> {
        if self.moods.is_empty() || player.is_busy() {
            return None;
        }

        let folder = self.moods[self.next_mood % self.moods.len()];
        self.next_mood = (self.next_mood + 1) % self.moods.len();

        let count = track_count(player, folder);
        let track = self.rng.gen_range(1..=count);
        player.play_folder_track(folder, track);

        #[cfg(feature = "defmt")]
        defmt::debug!("playing folder {=u8} track {=u16}", folder, track);

        Some((folder, track))
    }

    /// Returns the folder the next call to [`play_next`](Self::play_next) will use.
    pub fn next_folder(&self) -> Option<u8> {
        self.moods.get(self.next_mood).copied()
    }
}

/// Queries the folder's file count, retrying a bounded number of times.
///
/// Zero counts count as failures since there is nothing to play.
pub fn track_count<P: AudioPlayer>(player: &mut P, folder: u8) -> u16 {
    for _ in 0..FILE_COUNT_RETRIES {
        match player.count_files_in_folder(folder) {
            Ok(count) if count > 0 => return count,
            _ => {}
        }
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("folder {=u8} file count unavailable, assuming {=u16}", folder, DEFAULT_TRACK_COUNT);

    DEFAULT_TRACK_COUNT
}
