//! Audio cues and background music state
//!
//! The round engine only fires notifications at an `AudioSink`; it never
//! waits on playback. `AudioManager` turns those notifications into a queue
//! of cues a frontend drains and plays.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// New round begins
    RoundStart,
    /// Target tapped
    TargetHit,
    /// Decoy tapped
    DecoyHit,
    /// Cloud cleared
    CloudPop,
}

/// A cue ready to be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Fire-and-forget audio notifications from the round engine
pub trait AudioSink {
    fn on_round_start(&mut self);
    fn on_target_hit(&mut self);
    fn on_decoy_hit(&mut self);
    fn on_cloud_removed(&mut self) {}
    fn on_music_toggle(&mut self, enabled: bool);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn on_round_start(&mut self) {}
    fn on_target_hit(&mut self) {}
    fn on_decoy_hit(&mut self) {}
    fn on_music_toggle(&mut self, _enabled: bool) {}
}

/// Audio manager for the game
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    settings: Settings,
    music_playing: bool,
    queued: Vec<Cue>,
}

impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from saved settings; starts the music if it was left on
    pub fn from_settings(settings: &Settings) -> Self {
        let mut manager = Self {
            settings: settings.clone(),
            ..Self::new()
        };
        manager.play_music();
        manager
    }

    pub fn is_music_enabled(&self) -> bool {
        self.settings.music_enabled
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Volume the music should play at right now; 0 when stopped
    pub fn music_volume(&self) -> f32 {
        if self.music_playing {
            self.settings.effective_music_volume()
        } else {
            0.0
        }
    }

    /// Queue a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.settings.effective_sfx_volume();
        if volume <= 0.0 {
            return;
        }
        self.queued.push(Cue { effect, volume });
    }

    /// Take every cue queued since the last call
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.queued)
    }

    /// Start the looping music. No-op when disabled or already playing.
    pub fn play_music(&mut self) {
        if !self.settings.music_enabled || self.music_playing {
            return;
        }
        self.music_playing = true;
        log::debug!("Music started");
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            log::debug!("Music stopped");
        }
        self.music_playing = false;
    }

    /// Flip the music preference and start/stop playback to match
    pub fn toggle_music(&mut self) -> bool {
        self.set_music_enabled(!self.settings.music_enabled);
        self.settings.music_enabled
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        self.settings.music_enabled = enabled;
        if enabled {
            self.play_music();
        } else {
            self.stop_music();
        }
    }
}

impl AudioSink for AudioManager {
    fn on_round_start(&mut self) {
        self.play(SoundEffect::RoundStart);
    }

    fn on_target_hit(&mut self) {
        self.play(SoundEffect::TargetHit);
    }

    fn on_decoy_hit(&mut self) {
        self.play(SoundEffect::DecoyHit);
    }

    fn on_cloud_removed(&mut self) {
        self.play(SoundEffect::CloudPop);
    }

    fn on_music_toggle(&mut self, enabled: bool) {
        self.set_music_enabled(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_are_queued_and_drained() {
        let mut audio = AudioManager::new();
        audio.on_round_start();
        audio.on_target_hit();
        let cues = audio.drain();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].effect, SoundEffect::RoundStart);
        assert_eq!(cues[1].effect, SoundEffect::TargetHit);
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_muted_drops_cues() {
        let mut audio = AudioManager::from_settings(&Settings {
            muted: true,
            ..Settings::default()
        });
        audio.on_decoy_hit();
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_music_follows_toggle() {
        let mut audio = AudioManager::new();
        audio.play_music();
        assert!(!audio.is_music_playing());

        assert!(audio.toggle_music());
        assert!(audio.is_music_playing());
        audio.play_music();
        assert!(audio.is_music_playing());

        assert!(!audio.toggle_music());
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_from_settings_resumes_music() {
        let settings = Settings {
            music_enabled: true,
            ..Settings::default()
        };
        let audio = AudioManager::from_settings(&settings);
        assert!(audio.is_music_playing());
        assert_eq!(audio.music_volume(), settings.effective_music_volume());
    }

    #[test]
    fn test_cue_volume_follows_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            music_enabled: true,
            music_volume: 0.4,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        audio.on_target_hit();
        assert_eq!(audio.drain()[0].volume, 0.25);
        assert_eq!(audio.music_volume(), 0.2);

        audio.toggle_music();
        assert_eq!(audio.music_volume(), 0.0);
    }
}
