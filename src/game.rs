//! Round engine
//!
//! `Game` owns the session: the current round, progression, both periodic
//! clocks and the storage/audio collaborators. Taps and clock ticks are both
//! handled through `&mut self`, so they can never interleave mid-update.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::audio::AudioSink;
use crate::consts::*;
use crate::error::GameError;
use crate::observe::Stats;
use crate::persistence::ScoreStore;
use crate::platform::FixedTimer;
use crate::settings::Settings;
use crate::sim::{
    BackgroundColor, Difficulty, EntityId, EscalationRule, FadingIcon, IconEntity, IdAllocator,
    Progression, RngState, Round, RoundPhase, ScreenBounds, TapOutcome, setup_round,
};
use crate::tuning::Tuning;

/// Summary of a round that just started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundHandle {
    /// 1-based count of rounds started this session
    pub number: u64,
    pub difficulty: Difficulty,
    pub target_id: EntityId,
    pub background: Option<BackgroundColor>,
}

/// The round engine
pub struct Game<S: ScoreStore, A: AudioSink> {
    tuning: Tuning,
    bounds: ScreenBounds,
    seed: u64,
    rng: Pcg32,
    ids: IdAllocator,
    progression: Progression,
    round: Option<Round>,
    rounds_started: u64,
    motion_timer: FixedTimer,
    cloud_timer: FixedTimer,
    settings: Settings,
    stats: Stats,
    store: S,
    audio: A,
}

impl<S: ScoreStore, A: AudioSink> Game<S, A> {
    /// Create a session. Fails fast on bad tuning or screen bounds.
    pub fn new(tuning: Tuning, bounds: ScreenBounds, seed: u64, mut store: S, audio: A) -> Result<Self, GameError> {
        tuning.validate()?;
        bounds.validate(tuning.icon_radius)?;

        let high_score = store.load_high_score();
        let settings = store.load_settings();
        let rule = EscalationRule {
            medium_streak: tuning.medium_streak,
            hard_streak: tuning.hard_streak,
        };
        log::info!("Session initialized with seed {} (high score {})", seed, high_score);

        Ok(Self {
            bounds,
            seed,
            rng: RngState::new(seed).to_rng(),
            ids: IdAllocator::new(),
            progression: Progression::new(high_score, rule),
            round: None,
            rounds_started: 0,
            motion_timer: FixedTimer::new(SIM_DT, MAX_SUBSTEPS),
            cloud_timer: FixedTimer::new(CLOUD_FRAME_DT, MAX_SUBSTEPS),
            stats: Stats::new(high_score, settings.music_enabled),
            settings,
            tuning,
            store,
            audio,
        })
    }

    // === Commands ===

    /// Start a fresh run from the menu at `difficulty`; streak starts at 0
    pub fn start_round(&mut self, difficulty: Difficulty) -> Result<RoundHandle, GameError> {
        let round = self.build_round(difficulty)?;
        self.progression.start(difficulty);
        Ok(self.install_round(round))
    }

    /// Won -> next round, escalating difficulty if the streak earned it
    pub fn continue_round(&mut self) -> Result<RoundHandle, GameError> {
        self.require_phase(RoundPhase::Won, "continue")?;

        let next = self.progression.next_difficulty();
        let round = self.build_round(next)?;

        let before = self.progression.difficulty;
        if self.progression.continue_round(next) {
            log::info!(
                "Difficulty {:?} -> {:?} at streak {}",
                before,
                self.progression.difficulty,
                self.progression.current_streak
            );
        }
        Ok(self.install_round(round))
    }

    /// Lost -> new round at the same difficulty
    pub fn retry_round(&mut self) -> Result<RoundHandle, GameError> {
        self.require_phase(RoundPhase::Lost, "retry")?;
        let round = self.build_round(self.progression.difficulty)?;
        self.progression.retry_round();
        Ok(self.install_round(round))
    }

    /// Return to the menu. The high score is persisted before the round is dropped.
    pub fn end_session(&mut self) {
        self.store.save_high_score(self.progression.high_score);
        self.discard_round();
        self.progression.end();
        log::info!(
            "Session ended after {} rounds (high score {})",
            self.rounds_started,
            self.progression.high_score
        );
    }

    /// Handle a tap. `None` when no round is accepting taps.
    pub fn on_tap(&mut self, point: Vec2) -> Option<TapOutcome> {
        if !self.progression.is_active() {
            return None;
        }
        let round = self.round.as_mut()?;
        let outcome = round.apply_tap(point, self.tuning.icon_radius);

        match outcome {
            TapOutcome::CloudRemoved(_) => self.audio.on_cloud_removed(),
            TapOutcome::TargetHit => {
                self.progression.record(outcome);
                self.audio.on_target_hit();
                self.store.save_high_score(self.progression.high_score);
                log::info!(
                    "Round {} won (streak {}, high score {})",
                    self.rounds_started,
                    self.progression.current_streak,
                    self.progression.high_score
                );
            }
            TapOutcome::DecoyHit(_) => {
                self.progression.record(outcome);
                self.audio.on_decoy_hit();
                log::info!("Round {} lost", self.rounds_started);
            }
            TapOutcome::Miss => {}
        }
        self.sync_stats();
        Some(outcome)
    }

    /// One motion tick. No-op unless a round is active.
    pub fn tick(&mut self) {
        if !self.progression.is_active() {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            round.tick(self.bounds, self.tuning.icon_radius, SIM_DT);
        }
    }

    /// One step of the slow cloud animation clock. No-op unless active.
    pub fn cloud_frame_tick(&mut self) {
        if !self.progression.is_active() {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            round.advance_cloud_frame();
        }
    }

    /// Feed frame time to both clocks and run whatever ticks are due
    pub fn advance(&mut self, dt: f32) {
        if !self.progression.is_active() {
            return;
        }
        for _ in 0..self.motion_timer.advance(dt) {
            self.tick();
        }
        for _ in 0..self.cloud_timer.advance(dt) {
            self.cloud_frame_tick();
        }
    }

    /// Flip background music on/off and persist the choice
    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.settings.toggle_music();
        self.store.save_settings(&self.settings);
        self.audio.on_music_toggle(enabled);
        self.stats.music_enabled.set(enabled);
        enabled
    }

    // === Observers ===

    pub fn entities(&self) -> &[IconEntity] {
        self.round.as_ref().map(|r| r.entities.as_slice()).unwrap_or(&[])
    }

    pub fn fading(&self) -> &[FadingIcon] {
        self.round.as_ref().map(|r| r.fading.as_slice()).unwrap_or(&[])
    }

    pub fn target_id(&self) -> Option<EntityId> {
        self.round.as_ref().map(|r| r.target_id)
    }

    pub fn target(&self) -> Option<&IconEntity> {
        self.round.as_ref().and_then(|r| r.target())
    }

    pub fn cloud_frame(&self) -> usize {
        self.round.as_ref().map(|r| r.cloud_animator.frame()).unwrap_or(0)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn background(&self) -> Option<BackgroundColor> {
        self.progression.background
    }

    pub fn previous_background(&self) -> Option<BackgroundColor> {
        self.progression.previous_background
    }

    pub fn streak(&self) -> u32 {
        self.progression.current_streak
    }

    pub fn high_score(&self) -> u32 {
        self.progression.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.progression.difficulty
    }

    pub fn phase(&self) -> RoundPhase {
        self.progression.phase
    }

    pub fn is_active(&self) -> bool {
        self.progression.is_active()
    }

    pub fn rounds_started(&self) -> u64 {
        self.rounds_started
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Observable stats, for subscribing
    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    // === Internals ===

    fn require_phase(&self, expected: RoundPhase, action: &'static str) -> Result<(), GameError> {
        let phase = self.progression.phase;
        if phase == expected {
            Ok(())
        } else {
            log::warn!("Rejected {} while {:?}", action, phase);
            Err(GameError::InvalidTransition { action, phase })
        }
    }

    fn build_round(&mut self, difficulty: Difficulty) -> Result<Round, GameError> {
        let setup = setup_round(&self.tuning, difficulty, self.bounds, &mut self.rng, &mut self.ids)?;
        Ok(Round::new(setup, self.tuning.cloud_frame_count, self.tuning.cloud_fade_secs))
    }

    /// Swap in a new round with fresh clocks and a new background
    fn install_round(&mut self, round: Round) -> RoundHandle {
        self.discard_round();
        self.motion_timer = FixedTimer::new(SIM_DT, MAX_SUBSTEPS);
        self.cloud_timer = FixedTimer::new(CLOUD_FRAME_DT, MAX_SUBSTEPS);
        self.progression.rotate_background(&self.tuning.palette, &mut self.rng);

        self.rounds_started += 1;
        let handle = RoundHandle {
            number: self.rounds_started,
            difficulty: self.progression.difficulty,
            target_id: round.target_id,
            background: self.progression.background,
        };
        self.round = Some(round);
        self.audio.on_round_start();
        self.sync_stats();

        log::info!(
            "Round {} started: {:?}, {} icons, background {:?}",
            handle.number,
            handle.difficulty,
            self.entities().len(),
            handle.background
        );
        handle
    }

    fn discard_round(&mut self) {
        if let Some(mut old) = self.round.take() {
            old.cancel_pending();
            log::debug!("Round discarded, clocks torn down");
        }
    }

    fn sync_stats(&mut self) {
        self.stats.streak.set(self.progression.current_streak);
        self.stats.high_score.set(self.progression.high_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioManager, SoundEffect};
    use crate::persistence::MemoryStore;
    use crate::sim::entity_contains;

    fn game(high_score: u32) -> Game<MemoryStore, AudioManager> {
        Game::new(
            Tuning::default(),
            ScreenBounds::new(390.0, 844.0),
            1234,
            MemoryStore::with_high_score(high_score),
            AudioManager::new(),
        )
        .unwrap()
    }

    /// A point on the target that no cloud covers, clearing clouds if needed
    fn tap_target(game: &mut Game<MemoryStore, AudioManager>) -> TapOutcome {
        loop {
            let pos = game.target().unwrap().pos;
            match game.on_tap(pos).unwrap() {
                TapOutcome::CloudRemoved(_) => continue,
                other => return other,
            }
        }
    }

    /// Tap a decoy the target does not overlap, clearing clouds above it first
    fn tap_decoy(game: &mut Game<MemoryStore, AudioManager>) -> TapOutcome {
        let radius = game.tuning().icon_radius;
        let target = game.target().unwrap().clone();
        let spot = game
            .entities()
            .iter()
            .filter(|e| e.kind.is_decoy())
            .map(|e| e.pos)
            .find(|p| !entity_contains(&target, *p, radius))
            .expect("some decoy clear of the target");
        loop {
            match game.on_tap(spot).unwrap() {
                TapOutcome::CloudRemoved(_) => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn test_new_loads_high_score() {
        let g = game(7);
        assert_eq!(g.high_score(), 7);
        assert_eq!(g.phase(), RoundPhase::Ended);
        assert!(!g.is_active());
        assert!(g.entities().is_empty());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let result = Game::new(
            Tuning::default(),
            ScreenBounds::new(-1.0, 100.0),
            1,
            MemoryStore::new(),
            AudioManager::new(),
        );
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_start_round() {
        let mut g = game(0);
        let handle = g.start_round(Difficulty::Easy).unwrap();
        assert_eq!(handle.number, 1);
        assert_eq!(g.entities().len(), 20);
        assert_eq!(g.target_id(), Some(handle.target_id));
        assert!(g.is_active());
        assert!(g.background().is_some());
        assert_eq!(g.audio_mut().drain()[0].effect, SoundEffect::RoundStart);
    }

    #[test]
    fn test_win_saves_high_score() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        assert_eq!(tap_target(&mut g), TapOutcome::TargetHit);
        assert_eq!(g.phase(), RoundPhase::Won);
        assert_eq!(g.streak(), 1);
        assert_eq!(g.high_score(), 1);
        assert_eq!(g.store().data.high_score, 1);
        assert!(g.store().saves >= 1);
    }

    #[test]
    fn test_loss_resets_streak() {
        let mut g = game(5);
        g.start_round(Difficulty::Easy).unwrap();
        tap_target(&mut g);
        g.continue_round().unwrap();
        assert!(matches!(tap_decoy(&mut g), TapOutcome::DecoyHit(_)));
        assert_eq!(g.phase(), RoundPhase::Lost);
        assert_eq!(g.streak(), 0);
        assert_eq!(g.high_score(), 5);
    }

    #[test]
    fn test_taps_ignored_when_inactive() {
        let mut g = game(0);
        assert_eq!(g.on_tap(Vec2::new(100.0, 100.0)), None);

        g.start_round(Difficulty::Easy).unwrap();
        tap_target(&mut g);
        let pos = g.target().unwrap().pos;
        assert_eq!(g.on_tap(pos), None);
        assert_eq!(g.streak(), 1);
    }

    #[test]
    fn test_ticks_stop_when_inactive() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        g.advance(0.1);
        assert!(g.round().unwrap().time_ticks > 0);

        tap_target(&mut g);
        let frozen: Vec<_> = g.entities().to_vec();
        let ticks = g.round().unwrap().time_ticks;
        g.advance(0.1);
        g.tick();
        assert_eq!(g.entities(), frozen.as_slice());
        assert_eq!(g.round().unwrap().time_ticks, ticks);
    }

    #[test]
    fn test_clocks_restart_with_each_round() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        // Under one motion period
        g.advance(0.015);
        assert_eq!(g.round().unwrap().time_ticks, 0);
        tap_target(&mut g);
        g.continue_round().unwrap();
        g.advance(0.01);
        assert_eq!(g.round().unwrap().time_ticks, 0);

        // Just under one cloud frame period, then a loss and retry
        for _ in 0..5 {
            g.advance(0.09);
        }
        assert_eq!(g.cloud_frame(), 0);
        tap_decoy(&mut g);
        g.retry_round().unwrap();
        g.advance(0.1);
        assert_eq!(g.cloud_frame(), 0);
    }

    #[test]
    fn test_continue_requires_win() {
        let mut g = game(0);
        assert!(matches!(
            g.continue_round(),
            Err(GameError::InvalidTransition { action: "continue", .. })
        ));
        g.start_round(Difficulty::Easy).unwrap();
        assert!(matches!(g.retry_round(), Err(GameError::InvalidTransition { .. })));
    }

    #[test]
    fn test_continue_escalates_and_rotates_background() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        for _ in 0..5 {
            tap_target(&mut g);
            let before = g.background();
            let handle = g.continue_round().unwrap();
            assert_ne!(handle.background, before);
        }
        assert_eq!(g.streak(), 5);
        assert_eq!(g.difficulty(), Difficulty::Medium);
        assert_eq!(g.entities().len(), 45);
    }

    #[test]
    fn test_retry_keeps_difficulty() {
        let mut g = game(0);
        g.start_round(Difficulty::Hard).unwrap();
        tap_decoy(&mut g);
        let handle = g.retry_round().unwrap();
        assert_eq!(handle.difficulty, Difficulty::Hard);
        assert_eq!(g.streak(), 0);
        assert!(g.is_active());
    }

    #[test]
    fn test_cloud_fade_cancelled_with_round() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        let cloud = g.entities().iter().find(|e| e.kind.is_cloud()).unwrap().clone();
        let outcome = g.on_tap(cloud.pos).unwrap();
        assert!(matches!(outcome, TapOutcome::CloudRemoved(_)));
        assert_eq!(g.fading().len(), 1);
        assert_eq!(g.round().unwrap().pending_removals(), 1);

        g.end_session();
        assert!(g.round().is_none());
        assert!(g.fading().is_empty());
    }

    #[test]
    fn test_end_session_persists_and_allows_restart() {
        let mut g = game(0);
        g.start_round(Difficulty::Medium).unwrap();
        tap_target(&mut g);
        let saves = g.store().saves;
        g.end_session();
        assert_eq!(g.phase(), RoundPhase::Ended);
        assert_eq!(g.store().saves, saves + 1);
        assert!(matches!(g.continue_round(), Err(GameError::InvalidTransition { .. })));

        g.start_round(Difficulty::Easy).unwrap();
        assert_eq!(g.difficulty(), Difficulty::Easy);
        assert_eq!(g.streak(), 0);
        assert_eq!(g.high_score(), 1);
    }

    #[test]
    fn test_toggle_music_persists() {
        let mut g = game(0);
        assert!(g.toggle_music());
        assert!(g.store().data.settings.music_enabled);
        assert!(g.audio().is_music_playing());
        assert!(*g.stats_mut().music_enabled.get());
    }

    #[test]
    fn test_cloud_frame_advances_on_slow_clock() {
        let mut g = game(0);
        g.start_round(Difficulty::Easy).unwrap();
        for _ in 0..30 {
            g.advance(0.02);
        }
        assert_eq!(g.cloud_frame(), 1);
    }
}
