//! Round outcome and difficulty progression
//!
//! Playing -> Won (target hit) | Lost (decoy hit).
//! Won -> Playing via continue, Lost -> Playing via retry, either -> Ended.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::hit::TapOutcome;
use super::state::{BackgroundColor, Difficulty};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Icons moving, taps accepted
    Playing,
    /// Target found; waiting for continue or menu
    Won,
    /// Decoy tapped; waiting for retry or menu
    Lost,
    /// Back at the menu
    Ended,
}

/// Streak thresholds for automatic escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub medium_streak: u32,
    pub hard_streak: u32,
}

impl EscalationRule {
    /// Difficulty for the next round. Moves at most one step and never down.
    pub fn next(&self, difficulty: Difficulty, streak: u32) -> Difficulty {
        if streak >= self.hard_streak && difficulty == Difficulty::Medium {
            return Difficulty::Hard;
        }
        if streak >= self.medium_streak && difficulty == Difficulty::Easy {
            return Difficulty::Medium;
        }
        difficulty
    }
}

/// Pick a palette colour different from `previous`
pub fn next_background<R: Rng + ?Sized>(
    palette: &[BackgroundColor],
    previous: Option<BackgroundColor>,
    rng: &mut R,
) -> Option<BackgroundColor> {
    let candidates: Vec<BackgroundColor> = palette
        .iter()
        .copied()
        .filter(|c| Some(*c) != previous)
        .collect();
    candidates.choose(rng).copied()
}

/// Cross-round session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub difficulty: Difficulty,
    pub current_streak: u32,
    pub high_score: u32,
    pub background: Option<BackgroundColor>,
    pub previous_background: Option<BackgroundColor>,
    pub phase: RoundPhase,
    pub rule: EscalationRule,
}

impl Progression {
    pub fn new(high_score: u32, rule: EscalationRule) -> Self {
        Self {
            difficulty: Difficulty::Easy,
            current_streak: 0,
            high_score,
            background: None,
            previous_background: None,
            phase: RoundPhase::Ended,
            rule,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Fresh start from the menu: chosen difficulty, streak cleared
    pub fn start(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.current_streak = 0;
        self.phase = RoundPhase::Playing;
    }

    /// Apply a tap outcome. Returns the new phase when the round ended.
    pub fn record(&mut self, outcome: TapOutcome) -> Option<RoundPhase> {
        if !self.is_active() {
            return None;
        }
        match outcome {
            TapOutcome::TargetHit => {
                self.current_streak += 1;
                self.high_score = self.high_score.max(self.current_streak);
                self.phase = RoundPhase::Won;
                Some(RoundPhase::Won)
            }
            TapOutcome::DecoyHit(_) => {
                self.current_streak = 0;
                self.phase = RoundPhase::Lost;
                Some(RoundPhase::Lost)
            }
            TapOutcome::CloudRemoved(_) | TapOutcome::Miss => None,
        }
    }

    /// Difficulty the next round runs at if the player continues now
    pub fn next_difficulty(&self) -> Difficulty {
        self.rule.next(self.difficulty, self.current_streak)
    }

    /// Won -> Playing at `next`, as returned by `next_difficulty`.
    /// Returns true if difficulty changed. Caller checks the phase first.
    pub fn continue_round(&mut self, next: Difficulty) -> bool {
        let before = self.difficulty;
        self.difficulty = next;
        self.phase = RoundPhase::Playing;
        self.difficulty != before
    }

    /// Lost -> Playing at the same difficulty
    pub fn retry_round(&mut self) {
        self.current_streak = 0;
        self.phase = RoundPhase::Playing;
    }

    /// Rotate to a new background, never repeating the current one
    pub fn rotate_background<R: Rng + ?Sized>(&mut self, palette: &[BackgroundColor], rng: &mut R) {
        self.previous_background = self.background;
        self.background = next_background(palette, self.previous_background, rng).or(self.background);
    }

    pub fn end(&mut self) {
        self.phase = RoundPhase::Ended;
    }
}
