//! Full session through the public engine API

use glam::Vec2;

use find_pugie::audio::{AudioManager, SilentAudio, SoundEffect};
use find_pugie::persistence::{JsonFileStore, MemoryStore, ScoreStore};
use find_pugie::sim::{Difficulty, IconKind, RoundPhase, ScreenBounds, TapOutcome};
use find_pugie::{ConfigError, Game, GameError, Tuning};

type TestGame = Game<MemoryStore, AudioManager>;

fn new_game(seed: u64) -> TestGame {
    Game::new(
        Tuning::default(),
        ScreenBounds::new(390.0, 844.0),
        seed,
        MemoryStore::new(),
        AudioManager::new(),
    )
    .unwrap()
}

fn win_round(game: &mut TestGame) {
    loop {
        let pos = game.target().unwrap().pos;
        if game.on_tap(pos) == Some(TapOutcome::TargetHit) {
            return;
        }
    }
}

#[test]
fn streak_climbs_through_every_difficulty() {
    let mut game = new_game(2024);
    game.start_round(Difficulty::Easy).unwrap();

    let mut seen = Vec::new();
    for _ in 0..12 {
        for _ in 0..25 {
            game.advance(0.02);
        }
        win_round(&mut game);
        seen.push(game.difficulty());
        game.continue_round().unwrap();
    }

    assert_eq!(game.streak(), 12);
    assert_eq!(game.high_score(), 12);
    // Escalated on the continue after the 5th and 10th wins
    assert_eq!(seen[4], Difficulty::Easy);
    assert_eq!(seen[5], Difficulty::Medium);
    assert_eq!(seen[9], Difficulty::Medium);
    assert_eq!(seen[10], Difficulty::Hard);
    assert_eq!(game.entities().len(), 75);
    assert_eq!(game.store().data.high_score, 12);
}

#[test]
fn loss_then_retry_then_menu() {
    let mut game = new_game(7);
    game.start_round(Difficulty::Medium).unwrap();
    win_round(&mut game);
    game.continue_round().unwrap();

    let target = game.target().unwrap().clone();
    let radius = game.tuning().icon_radius;
    let decoy = game
        .entities()
        .iter()
        .find(|e| e.kind.is_decoy() && (e.pos - target.pos).abs().max_element() > 2.0 * radius)
        .map(|e| e.pos)
        .unwrap();
    let outcome = loop {
        match game.on_tap(decoy).unwrap() {
            TapOutcome::CloudRemoved(_) => continue,
            other => break other,
        }
    };
    assert!(matches!(outcome, TapOutcome::DecoyHit(_)));
    assert_eq!(game.phase(), RoundPhase::Lost);
    assert_eq!(game.streak(), 0);
    assert_eq!(game.high_score(), 1);

    let lost_on = game.background();
    let handle = game.retry_round().unwrap();
    assert_eq!(handle.difficulty, Difficulty::Medium);
    assert!(handle.background.is_some());
    assert_ne!(handle.background, lost_on);
    assert_eq!(game.previous_background(), lost_on);

    game.end_session();
    assert_eq!(game.phase(), RoundPhase::Ended);
    assert!(game.entities().is_empty());
    assert!(matches!(game.retry_round(), Err(GameError::InvalidTransition { .. })));
}

#[test]
fn audio_cues_follow_outcomes() {
    let mut game = new_game(11);
    game.start_round(Difficulty::Easy).unwrap();
    win_round(&mut game);

    let effects: Vec<SoundEffect> = game.audio_mut().drain().into_iter().map(|c| c.effect).collect();
    assert_eq!(effects.first(), Some(&SoundEffect::RoundStart));
    assert_eq!(effects.last(), Some(&SoundEffect::TargetHit));
    assert!(effects[1..effects.len() - 1].iter().all(|e| *e == SoundEffect::CloudPop));
}

#[test]
fn stats_observers_fire_on_change() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut game = new_game(3);
    let streaks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&streaks);
    game.stats_mut().streak.subscribe(move |s| sink.borrow_mut().push(*s));

    game.start_round(Difficulty::Easy).unwrap();
    win_round(&mut game);
    game.continue_round().unwrap();
    win_round(&mut game);

    assert_eq!(*streaks.borrow(), vec![1, 2]);
}

#[test]
fn fading_cloud_keeps_moving_then_disappears() {
    let mut game = new_game(5);
    game.start_round(Difficulty::Easy).unwrap();
    let cloud = game.entities().iter().find(|e| e.kind == IconKind::Cloud).unwrap().clone();
    let Some(TapOutcome::CloudRemoved(id)) = game.on_tap(cloud.pos) else {
        panic!("expected a cloud under the tap");
    };
    assert!(game.entities().iter().all(|e| e.id != id));
    assert_eq!(game.fading().len(), 1);

    game.advance(0.02);
    game.advance(0.02);
    let fading = &game.fading()[0];
    assert!(fading.entity.fading);
    assert!(fading.entity.opacity < 1.0);

    for _ in 0..40 {
        game.advance(0.02);
    }
    assert!(game.fading().is_empty());
}

#[test]
fn empty_space_tap_is_a_miss() {
    let mut game = new_game(9);
    game.start_round(Difficulty::Easy).unwrap();
    // Far outside the screen
    assert_eq!(game.on_tap(Vec2::new(-1000.0, -1000.0)), Some(TapOutcome::Miss));
    assert!(game.is_active());
}

#[test]
fn high_score_survives_sessions_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    {
        let mut game = Game::new(
            Tuning::default(),
            ScreenBounds::new(390.0, 844.0),
            1,
            JsonFileStore::open(&path),
            AudioManager::new(),
        )
        .unwrap();
        game.start_round(Difficulty::Easy).unwrap();
        loop {
            let pos = game.target().unwrap().pos;
            if game.on_tap(pos) == Some(TapOutcome::TargetHit) {
                break;
            }
        }
        game.end_session();
    }

    let mut reopened = JsonFileStore::open(&path);
    assert_eq!(reopened.load_high_score(), 1);

    let game = Game::new(
        Tuning::default(),
        ScreenBounds::new(390.0, 844.0),
        2,
        reopened,
        AudioManager::new(),
    )
    .unwrap();
    assert_eq!(game.high_score(), 1);
}

#[test]
fn bad_tuning_fails_fast() {
    let tuning = Tuning {
        difficulties: Vec::new(),
        ..Tuning::default()
    };
    let result = Game::new(tuning, ScreenBounds::new(390.0, 844.0), 1, MemoryStore::new(), SilentAudio);
    assert!(matches!(result, Err(GameError::Config(_))));
}

#[test]
fn table_missing_a_tier_fails_before_play() {
    let mut tuning = Tuning::default();
    tuning.difficulties.retain(|l| l.difficulty == Difficulty::Easy);
    let result = Game::new(tuning, ScreenBounds::new(390.0, 844.0), 1, MemoryStore::new(), SilentAudio);
    assert!(matches!(
        result,
        Err(GameError::Config(ConfigError::MissingDifficulty(Difficulty::Medium)))
    ));
}
