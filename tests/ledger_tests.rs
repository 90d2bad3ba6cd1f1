//! Ledger capture and deterministic replay.

mod common;

use common::{all_move, all_vote_for, started_seeded};
use werewolf_engine::{GameConfig, GameEngine, Ledger, LedgerError, Outcome, Phase};

fn assert_same_session(replayed: &GameEngine, captured: &GameEngine) {
    assert_eq!(replayed.snapshot(), captured.snapshot());
    assert_eq!(replayed.assignment(), captured.assignment());
    assert_eq!(replayed.encrypted_roles(), captured.encrypted_roles());
    assert_eq!(replayed.move_history(), captured.move_history());
    assert!(replayed.players().eq(captured.players()));
}

#[test]
fn test_replay_mid_game_matches_session() {
    let mut engine = started_seeded(17);
    all_move(&mut engine);
    let victim = engine
        .players()
        .find(|p| p.is_alive() && !p.is_moderator())
        .map(|p| p.id().clone())
        .unwrap();
    engine.handle_kill(victim).unwrap();

    let ledger = Ledger::capture(&engine);
    assert_eq!(ledger.len(), 6 + engine.input_log().len());

    let bytes = ledger.to_bytes().unwrap();
    let replayed = Ledger::from_bytes(&bytes)
        .unwrap()
        .replay(GameConfig::standard())
        .unwrap();

    assert_same_session(&replayed, &engine);
}

#[test]
fn test_replay_ignores_config_seed() {
    let mut engine = started_seeded(5);
    all_move(&mut engine);

    let ledger = Ledger::capture(&engine);
    let replayed = ledger
        .replay(GameConfig::standard().with_seed(12345))
        .unwrap();

    assert_same_session(&replayed, &engine);
}

#[test]
fn test_replay_of_decided_game() {
    let mut engine = started_seeded(8);
    all_move(&mut engine);
    let werewolf = engine.assignment().unwrap().werewolves().next().cloned().unwrap();
    let villager = engine
        .assignment()
        .unwrap()
        .grants
        .iter()
        .map(|g| g.player.clone())
        .find(|p| *p != werewolf)
        .unwrap();
    engine.handle_kill(villager).unwrap();
    all_vote_for(&mut engine, werewolf.as_str());
    assert_eq!(engine.phase(), Phase::Night);
    assert_eq!(engine.snapshot().outcome, Some(Outcome::VillagersWin));

    let replayed = Ledger::capture(&engine)
        .replay(GameConfig::standard())
        .unwrap();

    assert_same_session(&replayed, &engine);
    assert_eq!(replayed.snapshot().outcome, engine.snapshot().outcome);
}

#[test]
fn test_second_session_replays_from_its_own_rng_state() {
    common::init_logging();
    let mut engine = GameEngine::new(GameConfig::standard().with_seed(21));
    common::fill(&mut engine);
    let first_state = engine.session_picker().state();
    engine.finish(vec![0u8]);

    let assignment = common::fill(&mut engine);
    engine.dispatch_roles(common::seal(&assignment)).unwrap();

    let ledger = Ledger::capture(&engine);
    assert_ne!(ledger.rng, first_state);

    let replayed = ledger.replay(GameConfig::standard()).unwrap();
    assert_same_session(&replayed, &engine);
}

#[test]
fn test_tampered_ledger_fails_at_the_offending_command() {
    let mut engine = started_seeded(3);
    all_move(&mut engine);

    let mut ledger = Ledger::capture(&engine);
    // Drop the last move so the kill no longer has its quorum.
    ledger.commands.pop();
    let victim = engine
        .players()
        .find(|p| p.is_alive() && !p.is_moderator())
        .map(|p| p.id().clone())
        .unwrap();
    ledger.commands.push(werewolf_engine::Command::kill(victim));

    match ledger.replay(GameConfig::standard()) {
        Err(LedgerError::Replay { index, source }) => {
            assert_eq!(index, ledger.len() - 1);
            assert_eq!(source.kind(), werewolf_engine::ErrorKind::PreconditionNotMet);
        }
        other => panic!("expected replay failure, got {other:?}"),
    }
}
