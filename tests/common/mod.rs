//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use werewolf_engine::{
    GameConfig, GameEngine, Payload, PlayerId, Response, RoleAssignment, RolePicker,
};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Always takes the first remaining seat: p1 moderates, p2 is the werewolf,
/// p3..p6 are villagers.
#[derive(Clone, Debug, Default)]
pub struct First;

impl RolePicker for First {
    fn pick(&mut self, _upper: usize) -> usize {
        0
    }
}

pub fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// Stand-in for client-side encryption: tags the role with the key bytes.
pub fn seal(assignment: &RoleAssignment) -> BTreeMap<PlayerId, Payload> {
    assignment
        .grants
        .iter()
        .map(|grant| {
            let mut sealed = grant.public_key.0.clone();
            sealed.extend_from_slice(grant.role.to_string().as_bytes());
            (grant.player.clone(), Payload(sealed))
        })
        .collect()
}

/// Seat p1..p6 and return the draw from the final join.
pub fn fill<R: RolePicker + Clone>(engine: &mut GameEngine<R>) -> RoleAssignment {
    for i in 1..=5 {
        engine.join(format!("p{i}"), vec![i as u8]).unwrap();
    }
    match engine.join("p6", vec![6u8]).unwrap() {
        Response::RosterFull(assignment) => assignment,
        other => panic!("expected a full roster, got {other:?}"),
    }
}

/// A standard game with scripted roles, in its first night.
pub fn started() -> GameEngine<First> {
    init_logging();
    let mut engine = GameEngine::with_picker(GameConfig::standard(), First);
    let assignment = fill(&mut engine);
    engine.dispatch_roles(seal(&assignment)).unwrap();
    engine
}

/// A seeded game in its first night.
pub fn started_seeded(seed: u64) -> GameEngine {
    init_logging();
    let mut engine = GameEngine::new(GameConfig::standard().with_seed(seed));
    let assignment = fill(&mut engine);
    engine.dispatch_roles(seal(&assignment)).unwrap();
    engine
}

/// Every living player submits a move; the last response is returned.
pub fn all_move<R: RolePicker + Clone>(engine: &mut GameEngine<R>) -> Response {
    let alive: Vec<PlayerId> = engine.snapshot().alive.iter().cloned().collect();
    let mut last = None;
    for id in alive {
        let payload = format!("move by {id}");
        last = Some(engine.handle_move(id, payload.as_str()).unwrap());
    }
    last.expect("no living players")
}

/// Every living player votes for `candidate`; the last response is returned.
pub fn all_vote_for<R: RolePicker + Clone>(engine: &mut GameEngine<R>, candidate: &str) -> Response {
    let alive: Vec<PlayerId> = engine.snapshot().alive.iter().cloned().collect();
    let mut last = None;
    for id in alive {
        last = Some(engine.handle_vote(id, candidate).unwrap());
    }
    last.expect("no living players")
}
