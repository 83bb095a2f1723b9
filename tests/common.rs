//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use mystic_realms::config::GameConfig;
use mystic_realms::game::{CharacterClass, GameSession, ScriptedDice};

/// Rules with random spawns switched off so walks through the map are
/// deterministic without scripting every room.
pub fn quiet_rules() -> GameConfig {
    GameConfig {
        normal_spawn_chance: 0.0,
        combat_spawn_chance: 0.0,
        ..GameConfig::default()
    }
}

pub fn session_with(config: GameConfig, class: CharacterClass) -> GameSession<ScriptedDice> {
    let mut session = GameSession::with_dice(config, ScriptedDice::new());
    session.start_new_game(class, "Ada").unwrap();
    session
}

pub fn knight_session() -> GameSession<ScriptedDice> {
    session_with(quiet_rules(), CharacterClass::Knight)
}

pub fn room_of(session: &GameSession<ScriptedDice>) -> String {
    session.player().unwrap().current_room.clone()
}
