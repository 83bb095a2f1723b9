mod common;

use common::{knight_session, room_of};
use mystic_realms::game::item::scroll_of_revelation;
use mystic_realms::game::world::{CRYSTAL_CAVE, HIDDEN_CHAMBER, SECRET_PHRASE};
use mystic_realms::game::{Direction, GameError, GameSession, ScriptedDice};

/// Grove -> temple -> cave with the temple doors already open.
fn at_crystal_cave() -> GameSession<ScriptedDice> {
    let mut s = knight_session();
    s.world_mut().unwrap().unlock_temple().unwrap();
    s.move_player(Direction::North).unwrap();
    let out = s.move_player(Direction::East).unwrap();
    assert!(out.contains("Listen to the whispers of the cavern walls..."));
    assert_eq!(room_of(&s), CRYSTAL_CAVE);
    s
}

#[test]
fn passage_is_closed_until_revealed() {
    let mut s = at_crystal_cave();
    assert_eq!(
        s.move_player(Direction::Down),
        Err(GameError::InvalidDirection("down".into()))
    );
    assert!(!s.world().unwrap().flags.hidden_chamber_discovered);
}

#[test]
fn shard_resonance_opens_the_way() {
    let mut s = at_crystal_cave();
    let out = s.pick_up("Crystal Shard").unwrap();
    assert!(out.contains("Quest 'Recover the Crystal Shard' Completed!"));
    assert!(out.contains("The Crystal Shard resonates with the cave walls"));
    assert!(s.world().unwrap().passage_open());
    assert_eq!(s.player().unwrap().gold, 90);

    let inside = s.move_player(Direction::Down).unwrap();
    assert!(inside.contains("You have discovered the Hidden Chamber! Ancient magic fills the air..."));
    assert!(inside.contains("Quest 'Find the Hidden Chamber' Completed!"));
    assert!(inside.contains("LEVEL UP! You are now level 2."));
    assert_eq!(room_of(&s), HIDDEN_CHAMBER);
}

#[test]
fn leaving_with_the_shard_still_seals() {
    let mut s = at_crystal_cave();
    s.pick_up("Crystal Shard").unwrap();
    s.move_player(Direction::Down).unwrap();

    let out = s.move_player(Direction::Up).unwrap();
    assert!(out.contains("The passage seals behind you"));
    assert!(!out.contains("resonates"));
    assert!(!s.world().unwrap().passage_open());
    assert_eq!(
        s.move_player(Direction::Down),
        Err(GameError::InvalidDirection("down".into()))
    );

    // Coming back into the cave wakes the shard again.
    s.move_player(Direction::West).unwrap();
    let back = s.move_player(Direction::East).unwrap();
    assert!(back.contains("The Crystal Shard resonates with the cave walls"));
    s.move_player(Direction::Down).unwrap();
    assert_eq!(room_of(&s), HIDDEN_CHAMBER);
}

#[test]
fn secret_phrase_then_seal_on_exit() {
    let mut s = at_crystal_cave();
    assert_eq!(s.speak("hello?").unwrap(), "Your words echo and fade.");
    let opened = s.speak(&SECRET_PHRASE.to_uppercase()).unwrap();
    assert!(opened.contains("A hidden passage opens below."));

    s.move_player(Direction::Down).unwrap();
    let out = s.move_player(Direction::Up).unwrap();
    assert!(out.contains("The passage seals behind you"));
    assert_eq!(room_of(&s), CRYSTAL_CAVE);
    assert!(!s.world().unwrap().passage_open());
    assert_eq!(
        s.move_player(Direction::Down),
        Err(GameError::InvalidDirection("down".into()))
    );

    // Speaking again restores it.
    s.speak(SECRET_PHRASE).unwrap();
    s.move_player(Direction::Down).unwrap();
    assert_eq!(room_of(&s), HIDDEN_CHAMBER);
}

#[test]
fn reveal_spell_from_the_scroll() {
    let mut s = at_crystal_cave();
    assert_eq!(s.cast("reveal"), Err(GameError::UnknownSpell("reveal".into())));

    s.player_mut().unwrap().add_item(scroll_of_revelation()).unwrap();
    let learned = s.use_item("Scroll of Revelation").unwrap();
    assert!(learned.contains("You have learned the 'Reveal' spell!"));

    let out = s.cast("Reveal").unwrap();
    assert!(out.contains("revealing a hidden passage downward"));
    assert!(s.world().unwrap().flags.hidden_chamber_discovered);
    assert_eq!(s.cast("fireball"), Err(GameError::UnknownSpell("fireball".into())));
}

#[test]
fn only_one_divine_artifact() {
    let mut s = at_crystal_cave();
    s.speak(SECRET_PHRASE).unwrap();
    s.move_player(Direction::Down).unwrap();
    assert!(s.look().unwrap().contains("Divine Sword, Divine Shield, Divine Elixir"));

    let out = s.claim("divine shield").unwrap();
    assert!(out.starts_with("You claim the Divine Shield."));
    assert!(s.player().unwrap().has_item("Divine Shield"));
    assert!(matches!(
        s.claim("Divine Sword"),
        Err(GameError::InvalidStateTransition(_))
    ));

    s.pick_up("Legendary Sword").unwrap();
    s.use_item("Legendary Sword").unwrap();
    let weapon = s.player().unwrap().weapon.clone().unwrap();
    assert_eq!(weapon.name, "Legendary Sword");
    assert_eq!(weapon.effect_value, 30);
}

#[test]
fn quest_log_tracks_progress() {
    let mut s = at_crystal_cave();
    let log = s.quest_log().unwrap();
    assert!(log.contains("[crystal_seeker] Recover the Crystal Shard - In Progress (0/1)"));
    s.pick_up("Crystal Shard").unwrap();
    let log = s.quest_log().unwrap();
    assert!(log.contains("[crystal_seeker] Recover the Crystal Shard - Completed"));

    // Completing twice pays once.
    let gold = s.player().unwrap().gold;
    let player = s.player_mut().unwrap();
    let mut quest = player.quests.remove("crystal_seeker").unwrap();
    assert!(quest.complete(player).is_none());
    assert_eq!(player.gold, gold);
}
