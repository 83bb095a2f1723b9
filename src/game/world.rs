//! The room arena and the canonical adventure map.
//!
//! Rooms are stored by name and exits point at names, so the graph can hold
//! cycles without shared ownership.

use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::game::errors::{GameError, GameResult};
use crate::game::item::{self, divine_artifacts, Item};
use crate::game::npc::Npc;
use crate::game::player::Player;
use crate::game::room::Room;
use crate::game::shop::ShopEntry;
use crate::game::types::{Direction, DoorState, RoomType};

pub const SACRED_GROVE: &str = "Sacred Grove";
pub const SHADOW_TEMPLE: &str = "Shadow Temple";
pub const CRYSTAL_CAVE: &str = "Crystal Cave";
pub const HIDDEN_CHAMBER: &str = "Hidden Chamber";
pub const ENCHANTED_FOREST: &str = "Enchanted Forest";
pub const WHISPERING_CAVERNS: &str = "Whispering Caverns";
pub const ABANDONED_CASTLE: &str = "Abandoned Castle";
pub const HIDDEN_CLEARING: &str = "Hidden Clearing";
pub const FORGOTTEN_TOWER: &str = "Forgotten Tower";

pub const SECRET_PHRASE: &str = "whispers of the ancients";
pub const HINT_TEXT: &str = "Listen to the whispers of the cavern walls...";

/// Plot milestones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuestFlags {
    pub sacred_grove_cleared: bool,
    pub shadow_temple_unlocked: bool,
    pub hidden_chamber_discovered: bool,
    pub final_boss_defeated: bool,
}

/// Serializable overview of one room, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub room_type: RoomType,
    pub exits: BTreeMap<Direction, String>,
    pub npcs: Vec<String>,
    pub items: Vec<String>,
    pub is_secret: bool,
    pub door_state: DoorState,
}

#[derive(Debug, Clone)]
pub struct World {
    rooms: BTreeMap<String, Room>,
    starting_room: String,
    pub flags: QuestFlags,
}

impl World {
    pub fn new(starting_room: &str) -> Self {
        Self {
            rooms: BTreeMap::new(),
            starting_room: starting_room.to_string(),
            flags: QuestFlags::default(),
        }
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.name.clone(), room);
    }

    pub fn starting_room(&self) -> &str {
        &self.starting_room
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn get(&self, name: &str) -> GameResult<&Room> {
        self.room(name).ok_or_else(|| GameError::UnknownRoom(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> GameResult<&mut Room> {
        self.rooms
            .get_mut(name)
            .ok_or_else(|| GameError::UnknownRoom(name.to_string()))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    fn ensure(&self, name: &str) -> GameResult<()> {
        if self.rooms.contains_key(name) {
            Ok(())
        } else {
            Err(GameError::UnknownRoom(name.to_string()))
        }
    }

    /// Adds `from --dir--> to` and, when `to` has no exit the opposite way yet,
    /// the matching way back.
    pub fn connect(&mut self, from: &str, dir: Direction, to: &str) -> GameResult<()> {
        self.connect_one_way(from, dir, to)?;
        let back = self.get_mut(to)?;
        back.exits.entry(dir.opposite()).or_insert_with(|| from.to_string());
        Ok(())
    }

    /// A single directed edge with no return path.
    pub fn connect_one_way(&mut self, from: &str, dir: Direction, to: &str) -> GameResult<()> {
        self.ensure(to)?;
        self.get_mut(from)?.exits.insert(dir, to.to_string());
        Ok(())
    }

    /// Deletes an exit and the reverse exit if it leads back here. Returns the
    /// room the removed exit pointed at.
    pub fn remove_exit(&mut self, from: &str, dir: Direction) -> GameResult<Option<String>> {
        let target = match self.get_mut(from)?.exits.remove(&dir) {
            Some(t) => t,
            None => return Ok(None),
        };
        if let Some(other) = self.rooms.get_mut(&target) {
            let back = dir.opposite();
            if other.exits.get(&back).map(String::as_str) == Some(from) {
                other.exits.remove(&back);
            }
        }
        Ok(Some(target))
    }

    pub fn exit_target(&self, from: &str, dir: Direction) -> Option<&str> {
        self.room(from).and_then(|r| r.exit(dir))
    }

    pub fn passage_open(&self) -> bool {
        self.exit_target(CRYSTAL_CAVE, Direction::Down) == Some(HIDDEN_CHAMBER)
    }

    /// Opens the passage from the Crystal Cave down into the Hidden Chamber.
    /// Returns false when it was already open.
    pub fn reveal_hidden_chamber(&mut self) -> GameResult<bool> {
        if self.passage_open() {
            return Ok(false);
        }
        self.connect(CRYSTAL_CAVE, Direction::Down, HIDDEN_CHAMBER)?;
        self.get_mut(HIDDEN_CHAMBER)?.door_state = DoorState::Open;
        self.flags.hidden_chamber_discovered = true;
        info!("hidden chamber passage opened");
        Ok(true)
    }

    pub fn seal_hidden_chamber(&mut self) -> GameResult<()> {
        self.remove_exit(HIDDEN_CHAMBER, Direction::Up)?;
        self.get_mut(HIDDEN_CHAMBER)?.door_state = DoorState::Closed;
        debug!("hidden chamber sealed");
        Ok(())
    }

    /// Opens the temple doors once the grove's guardian is gone.
    pub fn unlock_temple(&mut self) -> GameResult<()> {
        self.flags.sacred_grove_cleared = true;
        self.flags.shadow_temple_unlocked = true;
        self.get_mut(SHADOW_TEMPLE)?.door_state = DoorState::Open;
        Ok(())
    }

    pub fn summary(&self) -> Vec<RoomSummary> {
        self.rooms
            .values()
            .map(|r| RoomSummary {
                name: r.name.clone(),
                room_type: r.room_type,
                exits: r.exits.clone(),
                npcs: r.npcs.iter().map(|n| n.name.clone()).collect(),
                items: r.items.iter().map(|i| i.name.clone()).collect(),
                is_secret: r.is_secret,
                door_state: r.door_state,
            })
            .collect()
    }

    /// The standard adventure map.
    pub fn canonical() -> GameResult<Self> {
        let mut world = World::new(SACRED_GROVE);

        let merchant = Npc::merchant(
            "Wandering Merchant",
            vec![
                ShopEntry::new(item::health_potion(), 50, 5),
                ShopEntry::new(item::iron_sword(), 100, 1),
                ShopEntry::new(item::leather_armor(), 80, 1),
                ShopEntry::new(item::magic_staff(), 150, 1),
            ],
        );

        world.add_room(
            Room::new(
                SACRED_GROVE,
                "A peaceful grove bathed in ethereal light. Ancient trees whisper secrets of forgotten magic.",
                RoomType::Rest,
            )
            .with_npc(Npc::boss("Forest Guardian", 100, 15, 50, 30))
            .with_npc(merchant)
            .with_item(item::ancient_scroll())
            .with_event("on_enter", grove_blessing),
        );
        world.add_room(
            Room::new(
                SHADOW_TEMPLE,
                "An ancient temple shrouded in darkness. Dark energies pulse within its walls.",
                RoomType::Boss,
            )
            .with_door(DoorState::Closed)
            .with_npc(Npc::boss("Shadow Knight", 150, 20, 100, 50))
            .with_item(item::shadow_essence()),
        );
        world.add_room(
            Room::new(
                CRYSTAL_CAVE,
                "A cave filled with glowing crystals. The air hums with magical resonance.",
                RoomType::Normal,
            )
            .with_npc(Npc::boss("Cave Wyrm", 120, 18, 75, 40))
            .with_item(item::crystal_shard())
            .with_event("on_enter", cave_whispers),
        );
        world.add_room(
            Room::new(
                HIDDEN_CHAMBER,
                "A mysterious chamber filled with ancient artifacts and forgotten treasures.",
                RoomType::Rest,
            )
            .secret()
            .with_item(item::legendary_sword())
            .with_offering(divine_artifacts()),
        );
        world.add_room(
            Room::new(
                ENCHANTED_FOREST,
                "Tall, twisting trees and faint whispers fill the air. Magic seems to pulse through the very ground.",
                RoomType::Combat,
            )
            .with_item(rusty_sword()),
        );
        world.add_room(
            Room::new(
                WHISPERING_CAVERNS,
                "Dark tunnels echo with mysterious sounds. Crystal formations cast eerie shadows on the walls.",
                RoomType::Normal,
            )
            .with_trap("spike", 15)
            .with_npc(Npc::monster("Cave Lurker", 60, 12, 30, 75))
            .with_item(item::scroll_of_revelation()),
        );
        world.add_room(
            Room::new(
                ABANDONED_CASTLE,
                "Once-grand halls now lie in ruins. Moonlight streams through broken windows.",
                RoomType::Boss,
            )
            .with_npc(Npc::boss("Ancient Dragon", 200, 25, 150, 100))
            .with_chest(true),
        );
        world.add_room(
            Room::new(
                HIDDEN_CLEARING,
                "A serene clearing bathed in perpetual twilight. Fireflies dance through the air.",
                RoomType::Normal,
            )
            .with_item(item::rusty_key())
            .with_chest(false),
        );
        world.add_room(
            Room::new(
                FORGOTTEN_TOWER,
                "A crumbling tower that seems to touch the clouds. Strange energies emanate from within.",
                RoomType::Rest,
            )
            .with_item(item::health_potion()),
        );

        world.connect(SACRED_GROVE, Direction::North, SHADOW_TEMPLE)?;
        world.connect(SHADOW_TEMPLE, Direction::East, CRYSTAL_CAVE)?;
        world.connect(SACRED_GROVE, Direction::South, ENCHANTED_FOREST)?;
        world.connect(ENCHANTED_FOREST, Direction::East, WHISPERING_CAVERNS)?;
        world.connect(WHISPERING_CAVERNS, Direction::East, ABANDONED_CASTLE)?;
        world.connect(ENCHANTED_FOREST, Direction::South, HIDDEN_CLEARING)?;
        world.connect(HIDDEN_CLEARING, Direction::East, FORGOTTEN_TOWER)?;

        Ok(world)
    }
}

fn rusty_sword() -> Item {
    Item::new(
        "Rusty Sword",
        "An old but serviceable blade",
        item::ItemType::Weapon,
        10,
    )
    .with_value(20)
}

fn grove_blessing(player: &mut Player) -> Option<String> {
    let healed = player.heal(10);
    if healed > 0 {
        Some(format!("The grove's light mends your wounds (+{} HP).", healed))
    } else {
        None
    }
}

fn cave_whispers(player: &mut Player) -> Option<String> {
    if player.found_secret {
        None
    } else {
        Some(format!("The walls seem to whisper ancient secrets... {}", HINT_TEXT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> World {
        let mut w = World::new("A");
        w.add_room(Room::new("A", "first", RoomType::Rest));
        w.add_room(Room::new("B", "second", RoomType::Rest));
        w
    }

    #[test]
    fn connect_adds_reverse_edge() {
        let mut w = two_rooms();
        w.connect("A", Direction::North, "B").unwrap();
        assert_eq!(w.exit_target("A", Direction::North), Some("B"));
        assert_eq!(w.exit_target("B", Direction::South), Some("A"));
    }

    #[test]
    fn connect_keeps_occupied_reverse_slot() {
        let mut w = two_rooms();
        w.add_room(Room::new("C", "third", RoomType::Rest));
        w.connect("C", Direction::North, "B").unwrap();
        w.connect("A", Direction::North, "B").unwrap();
        assert_eq!(w.exit_target("B", Direction::South), Some("C"));
        assert_eq!(w.exit_target("A", Direction::North), Some("B"));
    }

    #[test]
    fn one_way_and_unknown_rooms() {
        let mut w = two_rooms();
        w.connect_one_way("A", Direction::Down, "B").unwrap();
        assert!(w.exit_target("B", Direction::Up).is_none());
        assert_eq!(
            w.connect("A", Direction::East, "Nowhere"),
            Err(GameError::UnknownRoom("Nowhere".into()))
        );
        assert!(w.exit_target("A", Direction::East).is_none());
    }

    #[test]
    fn remove_exit_only_drops_matching_reverse() {
        let mut w = two_rooms();
        w.connect("A", Direction::East, "B").unwrap();
        assert_eq!(w.remove_exit("A", Direction::East).unwrap(), Some("B".into()));
        assert!(w.exit_target("B", Direction::West).is_none());
        assert_eq!(w.remove_exit("A", Direction::East).unwrap(), None);

        w.add_room(Room::new("C", "third", RoomType::Rest));
        w.connect_one_way("A", Direction::Up, "B").unwrap();
        w.connect_one_way("B", Direction::Down, "C").unwrap();
        w.remove_exit("A", Direction::Up).unwrap();
        assert_eq!(w.exit_target("B", Direction::Down), Some("C"));
    }

    #[test]
    fn canonical_map_is_symmetric_and_chamber_sealed() {
        let w = World::canonical().unwrap();
        assert_eq!(w.starting_room(), SACRED_GROVE);
        for room in w.rooms() {
            for (dir, target) in &room.exits {
                assert_eq!(
                    w.exit_target(target, dir.opposite()),
                    Some(room.name.as_str()),
                    "{} {} -> {} has no way back",
                    room.name,
                    dir,
                    target
                );
            }
        }
        assert!(!w.passage_open());
        assert!(w.get(HIDDEN_CHAMBER).unwrap().exits.is_empty());
        assert_eq!(w.get(SHADOW_TEMPLE).unwrap().door_state, DoorState::Closed);
    }

    #[test]
    fn chamber_reveal_and_seal_cycle() {
        let mut w = World::canonical().unwrap();
        assert!(w.reveal_hidden_chamber().unwrap());
        assert!(!w.reveal_hidden_chamber().unwrap());
        assert!(w.flags.hidden_chamber_discovered);
        assert_eq!(w.exit_target(HIDDEN_CHAMBER, Direction::Up), Some(CRYSTAL_CAVE));

        w.seal_hidden_chamber().unwrap();
        assert!(!w.passage_open());
        assert_eq!(w.get(HIDDEN_CHAMBER).unwrap().door_state, DoorState::Closed);
        assert!(w.reveal_hidden_chamber().unwrap());
    }

    #[test]
    fn summary_lists_every_room() {
        let w = World::canonical().unwrap();
        let summary = w.summary();
        assert_eq!(summary.len(), 9);
        let grove = summary.iter().find(|r| r.name == SACRED_GROVE).unwrap();
        assert!(grove.npcs.contains(&"Wandering Merchant".to_string()));
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"room_type\":\"boss\""));
    }
}
