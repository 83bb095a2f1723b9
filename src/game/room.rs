//! Rooms: graph nodes holding items, NPCs, exits and one-shot features.

use log::debug;
use std::collections::{BTreeMap, HashMap};

use crate::config::GameConfig;
use crate::game::dice::Dice;
use crate::game::errors::{GameError, GameResult};
use crate::game::item::{find_item, random_item, take_item, Item};
use crate::game::npc::{random_enemy, Npc};
use crate::game::player::Player;
use crate::game::types::{Direction, DoorState, RoomType};

/// Handler in a room's event table. Returns a narrative line when it fires.
pub type RoomEvent = fn(&mut Player) -> Option<String>;

pub const KEY_NAME: &str = "Rusty Key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trap {
    pub kind: String,
    pub damage: u32,
    pub detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chest {
    pub locked: bool,
    pub opened: bool,
}

/// A one-time choice between several items; taking one dismisses the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offering {
    pub choices: Vec<Item>,
    pub claimed: bool,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub description: String,
    pub room_type: RoomType,
    pub exits: BTreeMap<Direction, String>,
    pub items: Vec<Item>,
    pub npcs: Vec<Npc>,
    pub trap: Option<Trap>,
    pub chest: Option<Chest>,
    pub offering: Option<Offering>,
    pub cleared: bool,
    pub visited: bool,
    pub is_secret: bool,
    pub door_state: DoorState,
    pub events: HashMap<String, RoomEvent>,
}

impl Room {
    pub fn new(name: &str, description: &str, room_type: RoomType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            room_type,
            exits: BTreeMap::new(),
            items: Vec::new(),
            npcs: Vec::new(),
            trap: None,
            chest: None,
            offering: None,
            cleared: false,
            visited: false,
            is_secret: false,
            door_state: DoorState::Open,
            events: HashMap::new(),
        }
    }

    /// A secret room starts sealed.
    pub fn secret(mut self) -> Self {
        self.is_secret = true;
        self.door_state = DoorState::Closed;
        self
    }

    pub fn with_door(mut self, state: DoorState) -> Self {
        self.door_state = state;
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npcs.push(npc);
        self
    }

    pub fn with_trap(mut self, kind: &str, damage: u32) -> Self {
        self.trap = Some(Trap {
            kind: kind.to_string(),
            damage,
            detected: false,
        });
        self
    }

    pub fn with_chest(mut self, locked: bool) -> Self {
        self.chest = Some(Chest {
            locked,
            opened: false,
        });
        self
    }

    pub fn with_offering(mut self, choices: Vec<Item>) -> Self {
        self.offering = Some(Offering {
            choices,
            claimed: false,
        });
        self
    }

    pub fn with_event(mut self, name: &str, handler: RoomEvent) -> Self {
        self.add_event(name, handler);
        self
    }

    pub fn add_event(&mut self, name: &str, handler: RoomEvent) {
        self.events.insert(name.to_string(), handler);
    }

    pub fn trigger_event(&self, name: &str, player: &mut Player) -> Option<String> {
        self.events.get(name).and_then(|handler| handler(player))
    }

    pub fn exit(&self, direction: Direction) -> Option<&str> {
        self.exits.get(&direction).map(String::as_str)
    }

    pub fn has_hostile(&self) -> bool {
        self.npcs.iter().any(Npc::is_hostile)
    }

    pub fn merchant(&self) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.is_merchant())
    }

    pub fn merchant_mut(&mut self) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.is_merchant())
    }

    pub fn find_npc(&self, name: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.matches(name))
    }

    pub fn npc_mut(&mut self, id: u32) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id == id)
    }

    /// Removes an NPC. A combat or boss room with no hostiles left is cleared.
    pub fn remove_npc(&mut self, id: u32) -> Option<Npc> {
        let idx = self.npcs.iter().position(|n| n.id == id)?;
        let npc = self.npcs.remove(idx);
        if !self.has_hostile() && matches!(self.room_type, RoomType::Combat | RoomType::Boss) {
            self.cleared = true;
        }
        Some(npc)
    }

    pub fn has_item(&self, name: &str) -> bool {
        find_item(&self.items, name).is_some()
    }

    pub fn take_item(&mut self, name: &str) -> GameResult<Item> {
        take_item(&mut self.items, name).ok_or_else(|| GameError::ItemNotFound(name.trim().to_string()))
    }

    pub fn spawn_chance(&self, rules: &GameConfig) -> f64 {
        match self.room_type {
            RoomType::Normal => rules.normal_spawn_chance,
            RoomType::Combat => rules.combat_spawn_chance,
            _ => 0.0,
        }
    }

    /// Entry mechanics: springs an undetected trap, then may spawn an enemy.
    pub fn enter<D: Dice + ?Sized>(&mut self, player: &mut Player, dice: &mut D, rules: &GameConfig) -> Vec<String> {
        self.visited = true;
        let mut events = Vec::new();

        if let Some(trap) = self.trap.take() {
            if trap.detected {
                events.push(format!("You carefully avoid the {} trap.", trap.kind));
                self.trap = Some(trap);
            } else {
                let dealt = player.take_damage(trap.damage);
                debug!("{} sprang a {} trap in {} for {}", player.name, trap.kind, self.name, dealt);
                events.push(format!(
                    "You triggered a {} trap! Took {} damage.",
                    trap.kind, dealt
                ));
            }
        }

        if !self.cleared && !self.has_hostile() && dice.chance(self.spawn_chance(rules)) {
            let enemy = random_enemy(player.level, rules.enemy_drop_chance, dice);
            debug!("spawned {} (level {}) in {}", enemy.name, enemy.level, self.name);
            events.push(format!("A {} appears!", enemy.name));
            self.npcs.push(enemy);
        }

        events
    }

    /// Narrative hook: the first secret room a player finds announces itself
    /// once; otherwise the room's own "on_enter" handler runs.
    pub fn on_enter(&mut self, player: &mut Player) -> Option<String> {
        self.visited = true;
        if self.is_secret && !player.found_secret {
            player.found_secret = true;
            return Some(format!(
                "You have discovered the {}! Ancient magic fills the air...",
                self.name
            ));
        }
        self.trigger_event("on_enter", player)
    }

    /// Gold scaled to the player's level plus one random item left in the room.
    pub fn open_chest<D: Dice + ?Sized>(&mut self, player: &mut Player, dice: &mut D) -> GameResult<String> {
        let chest = match self.chest.as_mut() {
            Some(c) if !c.opened => c,
            _ => return Err(GameError::NothingToOpen),
        };
        if chest.locked && !player.has_item(KEY_NAME) {
            return Err(GameError::Locked(KEY_NAME.to_string()));
        }
        chest.opened = true;
        let gold = player.level * 50 + dice.roll(10, 100).max(0) as u32;
        let item = random_item(player.level, dice);
        player.gold += gold;
        let line = format!("You found {} gold and {} in the chest!", gold, item.name);
        self.items.push(item);
        Ok(line)
    }

    pub fn detect_trap(&mut self) -> Option<&Trap> {
        let trap = self.trap.as_mut()?;
        trap.detected = true;
        Some(trap)
    }

    /// Takes one item from the offering. Only the first claim succeeds.
    pub fn claim_offering(&mut self, name: &str) -> GameResult<Item> {
        let offering = self
            .offering
            .as_mut()
            .ok_or_else(|| GameError::ItemNotFound(name.trim().to_string()))?;
        if offering.claimed {
            return Err(GameError::InvalidStateTransition(
                "the artifacts have already been claimed".to_string(),
            ));
        }
        let item = take_item(&mut offering.choices, name)
            .ok_or_else(|| GameError::ItemNotFound(name.trim().to_string()))?;
        offering.claimed = true;
        offering.choices.clear();
        Ok(item)
    }

    pub fn describe(&self) -> String {
        let mut desc = format!("{}\n{}", self.name, self.description);

        if let Some(trap) = &self.trap {
            if trap.detected {
                desc.push_str(&format!("\nYou notice a {} trap here!", trap.kind));
            }
        }
        if matches!(self.chest, Some(c) if !c.opened) {
            desc.push_str("\nThere is a treasure chest here.");
        }
        if let Some(offering) = &self.offering {
            if !offering.claimed {
                let names: Vec<&str> = offering.choices.iter().map(|i| i.name.as_str()).collect();
                desc.push_str(&format!(
                    "\nPedestals of light hold: {} (claim one)",
                    names.join(", ")
                ));
            }
        }
        if !self.items.is_empty() {
            desc.push_str("\nItems here:");
            for item in &self.items {
                desc.push_str(&format!("\n- {}", item.name));
            }
        }
        if !self.npcs.is_empty() {
            desc.push_str("\nBeings present:");
            for npc in &self.npcs {
                desc.push_str(&format!("\n- {}", npc.describe()));
            }
        }
        if self.is_secret {
            desc.push_str("\nAncient runes glow faintly on the walls...");
            match self.door_state {
                DoorState::Closed => desc.push_str("\nThe chamber entrance is sealed."),
                DoorState::Open => desc.push_str("\nThe magical barrier is open."),
            }
        }
        if !self.exits.is_empty() {
            let exits: Vec<&str> = self.exits.keys().map(|d| d.as_str()).collect();
            desc.push_str(&format!("\nExits: {}", exits.join(", ")));
        }
        desc
    }
}
