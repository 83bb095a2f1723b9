//! The player character: stats, inventory, equipment, statuses and quest log.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::game::errors::{GameError, GameResult};
use crate::game::item::{find_item, Item, ItemType};
use crate::game::quest::{Quest, QuestAction};
use crate::game::types::{CharacterClass, StatusEffect, StatusRecord};

/// Turns a potion boost lasts.
pub const BOOST_TURNS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub class: CharacterClass,
    pub title: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub gold: u32,
    /// Key of the room the player stands in.
    pub current_room: String,
    pub inventory: Vec<Item>,
    /// `None` leaves the pack unbounded.
    pub capacity: Option<usize>,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub statuses: Vec<StatusRecord>,
    pub quests: BTreeMap<String, Quest>,
    pub discovered_rooms: BTreeSet<String>,
    pub found_secret: bool,
    pub spells: BTreeSet<String>,
    /// Named milestones such as "Dragon Slayer".
    pub secrets: BTreeSet<String>,
}

impl Player {
    pub fn new(name: &str, class: CharacterClass, start_room: &str) -> Self {
        let profile = class.profile();
        let mut discovered_rooms = BTreeSet::new();
        discovered_rooms.insert(start_room.to_string());
        Self {
            name: name.to_string(),
            class,
            title: profile.title.to_string(),
            level: 1,
            xp: 0,
            xp_to_next_level: 100,
            hp: profile.hp,
            max_hp: 100,
            base_attack: profile.attack,
            base_defense: profile.defense,
            gold: profile.gold,
            current_room: start_room.to_string(),
            inventory: Vec::new(),
            capacity: None,
            weapon: None,
            armor: None,
            statuses: Vec::new(),
            quests: BTreeMap::new(),
            discovered_rooms,
            found_secret: false,
            spells: BTreeSet::new(),
            secrets: BTreeSet::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Returns the hp actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp.saturating_sub(before)
    }

    pub fn attack_boost(&self) -> u32 {
        self.boost_total(StatusEffect::AttackBoost)
    }

    pub fn defense_boost(&self) -> u32 {
        self.boost_total(StatusEffect::DefenseBoost)
    }

    fn boost_total(&self, effect: StatusEffect) -> u32 {
        self.statuses
            .iter()
            .filter(|s| s.effect == effect)
            .map(|s| s.value)
            .sum()
    }

    /// Base attack plus weapon and active boosts.
    pub fn attack(&self) -> u32 {
        self.base_attack + self.weapon.as_ref().map_or(0, |w| w.effect_value) + self.attack_boost()
    }

    pub fn defense(&self) -> u32 {
        self.base_defense + self.armor.as_ref().map_or(0, |a| a.effect_value) + self.defense_boost()
    }

    /// Adds xp and levels up as many times as it covers.
    pub fn gain_xp(&mut self, amount: u32) -> Vec<String> {
        self.xp += amount;
        let mut lines = Vec::new();
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            lines.push(self.level_up());
        }
        lines
    }

    fn level_up(&mut self) -> String {
        self.level += 1;
        self.xp_to_next_level = self.level * 100;
        let old_max = self.max_hp;
        self.max_hp = self.level * 100;
        self.hp = (self.hp + (self.max_hp - old_max)).min(self.max_hp);
        self.base_attack += 3;
        self.base_defense += 2;
        format!("LEVEL UP! You are now level {}.", self.level)
    }

    pub fn has_item(&self, name: &str) -> bool {
        find_item(&self.inventory, name).is_some()
    }

    pub fn add_item(&mut self, item: Item) -> GameResult<()> {
        if let Some(cap) = self.capacity {
            if self.inventory.len() >= cap {
                return Err(GameError::InventoryFull(cap));
            }
        }
        self.inventory.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, name: &str) -> GameResult<Item> {
        match find_item(&self.inventory, name) {
            Some(idx) => Ok(self.inventory.remove(idx)),
            None => Err(GameError::ItemNotFound(name.trim().to_string())),
        }
    }

    /// Puts the item in its slot. Whatever was there goes back to the pack.
    fn equip(&mut self, item: Item) -> String {
        let line = format!("You equipped {}!", item.name);
        let slot = match item.item_type {
            ItemType::Armor => &mut self.armor,
            _ => &mut self.weapon,
        };
        if let Some(previous) = slot.replace(item) {
            self.inventory.push(previous);
        }
        line
    }

    /// Uses an inventory item: potions are drunk, gear is equipped, a reveal
    /// scroll teaches its spell. Consumed items leave the inventory.
    pub fn use_item(&mut self, name: &str) -> GameResult<String> {
        let idx = find_item(&self.inventory, name)
            .ok_or_else(|| GameError::ItemNotFound(name.trim().to_string()))?;
        let kind = self.inventory[idx].item_type;
        match kind {
            ItemType::Weapon | ItemType::Armor => {
                let item = self.inventory.remove(idx);
                Ok(self.equip(item))
            }
            ItemType::Potion => {
                let item = self.inventory.remove(idx);
                Ok(self.drink(&item))
            }
            ItemType::Scroll if self.inventory[idx].effects.reveal => {
                self.inventory.remove(idx);
                let mut line = self.learn_spell("Reveal");
                line.push_str("\nThe scroll disintegrates in your hands.");
                Ok(line)
            }
            _ => Err(GameError::ItemNotUsable(self.inventory[idx].name.clone())),
        }
    }

    fn drink(&mut self, item: &Item) -> String {
        let fx = item.effects;
        let mut parts = Vec::new();
        if fx.heal > 0 {
            let healed = self.heal(fx.heal);
            parts.push(format!("You used {} and healed for {} HP!", item.name, healed));
        }
        if fx.temp_attack > 0 {
            self.statuses.push(StatusRecord::timed(
                StatusEffect::AttackBoost,
                fx.temp_attack,
                BOOST_TURNS,
            ));
            parts.push(format!(
                "You used {} and gained +{} attack for {} turns!",
                item.name, fx.temp_attack, BOOST_TURNS
            ));
        }
        if fx.temp_defense > 0 {
            self.statuses.push(StatusRecord::timed(
                StatusEffect::DefenseBoost,
                fx.temp_defense,
                BOOST_TURNS,
            ));
            parts.push(format!(
                "You used {} and gained +{} defense for {} turns!",
                item.name, fx.temp_defense, BOOST_TURNS
            ));
        }
        if parts.is_empty() {
            parts.push(format!("You used {}!", item.name));
        }
        parts.join("\n")
    }

    /// Adds an ailment tag. Tags do not stack.
    pub fn add_status(&mut self, effect: StatusEffect) {
        if !self.has_status(effect) {
            self.statuses.push(StatusRecord::persistent(effect));
        }
    }

    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.statuses.iter().any(|s| s.effect == effect)
    }

    pub fn clear_status(&mut self, effect: StatusEffect) {
        self.statuses.retain(|s| s.effect != effect);
    }

    /// Drops burning, poison and stun; boosts keep running.
    pub fn clear_combat_statuses(&mut self) {
        self.statuses.retain(|s| {
            !matches!(
                s.effect,
                StatusEffect::Burning | StatusEffect::Poisoned | StatusEffect::Stunned
            )
        });
    }

    /// End-of-round damage: 5 for burning, 3 for poison.
    pub fn apply_status_damage(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.has_status(StatusEffect::Burning) {
            self.take_damage(5);
            lines.push("You are burning! Lose 5 HP.".to_string());
        }
        if self.has_status(StatusEffect::Poisoned) {
            self.take_damage(3);
            lines.push("You are poisoned! Lose 3 HP.".to_string());
        }
        if !self.is_alive() {
            self.statuses.clear();
        }
        lines
    }

    /// Counts down timed statuses and drops the expired ones.
    pub fn tick_statuses(&mut self) {
        for s in self.statuses.iter_mut() {
            if let Some(turns) = s.remaining.as_mut() {
                *turns = turns.saturating_sub(1);
            }
        }
        self.statuses.retain(|s| s.remaining != Some(0));
    }

    pub fn learn_spell(&mut self, spell: &str) -> String {
        self.spells.insert(spell.to_ascii_lowercase());
        format!("You have learned the '{}' spell!", spell)
    }

    pub fn knows_spell(&self, spell: &str) -> bool {
        self.spells.contains(&spell.trim().to_ascii_lowercase())
    }

    /// Feeds one event to every quest in the log.
    pub fn advance_quests(&mut self, action: QuestAction, target: &str) -> Vec<String> {
        let mut quests = std::mem::take(&mut self.quests);
        let lines = quests
            .values_mut()
            .filter_map(|q| q.advance(action, target, self))
            .collect();
        // Quests started while the log was detached would be lost otherwise.
        quests.append(&mut self.quests);
        self.quests = quests;
        lines
    }

    pub fn status_summary(&self) -> String {
        let mut lines = vec![
            format!("Name: {} the {} ({})", self.name, self.title, self.class),
            format!("Level: {} (XP: {}/{})", self.level, self.xp, self.xp_to_next_level),
            format!("HP: {}/{}", self.hp, self.max_hp),
            format!("Attack: {} (Base: {})", self.attack(), self.base_attack),
            format!("Defense: {} (Base: {})", self.defense(), self.base_defense),
            format!("Gold: {}", self.gold),
        ];
        if let Some(w) = &self.weapon {
            lines.push(format!("Weapon: {}", w));
        }
        if let Some(a) = &self.armor {
            lines.push(format!("Armor: {}", a));
        }
        if !self.statuses.is_empty() {
            let effects: Vec<String> = self
                .statuses
                .iter()
                .map(|s| match s.remaining {
                    Some(t) => format!("{} +{} ({} turns)", s.effect, s.value, t),
                    None => s.effect.to_string(),
                })
                .collect();
            lines.push(format!("Effects: {}", effects.join(", ")));
        }
        lines.join("\n")
    }

    pub fn inventory_listing(&self) -> String {
        let mut out = if self.inventory.is_empty() {
            "Your inventory is empty.".to_string()
        } else {
            let items: Vec<String> = self.inventory.iter().map(|i| format!("- {}", i.describe())).collect();
            format!("Inventory:\n{}", items.join("\n"))
        };
        out.push_str(&format!(
            "\nEquipped Weapon: {}",
            self.weapon.as_ref().map_or("None", |w| w.name.as_str())
        ));
        out.push_str(&format!(
            "\nEquipped Armor: {}",
            self.armor.as_ref().map_or("None", |a| a.name.as_str())
        ));
        out
    }
}
