use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::errors::GameError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    /// Accepts full names and single-letter forms, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            other => Err(GameError::InvalidDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Knight,
    Mage,
    Archer,
}

/// Starting numbers for a class: hp, gold, title, attack, defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassProfile {
    pub hp: u32,
    pub gold: u32,
    pub title: &'static str,
    pub attack: u32,
    pub defense: u32,
}

impl CharacterClass {
    pub fn profile(self) -> ClassProfile {
        match self {
            CharacterClass::Knight => ClassProfile {
                hp: 100,
                gold: 50,
                title: "Stalwart Knight",
                attack: 15,
                defense: 20,
            },
            CharacterClass::Mage => ClassProfile {
                hp: 80,
                gold: 75,
                title: "Mystic Mage",
                attack: 25,
                defense: 10,
            },
            CharacterClass::Archer => ClassProfile {
                hp: 90,
                gold: 60,
                title: "Swift Archer",
                attack: 20,
                defense: 15,
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacterClass::Knight => "Knight",
            CharacterClass::Mage => "Mage",
            CharacterClass::Archer => "Archer",
        };
        f.write_str(name)
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knight" => Ok(CharacterClass::Knight),
            "mage" => Ok(CharacterClass::Mage),
            "archer" => Ok(CharacterClass::Archer),
            other => Err(format!("unknown class '{}' (knight, mage, archer)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Normal,
    Combat,
    Boss,
    Shop,
    Rest,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    #[default]
    Open,
    Closed,
}

/// Ailments and buffs. NPCs only ever carry the first three as bare tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    Burning,
    Poisoned,
    Stunned,
    AttackBoost,
    DefenseBoost,
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusEffect::Burning => "Burning",
            StatusEffect::Poisoned => "Poisoned",
            StatusEffect::Stunned => "Stunned",
            StatusEffect::AttackBoost => "Attack Boost",
            StatusEffect::DefenseBoost => "Defense Boost",
        };
        f.write_str(name)
    }
}

/// A status carried by the player. `remaining` of `None` means it lasts until
/// cleared by combat end or defeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRecord {
    pub effect: StatusEffect,
    pub value: u32,
    pub remaining: Option<u32>,
}

impl StatusRecord {
    pub fn persistent(effect: StatusEffect) -> Self {
        Self {
            effect,
            value: 0,
            remaining: None,
        }
    }

    pub fn timed(effect: StatusEffect, value: u32, turns: u32) -> Self {
        Self {
            effect,
            value,
            remaining: Some(turns),
        }
    }
}

/// How player damage is applied to NPCs that carry a defense stat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MitigationPolicy {
    /// Damage lands unreduced.
    #[default]
    Raw,
    /// `max(1, damage - defense)` for defended NPCs.
    EnemyDefense,
}
