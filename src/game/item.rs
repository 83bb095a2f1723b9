//! Item value objects and the built-in item catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::dice::Dice;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Potion,
    Quest,
    Scroll,
    Misc,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Potion => "potion",
            ItemType::Quest => "quest",
            ItemType::Scroll => "scroll",
            ItemType::Misc => "misc",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Structured effects. Zero means the effect is absent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ItemEffects {
    #[serde(default)]
    pub heal: u32,
    #[serde(default)]
    pub temp_attack: u32,
    #[serde(default)]
    pub temp_defense: u32,
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub reveal: bool,
}

impl ItemEffects {
    pub fn is_empty(&self) -> bool {
        *self == ItemEffects::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    /// Damage for weapons, armor rating for armor, heal amount for potions.
    pub effect_value: u32,
    /// Shop reference value; `None` means the item has no listed value.
    pub value: Option<u32>,
    #[serde(default)]
    pub effects: ItemEffects,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub combat_usable: bool,
}

impl Item {
    pub fn new(name: &str, description: &str, item_type: ItemType, effect_value: u32) -> Self {
        let mut effects = ItemEffects::default();
        match item_type {
            ItemType::Weapon => effects.damage = effect_value,
            ItemType::Armor => effects.defense = effect_value,
            ItemType::Potion => effects.heal = effect_value,
            _ => {}
        }
        Self {
            name: name.to_string(),
            description: description.to_string(),
            item_type,
            effect_value,
            value: None,
            effects,
            rarity: Rarity::Common,
            // Potions can be downed mid-fight unless a builder says otherwise.
            combat_usable: item_type == ItemType::Potion,
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_effects(mut self, effects: ItemEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Case-insensitive name comparison used by every container lookup.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// What a merchant pays for this item.
    pub fn sell_price(&self) -> u32 {
        match self.value {
            Some(v) => v / 2,
            None => 10,
        }
    }

    pub fn describe(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_type {
            ItemType::Weapon => write!(f, "{} (+{} dmg)", self.name, self.effect_value),
            ItemType::Armor => write!(f, "{} (+{} armor)", self.name, self.effect_value),
            _ => f.write_str(&self.name),
        }
    }
}

/// Position of an item with the given name, ignoring case.
pub fn find_item(items: &[Item], name: &str) -> Option<usize> {
    items.iter().position(|i| i.matches(name))
}

/// Removes and returns the first item with the given name.
pub fn take_item(items: &mut Vec<Item>, name: &str) -> Option<Item> {
    find_item(items, name).map(|idx| items.remove(idx))
}

pub fn health_potion() -> Item {
    Item::new("Health Potion", "Restores 20 HP", ItemType::Potion, 20).with_value(50)
}

pub fn iron_sword() -> Item {
    Item::new("Iron Sword", "A sturdy iron blade", ItemType::Weapon, 10).with_value(100)
}

pub fn leather_armor() -> Item {
    Item::new("Leather Armor", "Basic protection", ItemType::Armor, 5).with_value(80)
}

pub fn magic_staff() -> Item {
    Item::new("Magic Staff", "Channels arcane power", ItemType::Weapon, 15)
        .with_value(150)
        .with_rarity(Rarity::Rare)
}

pub fn ancient_scroll() -> Item {
    Item::new(
        "Ancient Scroll",
        "Contains forgotten knowledge",
        ItemType::Quest,
        0,
    )
}

pub fn shadow_essence() -> Item {
    Item::new(
        "Shadow Essence",
        "Pulsing with dark energy",
        ItemType::Quest,
        0,
    )
}

pub fn crystal_shard() -> Item {
    Item::new(
        "Crystal Shard",
        "Resonates with hidden power",
        ItemType::Quest,
        0,
    )
}

pub fn legendary_sword() -> Item {
    Item::new(
        "Legendary Sword",
        "A blade of immense power",
        ItemType::Weapon,
        30,
    )
    .with_rarity(Rarity::Legendary)
}

pub fn rusty_key() -> Item {
    Item::new("Rusty Key", "Opens an old lock", ItemType::Misc, 0).with_value(5)
}

/// Teaches the Reveal spell when read.
pub fn scroll_of_revelation() -> Item {
    Item::new(
        "Scroll of Revelation",
        "A weathered scroll inscribed with ancient runes",
        ItemType::Scroll,
        0,
    )
    .with_value(100)
    .with_effects(ItemEffects {
        reveal: true,
        ..ItemEffects::default()
    })
    .with_rarity(Rarity::Rare)
}

/// The three artifacts offered in the hidden chamber.
pub fn divine_artifacts() -> Vec<Item> {
    vec![
        Item::new(
            "Divine Sword",
            "A sword blessed by the gods",
            ItemType::Weapon,
            50,
        )
        .with_rarity(Rarity::Legendary),
        Item::new(
            "Divine Shield",
            "A shield of divine protection",
            ItemType::Armor,
            40,
        )
        .with_rarity(Rarity::Legendary),
        Item::new(
            "Divine Elixir",
            "Restores all health and grants power",
            ItemType::Potion,
            100,
        )
        .with_rarity(Rarity::Legendary),
    ]
}

struct Template {
    name: &'static str,
    description: &'static str,
    item_type: ItemType,
    base_value: u32,
    effects: ItemEffects,
}

const fn fx(heal: u32, temp_attack: u32, temp_defense: u32, damage: u32, defense: u32) -> ItemEffects {
    ItemEffects {
        heal,
        temp_attack,
        temp_defense,
        damage,
        defense,
        reveal: false,
    }
}

const WEAPONS: [Template; 3] = [
    Template {
        name: "Rusty Sword",
        description: "A worn but serviceable blade",
        item_type: ItemType::Weapon,
        base_value: 5,
        effects: fx(0, 0, 0, 3, 0),
    },
    Template {
        name: "Steel Sword",
        description: "A reliable weapon",
        item_type: ItemType::Weapon,
        base_value: 10,
        effects: fx(0, 0, 0, 5, 0),
    },
    Template {
        name: "Magic Sword",
        description: "Glows with mysterious energy",
        item_type: ItemType::Weapon,
        base_value: 20,
        effects: fx(0, 0, 0, 8, 0),
    },
];

const ARMOR: [Template; 3] = [
    Template {
        name: "Leather Armor",
        description: "Basic protection",
        item_type: ItemType::Armor,
        base_value: 5,
        effects: fx(0, 0, 0, 0, 2),
    },
    Template {
        name: "Chain Mail",
        description: "Solid metal protection",
        item_type: ItemType::Armor,
        base_value: 15,
        effects: fx(0, 0, 0, 0, 4),
    },
    Template {
        name: "Plate Armor",
        description: "Heavy but effective",
        item_type: ItemType::Armor,
        base_value: 25,
        effects: fx(0, 0, 0, 0, 6),
    },
];

const CONSUMABLES: [Template; 3] = [
    Template {
        name: "Health Potion",
        description: "Restores HP",
        item_type: ItemType::Potion,
        base_value: 5,
        effects: fx(20, 0, 0, 0, 0),
    },
    Template {
        name: "Strength Potion",
        description: "Temporarily boosts attack",
        item_type: ItemType::Potion,
        base_value: 8,
        effects: fx(0, 3, 0, 0, 0),
    },
    Template {
        name: "Defense Potion",
        description: "Temporarily boosts defense",
        item_type: ItemType::Potion,
        base_value: 8,
        effects: fx(0, 0, 3, 0, 0),
    },
];

/// Effect magnitudes grow 20% per level above the first.
fn scale(v: u32, level: u32) -> u32 {
    let factor = 1.0 + (level.saturating_sub(1) as f64) * 0.2;
    (v as f64 * factor) as u32
}

/// A random weapon, armor piece or potion tuned to `level`.
pub fn random_item<D: Dice + ?Sized>(level: u32, dice: &mut D) -> Item {
    let tables: [&[Template; 3]; 3] = [&WEAPONS, &ARMOR, &CONSUMABLES];
    let table = tables[dice.pick(tables.len())];
    let t = &table[dice.pick(table.len())];
    let level = level.max(1);
    let effects = ItemEffects {
        heal: scale(t.effects.heal, level),
        temp_attack: scale(t.effects.temp_attack, level),
        temp_defense: scale(t.effects.temp_defense, level),
        damage: scale(t.effects.damage, level),
        defense: scale(t.effects.defense, level),
        reveal: false,
    };
    let effect_value = match t.item_type {
        ItemType::Weapon => effects.damage,
        ItemType::Armor => effects.defense,
        _ => effects.heal,
    };
    let mut item = Item::new(t.name, t.description, t.item_type, effect_value)
        .with_value(t.base_value * level)
        .with_effects(effects);
    item.combat_usable = t.item_type == ItemType::Potion;
    item
}
