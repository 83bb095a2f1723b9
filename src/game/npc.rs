//! Non-player characters: monsters, bosses, scaled random enemies and
//! merchants, all sharing one record shape distinguished by capability flags.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::game::dice::Dice;
use crate::game::item::{random_item, Item};
use crate::game::shop::ShopEntry;
use crate::game::types::StatusEffect;

static NEXT_NPC_ID: AtomicU32 = AtomicU32::new(1);

fn next_id() -> u32 {
    NEXT_NPC_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NpcFlag {
    Combatant,
    Merchant,
    Boss,
}

/// One entry in a boss special-attack table.
///
/// Negative `damage` heals the boss instead of hurting the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BossMove {
    pub text: String,
    pub damage: i32,
    pub inflicts: Option<StatusEffect>,
    pub weight: u32,
}

impl BossMove {
    fn new(text: &str, damage: i32, inflicts: Option<StatusEffect>) -> Self {
        Self {
            text: text.to_string(),
            damage,
            inflicts,
            weight: 1,
        }
    }
}

/// Special moves for the named bosses. Unknown bosses get a single generic blow.
pub fn boss_moves(name: &str) -> Vec<BossMove> {
    use StatusEffect::*;
    match name {
        "Ancient Dragon" => vec![
            BossMove::new("The Ancient Dragon breathes FIRE!", 40, Some(Burning)),
            BossMove::new("The Ancient Dragon summons a cyclone!", 30, None),
        ],
        "Shadow Knight" => vec![
            BossMove::new("The Shadow Knight strikes with DARK BLADE!", 30, Some(Poisoned)),
            BossMove::new(
                "The Shadow Knight shrouds the battlefield in darkness!",
                20,
                None,
            ),
        ],
        "Cave Wyrm" => vec![
            BossMove::new("The Cave Wyrm spits toxic gas!", 20, Some(Poisoned)),
            BossMove::new("The Cave Wyrm shakes the ground!", 25, None),
        ],
        "Forest Guardian" => vec![
            BossMove::new("The Forest Guardian summons thorny vines!", 25, Some(Stunned)),
            BossMove::new("The Forest Guardian heals itself slightly!", -20, None),
        ],
        other => vec![BossMove::new(
            &format!("{} strikes with overwhelming force!", other),
            25,
            None,
        )],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Npc {
    pub id: u32,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack_power: u32,
    pub loot_gold: u32,
    pub xp_reward: u32,
    pub level: u32,
    /// Only scaled enemies carry a defense stat.
    pub defense: Option<u32>,
    pub flags: Vec<NpcFlag>,
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub drops: Vec<Item>,
    #[serde(default)]
    pub stock: Vec<ShopEntry>,
    #[serde(default)]
    pub moves: Vec<BossMove>,
}

impl Npc {
    fn base(name: &str, hp: u32, attack_power: u32, loot_gold: u32, xp_reward: u32) -> Self {
        Self {
            id: next_id(),
            name: name.to_string(),
            hp,
            max_hp: hp,
            attack_power,
            loot_gold,
            xp_reward,
            level: 1,
            defense: None,
            flags: Vec::new(),
            status_effects: Vec::new(),
            drops: Vec::new(),
            stock: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// A plain hostile creature.
    pub fn monster(name: &str, hp: u32, attack_power: u32, loot_gold: u32, xp_reward: u32) -> Self {
        let mut npc = Self::base(name, hp, attack_power, loot_gold, xp_reward);
        npc.flags.push(NpcFlag::Combatant);
        npc
    }

    pub fn boss(name: &str, hp: u32, attack_power: u32, loot_gold: u32, xp_reward: u32) -> Self {
        let mut npc = Self::monster(name, hp, attack_power, loot_gold, xp_reward);
        npc.flags.push(NpcFlag::Boss);
        npc.moves = boss_moves(name);
        npc
    }

    /// A level-scaled enemy. Base stats are the level-1 values.
    pub fn enemy(
        name: &str,
        level: u32,
        hp: u32,
        attack: u32,
        defense: u32,
        xp_value: u32,
        gold_value: u32,
    ) -> Self {
        let level = level.max(1);
        let step = level - 1;
        let mut npc = Self::monster(
            name,
            hp + step * 5,
            attack + step * 2,
            gold_value * level,
            xp_value * level,
        );
        npc.level = level;
        npc.defense = Some(defense + step);
        npc
    }

    /// A non-combatant trader.
    pub fn merchant(name: &str, stock: Vec<ShopEntry>) -> Self {
        let mut npc = Self::base(name, 100, 0, 0, 0);
        npc.flags.push(NpcFlag::Merchant);
        npc.stock = stock;
        npc
    }

    pub fn with_drops(mut self, drops: Vec<Item>) -> Self {
        self.drops = drops;
        self
    }

    pub fn has_flag(&self, flag: NpcFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_boss(&self) -> bool {
        self.has_flag(NpcFlag::Boss)
    }

    pub fn is_merchant(&self) -> bool {
        self.has_flag(NpcFlag::Merchant)
    }

    pub fn is_combatant(&self) -> bool {
        self.has_flag(NpcFlag::Combatant)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive and willing to fight.
    pub fn is_hostile(&self) -> bool {
        self.is_alive() && self.is_combatant()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Subtracts damage, flooring hp at zero. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 {
            self.status_effects.clear();
        }
        lost
    }

    /// Self-heal never lifts hp above 100 or above max_hp.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let cap = self.max_hp.min(100).max(self.hp);
        let before = self.hp;
        self.hp = (self.hp + amount).min(cap);
        self.hp - before
    }

    pub fn add_status(&mut self, effect: StatusEffect) {
        if !self.status_effects.contains(&effect) {
            self.status_effects.push(effect);
        }
    }

    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.status_effects.contains(&effect)
    }

    /// Damage-over-time at the end of a round: 5 for burning, 5 for poison.
    pub fn process_status_effects(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.has_status(StatusEffect::Burning) {
            self.take_damage(5);
            lines.push(format!("{} suffers 5 damage from burning!", self.name));
        }
        if self.has_status(StatusEffect::Poisoned) {
            self.take_damage(5);
            lines.push(format!("{} suffers 5 damage from poison!", self.name));
        }
        if !self.is_alive() {
            self.status_effects.clear();
        }
        lines
    }

    /// Weighted pick from the special-move table.
    pub fn choose_special<D: Dice + ?Sized>(&self, dice: &mut D) -> Option<&BossMove> {
        let total: u32 = self.moves.iter().map(|m| m.weight).sum();
        if total == 0 {
            return None;
        }
        let mut slot = dice.pick(total as usize) as u32;
        for mv in &self.moves {
            if slot < mv.weight {
                return Some(mv);
            }
            slot -= mv.weight;
        }
        self.moves.last()
    }

    pub fn describe(&self) -> String {
        if self.is_merchant() {
            return format!("{} - Shopkeeper", self.name);
        }
        let boss_tag = if self.is_boss() { " [Boss]" } else { "" };
        let state = if self.is_alive() { "Alive" } else { "Defeated" };
        if self.status_effects.is_empty() {
            format!("{}{} - {} HP - {}", self.name, boss_tag, self.hp, state)
        } else {
            let effects: Vec<String> = self.status_effects.iter().map(|e| e.to_string()).collect();
            format!(
                "{}{} - {} HP - {} ({})",
                self.name,
                boss_tag,
                self.hp,
                state,
                effects.join(", ")
            )
        }
    }
}

/// (name, hp, attack, defense, xp, gold) at level 1.
const ENEMY_TABLE: [(&str, u32, u32, u32, u32, u32); 10] = [
    ("Goblin", 8, 2, 1, 8, 4),
    ("Orc", 12, 3, 2, 12, 6),
    ("Troll", 15, 4, 2, 15, 8),
    ("Dragon", 20, 5, 3, 20, 10),
    ("Ghost", 10, 3, 1, 10, 5),
    ("Skeleton", 8, 2, 1, 8, 4),
    ("Zombie", 12, 2, 2, 10, 5),
    ("Witch", 8, 4, 1, 12, 6),
    ("Demon", 15, 4, 2, 15, 8),
    ("Giant Spider", 10, 3, 1, 10, 5),
];

/// Spawns a random enemy within two levels of the player.
pub fn random_enemy<D: Dice + ?Sized>(player_level: u32, drop_chance: f64, dice: &mut D) -> Npc {
    let (name, hp, attack, defense, xp, gold) = ENEMY_TABLE[dice.pick(ENEMY_TABLE.len())];
    let level = (player_level as i32 + dice.roll(-2, 2)).max(1) as u32;
    let mut drops = Vec::new();
    if dice.chance(drop_chance) {
        drops.push(random_item(level, dice));
    }
    Npc::enemy(name, level, hp, attack, defense, xp, gold).with_drops(drops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::ScriptedDice;

    #[test]
    fn enemy_stats_scale_with_level() {
        let goblin = Npc::enemy("Goblin", 1, 8, 2, 1, 8, 4);
        assert_eq!((goblin.hp, goblin.defense, goblin.loot_gold, goblin.xp_reward), (8, Some(1), 4, 8));

        let orc = Npc::enemy("Orc", 3, 12, 3, 2, 12, 6);
        assert_eq!(orc.hp, 22);
        assert_eq!(orc.max_hp, 22);
        assert_eq!(orc.attack_power, 7);
        assert_eq!(orc.defense, Some(4));
        assert_eq!(orc.loot_gold, 18);
        assert_eq!(orc.xp_reward, 36);
    }

    #[test]
    fn random_enemy_uses_table_and_clamps_level() {
        // pick Troll, level offset -2 from level 1 clamps to 1, no drop
        let mut dice = ScriptedDice::new().with_picks([2]).with_rolls([-2]);
        let troll = random_enemy(1, 0.3, &mut dice);
        assert_eq!(troll.name, "Troll");
        assert_eq!(troll.level, 1);
        assert!(troll.drops.is_empty());
        assert!(troll.is_hostile());

        let mut dice = ScriptedDice::new()
            .with_picks([0, 1, 0])
            .with_rolls([2])
            .with_chances([true]);
        let goblin = random_enemy(4, 0.3, &mut dice);
        assert_eq!(goblin.level, 6);
        assert_eq!(goblin.drops.len(), 1);
        assert_eq!(goblin.drops[0].name, "Leather Armor");
    }

    #[test]
    fn boss_heal_caps_at_hundred() {
        let mut guardian = Npc::boss("Forest Guardian", 100, 15, 50, 30);
        guardian.take_damage(10);
        assert_eq!(guardian.heal(20), 10);
        assert_eq!(guardian.hp, 100);

        let mut knight = Npc::boss("Shadow Knight", 150, 20, 100, 50);
        knight.take_damage(30);
        knight.heal(20);
        assert_eq!(knight.hp, 120, "hp above the cap is not reduced by healing");
    }

    #[test]
    fn status_ticks_and_clears_on_death() {
        let mut wyrm = Npc::boss("Cave Wyrm", 8, 18, 75, 40);
        wyrm.add_status(StatusEffect::Burning);
        wyrm.add_status(StatusEffect::Burning);
        wyrm.add_status(StatusEffect::Poisoned);
        assert_eq!(wyrm.status_effects.len(), 2);
        let lines = wyrm.process_status_effects();
        assert_eq!(lines.len(), 2);
        assert_eq!(wyrm.hp, 0);
        assert!(wyrm.status_effects.is_empty());
    }

    #[test]
    fn specials_follow_weighted_pick() {
        let guardian = Npc::boss("Forest Guardian", 100, 15, 50, 30);
        let mut dice = ScriptedDice::new().with_picks([1]);
        let mv = guardian.choose_special(&mut dice).unwrap();
        assert_eq!(mv.damage, -20);

        let ogre = Npc::boss("Ogre King", 90, 10, 10, 10);
        let mut dice = ScriptedDice::new();
        let mv = ogre.choose_special(&mut dice).unwrap();
        assert_eq!(mv.text, "Ogre King strikes with overwhelming force!");
        assert_eq!(mv.damage, 25);

        let rat = Npc::monster("Rat", 4, 1, 1, 1);
        assert!(rat.choose_special(&mut dice).is_none());
    }

    #[test]
    fn merchant_is_not_hostile() {
        let m = Npc::merchant("Wandering Merchant", Vec::new());
        assert!(!m.is_hostile());
        assert!(m.is_merchant());
        assert_eq!(m.hp, 100);
        assert_eq!(m.describe(), "Wandering Merchant - Shopkeeper");
    }
}
