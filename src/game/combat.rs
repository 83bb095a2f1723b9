//! Round-by-round combat resolution.
//!
//! [`resolve_round`] plays exactly one exchange: the player strikes, then a
//! surviving NPC answers and end-of-round statuses tick. The caller keeps the
//! [`CombatSession`] and applies [`award_victory`] or [`apply_defeat`] once a
//! round reports a finished fight.

use log::debug;
use serde::Serialize;

use crate::config::GameConfig;
use crate::game::dice::Dice;
use crate::game::npc::Npc;
use crate::game::player::Player;
use crate::game::types::{MitigationPolicy, StatusEffect};

/// An open fight between the player and one NPC in the current room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatSession {
    pub npc_id: u32,
    pub npc_name: String,
    pub turn: u32,
    pub log: Vec<String>,
}

impl CombatSession {
    pub fn new(npc: &Npc) -> Self {
        Self {
            npc_id: npc.id,
            npc_name: npc.name.clone(),
            turn: 0,
            log: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Ongoing,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub lines: Vec<String>,
    pub outcome: CombatOutcome,
}

fn roll_u32<D: Dice + ?Sized>(dice: &mut D, low: i32, high: i32) -> u32 {
    dice.roll(low, high).max(0) as u32
}

/// `roll(3,8) * level`, plus a weapon roll and any attack boost; a critical
/// doubles the total. Returns the damage and whether it was critical.
pub fn player_damage<D: Dice + ?Sized>(player: &Player, dice: &mut D, rules: &GameConfig) -> (u32, bool) {
    let mut damage = roll_u32(dice, 3, 8) * player.level;
    if let Some(weapon) = &player.weapon {
        if weapon.effect_value > 0 {
            damage += roll_u32(dice, 1, weapon.effect_value as i32);
        }
    }
    damage += player.attack_boost();
    let critical = dice.chance(rules.crit_chance);
    if critical {
        damage *= 2;
    }
    (damage, critical)
}

/// Damage an NPC actually takes under the given policy.
pub fn mitigate(npc: &Npc, damage: u32, policy: MitigationPolicy) -> u32 {
    match (policy, npc.defense) {
        (MitigationPolicy::EnemyDefense, Some(defense)) => damage.saturating_sub(defense).max(1),
        _ => damage,
    }
}

/// Armor rating used against ordinary blows.
fn armor_rating(player: &Player) -> u32 {
    player.armor.as_ref().map_or(0, |a| a.effect_value) + player.defense_boost()
}

fn npc_retaliate<D: Dice + ?Sized>(
    player: &mut Player,
    npc: &mut Npc,
    dice: &mut D,
    rules: &GameConfig,
    lines: &mut Vec<String>,
) {
    if npc.is_boss() && dice.chance(rules.boss_special_chance) {
        if let Some(mv) = npc.choose_special(dice).cloned() {
            lines.push(mv.text.clone());
            if mv.damage > 0 {
                player.take_damage(mv.damage as u32);
            } else if mv.damage < 0 {
                let healed = npc.heal(mv.damage.unsigned_abs());
                lines.push(format!("{} recovers {} HP.", npc.name, healed));
            }
            if let Some(effect) = mv.inflicts {
                player.add_status(effect);
                lines.push(format!("You are {}!", effect));
            }
            lines.push(format!("Your HP: {}", player.hp));
            return;
        }
    }

    let mut incoming = dice.roll(2, 6).max(0) as f64;
    if npc.is_boss() {
        incoming *= 1.5;
    }
    let armor = armor_rating(player);
    if armor > 0 {
        let reduction = (incoming * 0.3).min(armor as f64);
        incoming = (incoming - reduction).max(1.0);
        lines.push(format!("Your armor absorbs {:.1} damage!", reduction));
    }
    let dealt = player.take_damage(incoming.round() as u32);
    lines.push(format!("{} deals {} damage to you!", npc.name, dealt));
    lines.push(format!("Your HP: {}", player.hp));
}

/// Resolves one round between `player` and `npc`.
pub fn resolve_round<D: Dice + ?Sized>(
    player: &mut Player,
    npc: &mut Npc,
    dice: &mut D,
    rules: &GameConfig,
) -> RoundReport {
    let mut lines = Vec::new();

    if npc.is_alive() && player.is_alive() {
        if player.has_status(StatusEffect::Stunned) {
            player.clear_status(StatusEffect::Stunned);
            lines.push("You are stunned and cannot act!".to_string());
        } else {
            let (damage, critical) = player_damage(player, dice, rules);
            let dealt = npc.take_damage(mitigate(npc, damage, rules.mitigation));
            debug!("{} hits {} for {} (rolled {}, crit {})", player.name, npc.name, dealt, damage, critical);
            lines.push(format!(
                "You deal {} {}damage to {}!",
                dealt,
                if critical { "CRITICAL " } else { "" },
                npc.name
            ));
            lines.push(format!("{}'s HP: {}", npc.name, npc.hp));
        }

        if npc.is_alive() {
            npc_retaliate(player, npc, dice, rules, &mut lines);
            lines.extend(player.apply_status_damage());
            lines.extend(npc.process_status_effects());
            player.tick_statuses();
        }
    }

    let outcome = if !npc.is_alive() {
        CombatOutcome::Victory
    } else if !player.is_alive() {
        CombatOutcome::Defeat
    } else {
        CombatOutcome::Ongoing
    };
    RoundReport { lines, outcome }
}

/// Pays out loot and experience for a slain NPC. Bosses pay double.
pub fn award_victory<D: Dice + ?Sized>(player: &mut Player, npc: &Npc, dice: &mut D) -> Vec<String> {
    let mut gold = npc.loot_gold + roll_u32(dice, 1, 20);
    let mut xp = npc.xp_reward + roll_u32(dice, 5, 15);
    if npc.is_boss() {
        gold *= 2;
        xp *= 2;
    }
    player.gold += gold;
    player.clear_combat_statuses();
    let mut lines = vec![format!(
        "Victory! Defeated {} (+{} XP, +{} gold)",
        npc.name, xp, gold
    )];
    lines.extend(player.gain_xp(xp));
    lines
}

/// Half the gold is lost, hp comes back to `level * 50` and the player wakes
/// up in `start_room`.
pub fn apply_defeat(player: &mut Player, start_room: &str) -> Vec<String> {
    let lost = player.gold / 2;
    player.gold -= lost;
    player.hp = (player.level * 50).min(player.max_hp);
    player.statuses.clear();
    player.current_room = start_room.to_string();
    vec![
        format!("Defeated! Lost {} gold", lost),
        format!("Resurrected at the {}", start_room),
    ]
}
