//! The caller-owned game session.
//!
//! A [`GameSession`] holds the world, the player, the open fight (if any), the
//! dice and a bounded log of narrative messages. Every operation returns the
//! narrative it produced or a recoverable [`GameError`]; nothing here ends the
//! process.

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::combat::{apply_defeat, award_victory, resolve_round, CombatOutcome, CombatSession, RoundReport};
use crate::game::dice::Dice;
use crate::game::errors::{GameError, GameResult};
use crate::game::item::find_item;
use crate::game::player::Player;
use crate::game::quest::{starter_quests, QuestAction};
use crate::game::room::Room;
use crate::game::shop;
use crate::game::types::{CharacterClass, Direction, DoorState};
use crate::game::world::{World, CRYSTAL_CAVE, HIDDEN_CHAMBER, SECRET_PHRASE};
use crate::logutil::join_lines;

const CRYSTAL_SHARD: &str = "Crystal Shard";
const RESONANCE: &str = "The Crystal Shard resonates with the cave walls, revealing a hidden passage downward!";

/// Builds the canonical world and a fresh character standing at its start,
/// with the starter quests in the log.
pub fn start_new_game(class: CharacterClass, name: &str) -> GameResult<(World, Player)> {
    let world = World::canonical()?;
    let mut player = Player::new(name, class, world.starting_room());
    for quest in starter_quests() {
        quest.start(&mut player);
    }
    Ok((world, player))
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// Everything that exists only while a game is running.
#[derive(Debug, Clone)]
pub struct Adventure {
    pub world: World,
    pub player: Player,
    pub combat: Option<CombatSession>,
}

impl Adventure {
    fn current_room(&self) -> GameResult<&Room> {
        self.world.get(&self.player.current_room)
    }

    fn current_room_mut(&mut self) -> GameResult<&mut Room> {
        self.world.get_mut(&self.player.current_room)
    }

    fn ensure_peace(&self) -> GameResult<()> {
        match self.combat {
            Some(_) => Err(GameError::CombatInProgress),
            None => Ok(()),
        }
    }

    /// Holding the shard inside the Crystal Cave opens the way down.
    fn shard_resonance(&mut self) -> GameResult<Option<String>> {
        if self.player.current_room == CRYSTAL_CAVE
            && self.player.has_item(CRYSTAL_SHARD)
            && !self.world.passage_open()
        {
            self.world.reveal_hidden_chamber()?;
            return Ok(Some(RESONANCE.to_string()));
        }
        Ok(None)
    }

    fn boss_milestone(&mut self, boss: &str) -> GameResult<Option<String>> {
        let line = match boss {
            "Forest Guardian" => {
                self.world.unlock_temple()?;
                "The Sacred Grove is cleansed! The doors of the Shadow Temple grind open."
            }
            "Shadow Knight" => {
                self.player.secrets.insert("Shadow Knight Defeated".to_string());
                "The Shadow Knight's darkness lifts from the temple."
            }
            "Ancient Dragon" => {
                self.world.flags.final_boss_defeated = true;
                self.player.secrets.insert("Dragon Slayer".to_string());
                "The Ancient Dragon falls! The realm is saved. You are now known as Dragon Slayer."
            }
            _ => return Ok(None),
        };
        info!("{} reached milestone after defeating {}", self.player.name, boss);
        Ok(Some(line.to_string()))
    }
}

fn no_game() -> GameError {
    GameError::InvalidStateTransition("no game in progress".to_string())
}

fn not_fighting() -> GameError {
    GameError::InvalidStateTransition("you are not in combat".to_string())
}

pub struct GameSession<D: Dice = StdRng> {
    id: Uuid,
    config: GameConfig,
    dice: D,
    state: Option<Adventure>,
    log: VecDeque<LogEntry>,
}

impl GameSession<StdRng> {
    /// Seeded from `config.seed` when set, from entropy otherwise.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_dice(config, rng)
    }
}

impl<D: Dice> GameSession<D> {
    pub fn with_dice(config: GameConfig, dice: D) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            dice,
            state: None,
            log: VecDeque::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn in_combat(&self) -> bool {
        self.state.as_ref().map_or(false, |a| a.combat.is_some())
    }

    pub fn player(&self) -> Option<&Player> {
        self.state.as_ref().map(|a| &a.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.state.as_mut().map(|a| &mut a.player)
    }

    pub fn world(&self) -> Option<&World> {
        self.state.as_ref().map(|a| &a.world)
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.state.as_mut().map(|a| &mut a.world)
    }

    pub fn combat(&self) -> Option<&CombatSession> {
        self.state.as_ref().and_then(|a| a.combat.as_ref())
    }

    /// Most recent narrative, oldest first.
    pub fn message_log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    fn record(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        debug!("session {}: {}", self.id, join_lines(lines));
        let at = Utc::now();
        for line in lines {
            self.log.push_back(LogEntry {
                at,
                text: line.clone(),
            });
        }
        while self.log.len() > self.config.message_log_limit {
            self.log.pop_front();
        }
    }

    fn finish(&mut self, lines: Vec<String>) -> String {
        self.record(&lines);
        lines.join("\n")
    }

    fn adventure(&self) -> GameResult<&Adventure> {
        self.state.as_ref().ok_or_else(no_game)
    }

    fn parts(&mut self) -> GameResult<(&mut Adventure, &mut D, &GameConfig)> {
        let adventure = self.state.as_mut().ok_or_else(no_game)?;
        Ok((adventure, &mut self.dice, &self.config))
    }

    /// Replaces any running game with a fresh one.
    pub fn start_new_game(&mut self, class: CharacterClass, name: &str) -> GameResult<String> {
        let (world, player) = start_new_game(class, name)?;
        let player = player.with_capacity(self.config.inventory_capacity);
        info!("session {} started: {} the {}", self.id, player.name, class);
        let mut lines = vec![format!(
            "Welcome, {} the {}! Your adventure in the Mystic Realms begins.",
            player.name, player.title
        )];
        lines.push(world.get(&player.current_room)?.describe());
        self.log.clear();
        self.state = Some(Adventure {
            world,
            player,
            combat: None,
        });
        Ok(self.finish(lines))
    }

    /// Drops the running game.
    pub fn reset(&mut self) -> String {
        self.state = None;
        self.log.clear();
        info!("session {} reset", self.id);
        "The realm fades away. Start a new game to play again.".to_string()
    }

    pub fn move_player(&mut self, direction: Direction) -> GameResult<String> {
        let (adv, dice, rules) = self.parts()?;
        adv.ensure_peace()?;

        let here = adv.player.current_room.clone();
        let target = adv
            .world
            .exit_target(&here, direction)
            .ok_or_else(|| GameError::InvalidDirection(direction.to_string()))?
            .to_string();
        let dest = adv.world.get(&target)?;
        if dest.door_state == DoorState::Closed && !dest.is_secret {
            return Err(GameError::PassageSealed(direction));
        }

        let mut lines = vec![format!("You go {} to the {}.", direction, target)];
        let sealed = here == HIDDEN_CHAMBER && direction == Direction::Up;
        if sealed {
            adv.world.seal_hidden_chamber()?;
            lines.push("The passage seals behind you as you leave the chamber.".to_string());
        }

        adv.player.current_room = target.clone();
        adv.player.discovered_rooms.insert(target.clone());
        info!("{} moved {} from {} to {}", adv.player.name, direction, here, target);

        let room = adv.world.get_mut(&target)?;
        lines.extend(room.on_enter(&mut adv.player));
        lines.extend(room.enter(&mut adv.player, dice, rules));
        lines.push(room.describe());

        if !adv.player.is_alive() {
            let start = adv.world.starting_room().to_string();
            lines.extend(apply_defeat(&mut adv.player, &start));
        } else {
            lines.extend(adv.player.advance_quests(QuestAction::Visit, &target));
            // The shard stays quiet on the move that sealed the passage.
            if !sealed {
                lines.extend(adv.shard_resonance()?);
            }
        }
        Ok(self.finish(lines))
    }

    /// Opens a fight with a named NPC, or the first hostile one in the room.
    pub fn engage(&mut self, target: Option<&str>) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        adv.ensure_peace()?;
        let room = adv.current_room()?;
        let npc = match target {
            Some(name) => room
                .find_npc(name)
                .ok_or_else(|| GameError::NpcNotFound(name.trim().to_string()))?,
            None => room
                .npcs
                .iter()
                .find(|n| n.is_hostile())
                .ok_or_else(|| GameError::NpcNotFound("anyone hostile".to_string()))?,
        };
        if !npc.is_hostile() {
            return Err(GameError::NotHostile(npc.name.clone()));
        }
        let line = format!("You engage the {}! ({})", npc.name, npc.describe());
        debug!("{} engaged {} (id {})", adv.player.name, npc.name, npc.id);
        let combat = CombatSession::new(npc);
        adv.combat = Some(combat);
        Ok(self.finish(vec![line]))
    }

    /// Plays one round of the open fight.
    pub fn attack_round(&mut self) -> GameResult<RoundReport> {
        let (adv, dice, rules) = self.parts()?;
        let mut combat = adv.combat.take().ok_or_else(not_fighting)?;
        let room_name = adv.player.current_room.clone();
        let room = adv.world.get_mut(&room_name)?;
        let npc = match room.npc_mut(combat.npc_id) {
            Some(npc) => npc,
            None => return Err(GameError::NpcNotFound(combat.npc_name)),
        };

        combat.turn += 1;
        let mut report = resolve_round(&mut adv.player, npc, dice, rules);

        match report.outcome {
            CombatOutcome::Ongoing => {
                combat.log.extend(report.lines.iter().cloned());
                adv.combat = Some(combat);
            }
            CombatOutcome::Victory => {
                // Status damage can drop both sides in the same round.
                let fell = !adv.player.is_alive();
                if let Some(dead) = room.remove_npc(combat.npc_id) {
                    if !dead.drops.is_empty() {
                        let names: Vec<&str> = dead.drops.iter().map(|i| i.name.as_str()).collect();
                        report.lines.push(format!("The {} dropped: {}", dead.name, names.join(", ")));
                        room.items.extend(dead.drops.iter().cloned());
                    }
                    report.lines.extend(award_victory(&mut adv.player, &dead, dice));
                    report.lines.extend(adv.boss_milestone(&dead.name)?);
                    report
                        .lines
                        .extend(adv.player.advance_quests(QuestAction::Kill, &dead.name));
                    info!("{} defeated {} in {} turns", adv.player.name, dead.name, combat.turn);
                }
                if fell {
                    let start = adv.world.starting_room().to_string();
                    report.lines.extend(apply_defeat(&mut adv.player, &start));
                    info!("{} fell alongside {}", adv.player.name, combat.npc_name);
                }
            }
            CombatOutcome::Defeat => {
                let start = adv.world.starting_room().to_string();
                report.lines.extend(apply_defeat(&mut adv.player, &start));
                info!("{} fell to {}", adv.player.name, combat.npc_name);
            }
        }

        self.record(&report.lines);
        Ok(report)
    }

    /// Leaves the fight. Always succeeds and costs nothing.
    pub fn flee(&mut self) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        let combat = adv.combat.take().ok_or_else(not_fighting)?;
        Ok(self.finish(vec![format!("You flee from the {}!", combat.npc_name)]))
    }

    pub fn buy(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        adv.ensure_peace()?;
        let room = adv.world.get_mut(&adv.player.current_room)?;
        let merchant = room.merchant_mut().ok_or(GameError::NoMerchant)?;
        let trade = shop::buy(&mut adv.player, merchant, item_name)?;
        let line = format!("You bought {} for {} gold.", trade.item_name, trade.gold);
        Ok(self.finish(vec![line]))
    }

    pub fn sell(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        adv.ensure_peace()?;
        let room = adv.world.get(&adv.player.current_room)?;
        let merchant = room.merchant().ok_or(GameError::NoMerchant)?;
        let trade = shop::sell(&mut adv.player, merchant, item_name)?;
        let line = format!("You sold {} for {} gold.", trade.item_name, trade.gold);
        Ok(self.finish(vec![line]))
    }

    pub fn shop_listing(&self) -> GameResult<String> {
        let room = self.adventure()?.current_room()?;
        let merchant = room.merchant().ok_or(GameError::NoMerchant)?;
        Ok(shop::format_shop_listing(merchant))
    }

    /// During a fight only combat-usable items can be used.
    pub fn use_item(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        if adv.combat.is_some() {
            let idx = find_item(&adv.player.inventory, item_name)
                .ok_or_else(|| GameError::ItemNotFound(item_name.trim().to_string()))?;
            if !adv.player.inventory[idx].combat_usable {
                return Err(GameError::CombatInProgress);
            }
        }
        let line = adv.player.use_item(item_name)?;
        Ok(self.finish(vec![line]))
    }

    pub fn pick_up(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        adv.ensure_peace()?;
        let room_name = adv.player.current_room.clone();
        let room = adv.world.get_mut(&room_name)?;
        let item = room.take_item(item_name)?;
        let name = item.name.clone();
        if let Err(e) = adv.player.add_item(item.clone()) {
            room.items.push(item);
            return Err(e);
        }
        let mut lines = vec![format!("You picked up the {}.", name)];
        lines.extend(adv.player.advance_quests(QuestAction::Collect, &name));
        lines.extend(adv.shard_resonance()?);
        Ok(self.finish(lines))
    }

    pub fn drop(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        let item = adv.player.remove_item(item_name)?;
        let line = format!("You dropped the {}.", item.name);
        adv.current_room_mut()?.items.push(item);
        Ok(self.finish(vec![line]))
    }

    pub fn open_chest(&mut self) -> GameResult<String> {
        let (adv, dice, _) = self.parts()?;
        let room_name = adv.player.current_room.clone();
        let line = adv.world.get_mut(&room_name)?.open_chest(&mut adv.player, dice)?;
        Ok(self.finish(vec![line]))
    }

    /// Looks for traps here and in every neighbouring room.
    pub fn search(&mut self) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        let here = adv.player.current_room.clone();
        let mut places = vec![here.clone()];
        places.extend(adv.current_room()?.exits.values().cloned());

        let mut lines = Vec::new();
        for place in places {
            if let Some(room) = adv.world.room_mut(&place) {
                if let Some(trap) = room.detect_trap() {
                    if place == here {
                        lines.push(format!("You spot a {} trap right here!", trap.kind));
                    } else {
                        lines.push(format!("You sense a {} trap in the {}.", trap.kind, place));
                    }
                }
            }
        }
        if lines.is_empty() {
            lines.push("You search carefully but find nothing unusual.".to_string());
        }
        Ok(self.finish(lines))
    }

    /// Words spoken aloud. The right phrase in the Crystal Cave opens the way
    /// down.
    pub fn speak(&mut self, phrase: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        let spoken = phrase.trim().to_ascii_lowercase();
        let line = if adv.player.current_room == CRYSTAL_CAVE && spoken == SECRET_PHRASE {
            if adv.world.reveal_hidden_chamber()? {
                "The cavern walls answer your words! A hidden passage opens below."
            } else {
                "The cavern hums softly. The passage below already stands open."
            }
        } else {
            "Your words echo and fade."
        };
        Ok(self.finish(vec![line.to_string()]))
    }

    pub fn cast(&mut self, spell: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        let spell = spell.trim().to_ascii_lowercase();
        if !adv.player.knows_spell(&spell) {
            return Err(GameError::UnknownSpell(spell));
        }
        let line = match spell.as_str() {
            "reveal" if adv.player.current_room == CRYSTAL_CAVE => {
                if adv.world.reveal_hidden_chamber()? {
                    "Arcane light floods the cave, revealing a hidden passage downward!"
                } else {
                    "The spell shows the passage below is already open."
                }
            }
            "reveal" => "The spell reveals nothing hidden here.",
            _ => return Err(GameError::UnknownSpell(spell.clone())),
        };
        Ok(self.finish(vec![line.to_string()]))
    }

    /// Takes one item from the room's offering.
    pub fn claim(&mut self, item_name: &str) -> GameResult<String> {
        let (adv, _, _) = self.parts()?;
        if let Some(cap) = adv.player.capacity {
            if adv.player.inventory.len() >= cap {
                return Err(GameError::InventoryFull(cap));
            }
        }
        let room_name = adv.player.current_room.clone();
        let item = adv.world.get_mut(&room_name)?.claim_offering(item_name)?;
        let line = format!(
            "You claim the {}. The other artifacts fade into light.",
            item.name
        );
        adv.player.add_item(item)?;
        Ok(self.finish(vec![line]))
    }

    pub fn look(&self) -> GameResult<String> {
        Ok(self.adventure()?.current_room()?.describe())
    }

    pub fn status(&self) -> GameResult<String> {
        let adv = self.adventure()?;
        let mut out = adv.player.status_summary();
        out.push_str(&format!("\nLocation: {}", adv.player.current_room));
        if let Some(combat) = &adv.combat {
            out.push_str(&format!("\nFighting: {} (turn {})", combat.npc_name, combat.turn));
        }
        if !adv.player.secrets.is_empty() {
            let names: Vec<&str> = adv.player.secrets.iter().map(String::as_str).collect();
            out.push_str(&format!("\nMilestones: {}", names.join(", ")));
        }
        Ok(out)
    }

    pub fn inventory(&self) -> GameResult<String> {
        Ok(self.adventure()?.player.inventory_listing())
    }

    pub fn quest_log(&self) -> GameResult<String> {
        let adv = self.adventure()?;
        if adv.player.quests.is_empty() {
            return Ok("You have no quests.".to_string());
        }
        let lines: Vec<String> = adv.player.quests.values().map(|q| q.show_status()).collect();
        Ok(format!("Quest Log:\n{}", lines.join("\n")))
    }
}
