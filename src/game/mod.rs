//! Game engine: world graph, characters, combat, trading and quests.
//! Everything here is synchronous and draws its randomness from a [`Dice`]
//! so whole sessions can be replayed from a seed or a script.

pub mod combat;
pub mod commands;
pub mod dice;
pub mod errors;
pub mod item;
pub mod npc;
pub mod player;
pub mod quest;
pub mod room;
pub mod session;
pub mod shop;
pub mod types;
pub mod world;

pub use combat::{apply_defeat, award_victory, resolve_round, CombatOutcome, CombatSession, RoundReport};
pub use commands::{parse_command, PlayerCommand, HELP_TEXT};
pub use dice::{Dice, ScriptedDice};
pub use errors::{GameError, GameResult};
pub use item::{Item, ItemEffects, ItemType, Rarity};
pub use npc::{BossMove, Npc, NpcFlag};
pub use player::Player;
pub use quest::{Quest, QuestAction, QuestReward, QuestState};
pub use room::{Chest, Offering, Room, Trap};
pub use session::{start_new_game, Adventure, GameSession, LogEntry};
pub use shop::{format_shop_listing, ShopEntry, Trade};
pub use types::*;
pub use world::{QuestFlags, RoomSummary, World};
