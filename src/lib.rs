//! # Mystic Realms - a turn-based fantasy adventure engine
//!
//! Mystic Realms is a single-player text RPG. A character explores a graph of
//! rooms, fights monsters and bosses in discrete rounds, trades with
//! merchants, carries items and completes quests.
//!
//! ## Features
//!
//! - **World Graph**: Named rooms joined by directional exits, with traps, chests, secret rooms and room events.
//! - **Round Combat**: Deterministic for a given dice source, with criticals, boss special moves and status effects.
//! - **Economy**: Merchants with finite stock, buying and selling.
//! - **Progression**: Flat leveling, equipment, potions, spells and starter quests.
//! - **Replayable**: All randomness flows through the [`game::Dice`] trait; seed it or script it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mystic_realms::config::Config;
//! use mystic_realms::game::{CharacterClass, Direction, GameSession};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let mut session = GameSession::new(config.game);
//!     println!("{}", session.start_new_game(CharacterClass::Knight, "Ada")?);
//!     println!("{}", session.move_player(Direction::South)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Engine: world, characters, combat, shop, quests and the session
//! - [`config`] - Configuration loading
//! - [`logutil`] - Single-line formatting for log output

pub mod config;
pub mod game;
pub mod logutil;
