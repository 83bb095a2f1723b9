//! Text commands for the line-oriented front end.
//!
//! [`parse_command`] turns a typed line into a [`PlayerCommand`];
//! [`GameSession::dispatch`] runs it and returns the narrative to print.

use std::str::FromStr;

use crate::game::combat::{CombatOutcome, RoundReport};
use crate::game::dice::Dice;
use crate::game::errors::{GameError, GameResult};
use crate::game::session::GameSession;
use crate::game::types::{CharacterClass, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Move(Direction),
    /// Starts a fight when none is open, then plays a round.
    Attack(Option<String>),
    Flee,
    Buy(String),
    Sell(String),
    Shop,
    Use(String),
    Take(String),
    Drop(String),
    Open,
    Search,
    Say(String),
    Cast(String),
    Claim(String),
    Look,
    Status,
    Inventory,
    Quests,
    Help,
    NewGame(CharacterClass),
    Reset,
    Quit,
}

pub const HELP_TEXT: &str = "Commands:
  n/s/e/w/up/down (or go <dir>)   move
  look                            describe the room
  attack [name] / flee            fight or run
  take/drop/use <item>            handle items
  shop, buy <item>, sell <item>   trade with a merchant
  open, search                    chests and traps
  say <words>, cast <spell>       speak or use magic
  claim <item>                    take an offered artifact
  status, inventory, quests       character info
  new <knight|mage|archer>, reset, quit";

fn required(arg: &str, raw: &str) -> GameResult<String> {
    if arg.is_empty() {
        Err(GameError::UnknownCommand(raw.to_string()))
    } else {
        Ok(arg.to_string())
    }
}

fn optional(arg: &str) -> Option<String> {
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

/// Parses one typed line. Verbs are case-insensitive; arguments keep their
/// spelling.
pub fn parse_command(raw: &str) -> GameResult<PlayerCommand> {
    let line = raw.trim();
    if line.is_empty() {
        return Err(GameError::UnknownCommand(String::new()));
    }
    if line.chars().all(|c| c == '?' || c.is_whitespace()) {
        return Ok(PlayerCommand::Help);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v.to_ascii_lowercase(), r.trim()),
        None => (line.to_ascii_lowercase(), ""),
    };

    if rest.is_empty() {
        if let Ok(dir) = Direction::from_str(&verb) {
            return Ok(PlayerCommand::Move(dir));
        }
    }

    let cmd = match verb.as_str() {
        "go" | "move" | "walk" => PlayerCommand::Move(Direction::from_str(rest)?),
        "attack" | "a" | "fight" | "kill" => PlayerCommand::Attack(optional(rest)),
        "flee" | "run" => PlayerCommand::Flee,
        "buy" | "purchase" => PlayerCommand::Buy(required(rest, line)?),
        "sell" => PlayerCommand::Sell(required(rest, line)?),
        "shop" | "list" | "wares" => PlayerCommand::Shop,
        "use" | "drink" | "equip" | "wield" | "read" => PlayerCommand::Use(required(rest, line)?),
        "take" | "get" | "grab" => PlayerCommand::Take(required(rest, line)?),
        "pick" => {
            let item = match rest.get(..3) {
                Some(prefix) if prefix.eq_ignore_ascii_case("up ") => rest[3..].trim(),
                _ => rest,
            };
            PlayerCommand::Take(required(item, line)?)
        }
        "drop" => PlayerCommand::Drop(required(rest, line)?),
        "open" => PlayerCommand::Open,
        "search" => PlayerCommand::Search,
        "say" | "speak" => PlayerCommand::Say(required(rest, line)?),
        "cast" => PlayerCommand::Cast(required(rest, line)?),
        "claim" => PlayerCommand::Claim(required(rest, line)?),
        "look" | "l" => PlayerCommand::Look,
        "status" | "stats" | "st" => PlayerCommand::Status,
        "inventory" | "inv" | "i" => PlayerCommand::Inventory,
        "quests" | "journal" | "j" => PlayerCommand::Quests,
        "help" | "h" => PlayerCommand::Help,
        "new" | "start" => PlayerCommand::NewGame(
            CharacterClass::from_str(rest).map_err(|_| GameError::UnknownCommand(line.to_string()))?,
        ),
        "reset" => PlayerCommand::Reset,
        "quit" | "exit" | "q" => PlayerCommand::Quit,
        _ => return Err(GameError::UnknownCommand(line.to_string())),
    };
    Ok(cmd)
}

fn render_round(report: &RoundReport) -> String {
    let mut lines = report.lines.clone();
    match report.outcome {
        CombatOutcome::Ongoing => lines.push("The fight goes on. Attack or flee?".to_string()),
        CombatOutcome::Victory | CombatOutcome::Defeat => {}
    }
    lines.join("\n")
}

impl<D: Dice> GameSession<D> {
    /// Runs a parsed command. New games use the configured player name.
    pub fn dispatch(&mut self, command: PlayerCommand) -> GameResult<String> {
        match command {
            PlayerCommand::Move(dir) => self.move_player(dir),
            PlayerCommand::Attack(target) => {
                let mut out = String::new();
                if !self.in_combat() {
                    out = self.engage(target.as_deref())?;
                    out.push('\n');
                }
                let report = self.attack_round()?;
                out.push_str(&render_round(&report));
                Ok(out)
            }
            PlayerCommand::Flee => self.flee(),
            PlayerCommand::Buy(item) => self.buy(&item),
            PlayerCommand::Sell(item) => self.sell(&item),
            PlayerCommand::Shop => self.shop_listing(),
            PlayerCommand::Use(item) => self.use_item(&item),
            PlayerCommand::Take(item) => self.pick_up(&item),
            PlayerCommand::Drop(item) => self.drop(&item),
            PlayerCommand::Open => self.open_chest(),
            PlayerCommand::Search => self.search(),
            PlayerCommand::Say(words) => self.speak(&words),
            PlayerCommand::Cast(spell) => self.cast(&spell),
            PlayerCommand::Claim(item) => self.claim(&item),
            PlayerCommand::Look => self.look(),
            PlayerCommand::Status => self.status(),
            PlayerCommand::Inventory => self.inventory(),
            PlayerCommand::Quests => self.quest_log(),
            PlayerCommand::Help => Ok(HELP_TEXT.to_string()),
            PlayerCommand::NewGame(class) => {
                let name = self.config().player_name.clone();
                self.start_new_game(class, &name)
            }
            PlayerCommand::Reset => Ok(self.reset()),
            PlayerCommand::Quit => Ok("Farewell, adventurer.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::dice::ScriptedDice;

    #[test]
    fn bare_directions_and_go() {
        assert_eq!(parse_command("n").unwrap(), PlayerCommand::Move(Direction::North));
        assert_eq!(parse_command("  DOWN ").unwrap(), PlayerCommand::Move(Direction::Down));
        assert_eq!(parse_command("go east").unwrap(), PlayerCommand::Move(Direction::East));
        assert_eq!(
            parse_command("go sideways"),
            Err(GameError::InvalidDirection("sideways".into()))
        );
    }

    #[test]
    fn item_verbs_keep_arguments() {
        assert_eq!(
            parse_command("BUY Health Potion").unwrap(),
            PlayerCommand::Buy("Health Potion".into())
        );
        assert_eq!(
            parse_command("pick up Crystal Shard").unwrap(),
            PlayerCommand::Take("Crystal Shard".into())
        );
        assert_eq!(
            parse_command("say whispers of the ancients").unwrap(),
            PlayerCommand::Say("whispers of the ancients".into())
        );
        assert_eq!(parse_command("attack").unwrap(), PlayerCommand::Attack(None));
        assert_eq!(
            parse_command("attack cave wyrm").unwrap(),
            PlayerCommand::Attack(Some("cave wyrm".into()))
        );
    }

    #[test]
    fn help_and_errors() {
        assert_eq!(parse_command("?").unwrap(), PlayerCommand::Help);
        assert_eq!(parse_command(" ?? ").unwrap(), PlayerCommand::Help);
        assert_eq!(parse_command("buy"), Err(GameError::UnknownCommand("buy".into())));
        assert_eq!(parse_command("dance"), Err(GameError::UnknownCommand("dance".into())));
        assert_eq!(
            parse_command("new mage").unwrap(),
            PlayerCommand::NewGame(CharacterClass::Mage)
        );
        assert!(parse_command("new bard").is_err());
    }

    #[test]
    fn dispatch_starts_and_looks() {
        let config = GameConfig {
            player_name: "Quill".into(),
            ..GameConfig::default()
        };
        let mut session = GameSession::with_dice(config, ScriptedDice::new());
        let intro = session.dispatch(PlayerCommand::NewGame(CharacterClass::Archer)).unwrap();
        assert!(intro.contains("Welcome, Quill the Swift Archer!"));
        assert!(session.dispatch(PlayerCommand::Look).unwrap().starts_with("Sacred Grove"));
        assert!(session.dispatch(PlayerCommand::Help).unwrap().contains("Commands:"));
    }
}
