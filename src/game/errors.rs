use thiserror::Error;

use crate::game::types::Direction;

/// Recoverable failures surfaced by engine operations.
///
/// None of these end the session; the caller reports them and waits for the
/// next command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// No exit in that direction, or the word is not a direction at all.
    #[error("you can't go {0} from here")]
    InvalidDirection(String),

    /// Movement, trading and pickup are blocked while a fight is open.
    #[error("you are in the middle of combat")]
    CombatInProgress,

    /// Lookup by name failed in the relevant container.
    #[error("there is no {0} here")]
    ItemNotFound(String),

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("your pack is full ({0} items)")]
    InventoryFull(usize),

    /// The operation does not fit the current session state (no game started,
    /// no active combat, artifact already claimed, ...).
    #[error("invalid action: {0}")]
    InvalidStateTransition(String),

    #[error("nobody called {0} is here")]
    NpcNotFound(String),

    #[error("{0} is not looking for a fight")]
    NotHostile(String),

    #[error("there is no merchant here")]
    NoMerchant,

    #[error("you can't use the {0} like that")]
    ItemNotUsable(String),

    /// A sealed passage exists on this side but is currently closed.
    #[error("the way {0} is sealed")]
    PassageSealed(Direction),

    #[error("room '{0}' does not exist")]
    UnknownRoom(String),

    #[error("you don't know the spell {0}")]
    UnknownSpell(String),

    #[error("unrecognized command: {0}")]
    UnknownCommand(String),

    #[error("there is nothing here to open")]
    NothingToOpen,

    /// Holds the name of the key that would open it.
    #[error("it is locked; you need the {0}")]
    Locked(String),
}

pub type GameResult<T> = Result<T, GameError>;
