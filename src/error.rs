use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::chain::Chain;
use crate::tile::Position;

/// A rejected action. `Invalid` means the acting client can correct and
/// retry; `Processing` means an engine invariant was violated and the state
/// should be investigated rather than retried.
#[derive(Error, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameError {
    #[error(transparent)]
    Invalid(#[from] InvalidAction),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl GameError {
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, GameError::Invalid(_))
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, GameError::Processing(_))
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum InvalidAction {
    #[error("no player named '{0}' is in this game")]
    UnknownPlayer(String),
    #[error("it is not {0}'s turn to act")]
    OutOfTurn(String),
    #[error("'{0}' is not the game owner")]
    NotOwner(String),
    #[error("a {action} action is not allowed during the {phase} phase")]
    WrongPhase { action: String, phase: String },
    #[error("the name '{0}' is already taken")]
    NameTaken(String),
    #[error("'{0}' is not a usable player name")]
    NameInvalid(String),
    #[error("the game already has the maximum number of players")]
    LobbyFull,
    #[error("at least two players are required to start")]
    NotEnoughPlayers,
    #[error("the game owner cannot leave their own game")]
    CannotRemoveOwner,
    #[error("tile {0} is not in the player's hand")]
    TileNotInHand(Position),
    #[error("tile {0} cannot be played, it would join two safe chains")]
    TileUnplayable(Position),
    #[error("{0} is not one of the chains available to found")]
    HotelNotAvailable(Chain),
    #[error("{0} has no tiles on the board")]
    HotelNotOnBoard(Chain),
    #[error("the bank has {available} {chain} shares, not {requested}")]
    NotEnoughBankShares {
        chain: Chain,
        requested: u8,
        available: u8,
    },
    #[error("purchase costs ${need} but the player has ${have}")]
    InsufficientFunds { need: u32, have: u32 },
    #[error("cannot buy {0} shares, the limit is 3 per turn")]
    BuyLimitExceeded(u32),
    #[error("player holds {holding} shares of the merged chain, not {requested}")]
    NotEnoughShares { holding: u8, requested: u16 },
    #[error("trade-in amount {0} is not even")]
    OddTradeIn(u8),
    #[error("{0} is not one of the tied chains")]
    NotInTiedSet(Chain),
    #[error("{0} is safe and cannot be merged away")]
    SafeHotelMerge(Chain),
}

#[derive(Error, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProcessingError {
    #[error("no price bracket covers {chain} at size {size}")]
    NoPriceBracket { chain: Chain, size: u16 },
    #[error("tile {0} is already on the board")]
    TileAlreadyOnBoard(Position),
    #[error("no tile exists at {0}")]
    NoSuchTile(Position),
    #[error("merged chain {0} has no stockholders")]
    NoStockholders(Chain),
    #[error("settlement queue is empty while resolving a merger")]
    EmptySettlementQueue,
}
