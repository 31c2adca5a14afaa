use serde::{Deserialize, Serialize};
use crate::board;
use crate::chain::{Chain, ChainTable, CHAIN_ARRAY};
use crate::error::{GameError, InvalidAction};
use crate::tile::{Position, TileLocation};
use crate::{Game, Phase};

/// An order-of-magnitude count. Opponents' money and holdings are disclosed
/// only this coarsely; a player sees their own numbers exactly.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrcCount {
    #[default]
    Zero,
    One,
    Two,
    Many,
}

impl From<u32> for OrcCount {
    fn from(count: u32) -> Self {
        match count {
            0 => OrcCount::Zero,
            1 => OrcCount::One,
            2 => OrcCount::Two,
            _ => OrcCount::Many,
        }
    }
}

impl From<u8> for OrcCount {
    fn from(count: u8) -> Self {
        OrcCount::from(count as u32)
    }
}

/// What a player is allowed to see of an opponent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OpponentView {
    pub name: String,
    pub money: OrcCount,
    pub shares: ChainTable<OrcCount>,
    pub tiles_in_hand: usize,
}

/// A tile visible on the board. Loose tiles carry no chain tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardTileView {
    pub pos: Position,
    pub hotel: Option<Chain>,
}

/// The full state as one player sees it. Safe to serialize and ship to that
/// player's client: nothing in it leaks another player's hand or exact
/// holdings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub game_id: String,
    pub owner: String,
    pub phase: Phase,
    pub turn: u16,
    pub current_player: String,
    pub name: String,
    pub money: u32,
    pub shares: ChainTable<u8>,
    pub tiles: Vec<Position>,
    pub opponents: Vec<OpponentView>,
    pub board: Vec<BoardTileView>,
    pub bank_shares: ChainTable<u8>,
    pub chain_sizes: ChainTable<u16>,
    pub error: Option<GameError>,
}

pub fn player_view(player_name: &str, game: &Game) -> Result<PlayerView, GameError> {
    let player = game
        .players
        .iter()
        .find(|p| p.name == player_name)
        .ok_or_else(|| InvalidAction::UnknownPlayer(player_name.to_string()))?;

    let mut shares = ChainTable::new(0u8);
    let mut bank_shares = ChainTable::new(0u8);
    let mut chain_sizes = ChainTable::new(0u16);
    for chain in &CHAIN_ARRAY {
        shares.set(chain, game.hotel(*chain).holding(player.id));
        bank_shares.set(chain, game.hotel(*chain).remaining_shares());
        chain_sizes.set(chain, board::chain_size(&game.tiles, *chain));
    }

    let opponents = game
        .players
        .iter()
        .filter(|p| p.id != player.id)
        .map(|opponent| {
            let mut shares = ChainTable::new(OrcCount::Zero);
            for chain in &CHAIN_ARRAY {
                shares.set(chain, game.hotel(*chain).holding(opponent.id).into());
            }
            OpponentView {
                name: opponent.name.clone(),
                money: opponent.money.into(),
                shares,
                tiles_in_hand: game.hand(opponent.id).len(),
            }
        })
        .collect();

    let board = game
        .tiles
        .iter()
        .filter(|t| t.location == TileLocation::Board)
        .map(|t| BoardTileView {
            pos: t.pos,
            hotel: t.hotel,
        })
        .collect();

    Ok(PlayerView {
        game_id: game.game_id.clone(),
        owner: game.owner.clone(),
        phase: game.phase.clone(),
        turn: game.turn,
        current_player: game.players[game.current_player].name.clone(),
        name: player.name.clone(),
        money: player.money,
        shares,
        tiles: game.hand(player.id),
        opponents,
        board,
        bank_shares,
        chain_sizes,
        error: game.error.clone(),
    })
}
