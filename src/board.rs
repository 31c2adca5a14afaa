use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::chain::{Chain, CHAIN_ARRAY};
use crate::error::ProcessingError;
use crate::shares::Hotel;
use crate::tile::{Position, Tile, TileLocation, COLS, ROWS};
use crate::PlayerId;

pub const SAFE_HOTEL_SIZE: u16 = 11;
pub const GAME_ENDING_HOTEL_SIZE: u16 = 41;

/// In-bounds orthogonal neighbours, 2 to 4 depending on edges and corners.
pub fn adjacent_positions(pos: Position) -> Vec<Position> {
    let mut neighbours = Vec::with_capacity(4);
    if pos.row > 0 {
        neighbours.push(Position::new(pos.row - 1, pos.col));
    }
    if pos.col > 0 {
        neighbours.push(Position::new(pos.row, pos.col - 1));
    }
    if pos.row + 1 < ROWS {
        neighbours.push(Position::new(pos.row + 1, pos.col));
    }
    if pos.col + 1 < COLS {
        neighbours.push(Position::new(pos.row, pos.col + 1));
    }
    neighbours
}

pub fn tile_index(tiles: &[Tile], pos: Position) -> Option<usize> {
    tiles.iter().position(|t| t.pos == pos)
}

/// The tile at `pos` if it is on the board.
pub fn board_tile(tiles: &[Tile], pos: Position) -> Option<&Tile> {
    tiles.iter().find(|t| t.pos == pos && t.is_on_board())
}

pub fn chain_size(tiles: &[Tile], chain: Chain) -> u16 {
    tiles
        .iter()
        .filter(|t| t.is_on_board() && t.hotel == Some(chain))
        .count() as u16
}

pub fn is_safe(tiles: &[Tile], chain: Chain) -> bool {
    chain_size(tiles, chain) >= SAFE_HOTEL_SIZE
}

/// Chains with at least one tile on the board.
pub fn active_chains(tiles: &[Tile]) -> Vec<Chain> {
    CHAIN_ARRAY
        .iter()
        .filter(|chain| chain_size(tiles, **chain) > 0)
        .copied()
        .collect()
}

/// A tile is dead when two or more of its neighbours belong to distinct safe
/// chains: playing it would merge chains that may no longer be merged.
/// Asking about a tile already on the board is a caller bug.
pub fn is_dead(tiles: &[Tile], pos: Position) -> Result<bool, ProcessingError> {
    if board_tile(tiles, pos).is_some() {
        return Err(ProcessingError::TileAlreadyOnBoard(pos));
    }

    let safe_neighbour_chains = adjacent_positions(pos)
        .into_iter()
        .filter_map(|p| board_tile(tiles, p))
        .filter_map(|t| t.hotel)
        .unique()
        .filter(|chain| is_safe(tiles, *chain))
        .count();

    Ok(safe_neighbour_chains >= 2)
}

/// Draws up to `count` playable tiles from the bag into the player's hand.
/// Dead tiles drawn along the way are permanently removed from play and the
/// draw continues to make up the shortfall; stops when the bag runs out.
pub fn draw_tiles<R: Rng>(
    tiles: &mut [Tile],
    rng: &mut R,
    player_id: PlayerId,
    count: usize,
) -> Result<usize, ProcessingError> {
    let mut bag: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.location == TileLocation::Bag)
        .map(|(idx, _)| idx)
        .collect();
    bag.shuffle(rng);

    let mut drawn = 0;
    for idx in bag {
        if drawn == count {
            break;
        }

        let pos = tiles[idx].pos;
        if is_dead(tiles, pos)? {
            log::debug!("tile {} drawn dead, removed from play", pos);
            tiles[idx].location = TileLocation::Dead;
        } else {
            tiles[idx].location = TileLocation::Player(player_id);
            drawn += 1;
        }
    }

    Ok(drawn)
}

/// Swaps out any hand tiles that have become dead, drawing replacements.
/// Returns the number of tiles replaced.
pub fn replace_dead_hand_tiles<R: Rng>(
    tiles: &mut [Tile],
    rng: &mut R,
    player_id: PlayerId,
) -> Result<usize, ProcessingError> {
    let hand: Vec<usize> = tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.location == TileLocation::Player(player_id))
        .map(|(idx, _)| idx)
        .collect();

    let mut removed = 0;
    for idx in hand {
        let pos = tiles[idx].pos;
        if is_dead(tiles, pos)? {
            log::debug!("hand tile {} is dead, replacing", pos);
            tiles[idx].location = TileLocation::Dead;
            removed += 1;
        }
    }

    if removed > 0 {
        draw_tiles(tiles, rng, player_id, removed)?;
    }

    Ok(removed)
}

/// What a freshly placed tile does to the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlacementOutcome {
    /// No adjacent chains or loose tiles; the tile sits loose.
    Simple,
    /// Exactly one adjacent chain; the tile and any adjacent loose tiles join it.
    Extend {
        chain: Chain,
        absorbed: Vec<Position>,
    },
    /// Adjacent loose tiles and at least one chain left to found.
    FoundCandidate {
        tiles: Vec<Position>,
        available: Vec<Chain>,
    },
    /// Two or more distinct adjacent chains.
    Merger {
        chains: Vec<Chain>,
        additional_tiles: Vec<Position>,
    },
}

/// Classifies the placement of the tile at `pos` (already on the board) from
/// its neighbours. A found candidate degrades to a simple placement when no
/// unfounded chain has bank shares left to award.
pub fn classify_placement(tiles: &[Tile], hotels: &[Hotel], pos: Position) -> PlacementOutcome {
    let neighbours: Vec<&Tile> = adjacent_positions(pos)
        .into_iter()
        .filter_map(|p| board_tile(tiles, p))
        .collect();

    let chains: Vec<Chain> = neighbours
        .iter()
        .filter_map(|t| t.hotel)
        .unique()
        .sorted_by_key(|chain| chain.as_index())
        .collect();

    let loose: Vec<Position> = neighbours
        .iter()
        .filter(|t| t.is_loose())
        .map(|t| t.pos)
        .collect();

    match chains.len() {
        0 if loose.is_empty() => PlacementOutcome::Simple,

        0 => {
            let available: Vec<Chain> = CHAIN_ARRAY
                .iter()
                .filter(|chain| chain_size(tiles, **chain) == 0)
                .filter(|chain| hotels[chain.as_index()].remaining_shares() > 0)
                .copied()
                .collect();

            if available.is_empty() {
                // nothing to found, the tiles stay loose
                PlacementOutcome::Simple
            } else {
                let mut candidate_tiles = vec![pos];
                candidate_tiles.extend(loose);
                PlacementOutcome::FoundCandidate {
                    tiles: candidate_tiles,
                    available,
                }
            }
        }

        1 => PlacementOutcome::Extend {
            chain: chains[0],
            absorbed: loose,
        },

        _ => {
            let mut additional_tiles = vec![pos];
            additional_tiles.extend(loose);
            PlacementOutcome::Merger {
                chains,
                additional_tiles,
            }
        }
    }
}

/// Tags the given board positions with a chain.
pub fn set_hotel(tiles: &mut [Tile], positions: &[Position], chain: Chain) {
    for tile in tiles.iter_mut() {
        if tile.is_on_board() && positions.contains(&tile.pos) {
            tile.hotel = Some(chain);
        }
    }
}

/// Re-tags every tile of `from` as belonging to `to`, vacating `from`.
/// Returns the number of tiles folded in.
pub fn retag_chain(tiles: &mut [Tile], from: Chain, to: Chain) -> u16 {
    let mut folded = 0;
    for tile in tiles.iter_mut() {
        if tile.is_on_board() && tile.hotel == Some(from) {
            tile.hotel = Some(to);
            folded += 1;
        }
    }
    folded
}
