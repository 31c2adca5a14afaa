mod board;
mod chain;
mod error;
mod merge;
mod money;
mod player;
mod shares;
mod tile;
mod view;

use std::fmt::{Debug, Display, Formatter};
use ahash::HashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use board::{
    adjacent_positions, chain_size, classify_placement, draw_tiles, is_dead, PlacementOutcome,
    GAME_ENDING_HOTEL_SIZE, SAFE_HOTEL_SIZE,
};
pub use chain::{Chain, ChainTable, Tier, CHAIN_ARRAY};
pub use error::{GameError, InvalidAction, ProcessingError};
pub use merge::{
    resolve_merger, MergeContext, MergeResolution, MergerTieContext, SettlementDecision,
};
pub use money::{majority_minority, share_price};
pub use player::Player;
pub use shares::{Hotel, ShareLocation, SHARES_PER_HOTEL};
pub use tile::{Position, Tile, TileLocation, COLS, ROWS};
pub use view::{player_view, BoardTileView, OpponentView, OrcCount, PlayerView};

use tile::TileLocation as Loc;

pub const STARTING_MONEY: u32 = 6000;
pub const HAND_SIZE: usize = 6;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
pub const BUY_LIMIT: u32 = 3;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl Debug for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("P_{}", self.0))
    }
}

/// Transient state while the founder of a new chain picks its name. Lives
/// only in `Phase::FoundHotel`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FoundHotelContext {
    pub available_hotels: Vec<Chain>,
    pub tiles: Vec<Position>,
}

/// The turn state machine. Phases that need mid-turn context carry it, so a
/// context can neither outlive its phase nor be missing inside it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    WaitingForPlayers,
    PlayTile,
    FoundHotel(FoundHotelContext),
    ResolveMerger(MergeContext),
    BreakMergerTie(MergerTieContext),
    BuyShares,
    GameOver,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::WaitingForPlayers => "WAITING_FOR_PLAYERS",
            Phase::PlayTile => "PLAY_TILE",
            Phase::FoundHotel(_) => "FOUND_HOTEL",
            Phase::ResolveMerger(_) => "RESOLVE_MERGER",
            Phase::BreakMergerTie(_) => "BREAK_MERGER_TIE",
            Phase::BuyShares => "BUY_SHARES",
            Phase::GameOver => "GAME_OVER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    AddPlayer {
        player: String,
    },
    RemovePlayer {
        player: String,
    },
    StartGame {
        player: String,
    },
    PlayTile {
        player: String,
        tile: Position,
    },
    BuyShares {
        player: String,
        shares: HashMap<Chain, u8>,
    },
    FoundHotel {
        player: String,
        hotel: Chain,
    },
    ResolveMerger {
        player: String,
        shares: Option<SettlementDecision>,
    },
    BreakMergerTie {
        player: String,
        survivor: Chain,
        merged: Chain,
    },
}

impl GameAction {
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::AddPlayer { .. } => "ADD_PLAYER",
            GameAction::RemovePlayer { .. } => "REMOVE_PLAYER",
            GameAction::StartGame { .. } => "START_GAME",
            GameAction::PlayTile { .. } => "PLAY_TILE",
            GameAction::BuyShares { .. } => "BUY_SHARES",
            GameAction::FoundHotel { .. } => "FOUND_HOTEL",
            GameAction::ResolveMerger { .. } => "RESOLVE_MERGER",
            GameAction::BreakMergerTie { .. } => "BREAK_MERGER_TIE",
        }
    }
}

impl Display for GameAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameAction::AddPlayer { player } => {
                f.write_fmt(format_args!("{player} joins the game"))
            }
            GameAction::RemovePlayer { player } => {
                f.write_fmt(format_args!("{player} leaves the game"))
            }
            GameAction::StartGame { player } => {
                f.write_fmt(format_args!("{player} starts the game"))
            }
            GameAction::PlayTile { player, tile } => {
                f.write_fmt(format_args!("{player} places tile {tile}"))
            }
            GameAction::BuyShares { player, shares } => {
                let total: u32 = shares.values().map(|n| *n as u32).sum();
                if total == 0 {
                    f.write_fmt(format_args!("{player} buys nothing"))
                } else {
                    f.write_fmt(format_args!("{player} buys {total} shares"))
                }
            }
            GameAction::FoundHotel { player, hotel } => {
                f.write_fmt(format_args!("{player} founds {hotel}"))
            }
            GameAction::ResolveMerger { player, shares } => {
                let decision = shares.unwrap_or_default();
                f.write_fmt(format_args!(
                    "{player} sells {} and trades in {}",
                    decision.sell, decision.trade
                ))
            }
            GameAction::BreakMergerTie {
                player,
                survivor,
                merged,
            } => f.write_fmt(format_args!(
                "{player} breaks the tie: {survivor} absorbs {merged}"
            )),
        }
    }
}

/// The aggregate game state. Every action produces a fresh value; a rejected
/// action produces a copy of the input with only `error` set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub owner: String,
    pub phase: Phase,
    pub turn: u16,
    pub current_player: usize,
    pub players: Vec<Player>,
    pub hotels: Vec<Hotel>,
    pub tiles: Vec<Tile>,
    pub error: Option<GameError>,
}

impl Game {
    /// A fresh lobby. The owner is seated immediately; everyone else joins
    /// through `AddPlayer`.
    pub fn new(game_id: impl Into<String>, owner: impl Into<String>) -> Self {
        let owner = owner.into();

        let mut tiles = vec![];
        for row in 0..ROWS {
            for col in 0..COLS {
                tiles.push(Tile::new(row, col));
            }
        }

        let hotels = CHAIN_ARRAY.iter().map(|chain| Hotel::new(*chain)).collect();

        Self {
            game_id: game_id.into(),
            players: vec![Player {
                id: PlayerId(0),
                name: owner.clone(),
                money: STARTING_MONEY,
            }],
            owner,
            phase: Phase::WaitingForPlayers,
            turn: 0,
            current_player: 0,
            hotels,
            tiles,
            error: None,
        }
    }

    /// Applies an action, always returning a complete state. A rejected
    /// action returns the input state untouched apart from the `error`
    /// descriptor; a successful one clears it.
    pub fn apply_action<R: Rng>(&self, rng: &mut R, action: GameAction) -> Game {
        match self.reduce(rng, &action) {
            Ok(mut next) => {
                log::debug!("[{}] {} -> {}", self.game_id, action, next.phase.name());
                next.error = None;
                next
            }
            Err(err) => {
                if err.is_processing() {
                    log::warn!("[{}] {} rejected: {}", self.game_id, action.name(), err);
                } else {
                    log::debug!("[{}] {} rejected: {}", self.game_id, action.name(), err);
                }
                let mut unchanged = self.clone();
                unchanged.error = Some(err);
                unchanged
            }
        }
    }

    fn reduce<R: Rng>(&self, rng: &mut R, action: &GameAction) -> Result<Game, GameError> {
        match action {
            GameAction::AddPlayer { player } => self.reduce_add_player(player),
            GameAction::RemovePlayer { player } => self.reduce_remove_player(player),
            GameAction::StartGame { player } => self.reduce_start_game(rng, player),
            GameAction::PlayTile { player, tile } => self.reduce_play_tile(player, *tile),
            GameAction::BuyShares { player, shares } => self.reduce_buy_shares(rng, player, shares),
            GameAction::FoundHotel { player, hotel } => self.reduce_found_hotel(player, *hotel),
            GameAction::ResolveMerger { player, shares } => {
                self.reduce_resolve_merger(player, *shares)
            }
            GameAction::BreakMergerTie {
                player,
                survivor,
                merged,
            } => self.reduce_break_merger_tie(player, *survivor, *merged),
        }
    }

    fn reduce_add_player(&self, name: &str) -> Result<Game, GameError> {
        if self.phase != Phase::WaitingForPlayers {
            return Err(self.wrong_phase("ADD_PLAYER"));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(InvalidAction::LobbyFull.into());
        }
        player::validate_name(name, &self.players)?;

        let mut game = self.clone();
        game.players.push(Player {
            id: PlayerId(game.players.len() as u8),
            name: name.to_string(),
            money: STARTING_MONEY,
        });
        Ok(game)
    }

    fn reduce_remove_player(&self, name: &str) -> Result<Game, GameError> {
        if self.phase != Phase::WaitingForPlayers {
            return Err(self.wrong_phase("REMOVE_PLAYER"));
        }
        self.player_index(name)?;
        if name == self.owner {
            return Err(InvalidAction::CannotRemoveOwner.into());
        }

        let mut game = self.clone();
        game.players.retain(|p| p.name != name);
        for (idx, player) in game.players.iter_mut().enumerate() {
            player.id = PlayerId(idx as u8);
        }
        Ok(game)
    }

    fn reduce_start_game<R: Rng>(&self, rng: &mut R, name: &str) -> Result<Game, GameError> {
        if self.phase != Phase::WaitingForPlayers {
            return Err(self.wrong_phase("START_GAME"));
        }
        if name != self.owner {
            return Err(InvalidAction::NotOwner(name.to_string()).into());
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(InvalidAction::NotEnoughPlayers.into());
        }

        let mut game = self.clone();

        // one ranking tile per player; the tile closest to A1 in row-major
        // order goes first, and the ranking tiles stay on the board as loose
        // tiles
        let mut bag: Vec<usize> = game
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.location == Loc::Bag)
            .map(|(idx, _)| idx)
            .collect();
        bag.shuffle(rng);

        let mut ranking: Vec<(Position, usize)> = vec![];
        for (seat, tile_idx) in bag.iter().take(game.players.len()).enumerate() {
            game.tiles[*tile_idx].location = Loc::Board;
            ranking.push((game.tiles[*tile_idx].pos, seat));
        }
        ranking.sort();

        let mut ordered: Vec<Player> = ranking
            .iter()
            .map(|(_, seat)| game.players[*seat].clone())
            .collect();
        for (idx, player) in ordered.iter_mut().enumerate() {
            player.id = PlayerId(idx as u8);
        }
        game.players = ordered;

        for idx in 0..game.players.len() {
            let id = game.players[idx].id;
            board::draw_tiles(&mut game.tiles, rng, id, HAND_SIZE)?;
        }

        log::debug!(
            "[{}] started with turn order {:?}",
            game.game_id,
            game.players.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );

        game.phase = Phase::PlayTile;
        game.current_player = 0;
        game.turn = 1;
        Ok(game)
    }

    fn reduce_play_tile(&self, name: &str, pos: Position) -> Result<Game, GameError> {
        if self.phase != Phase::PlayTile {
            return Err(self.wrong_phase("PLAY_TILE"));
        }
        let (_, pid) = self.expect_current(name)?;

        let tile_idx =
            board::tile_index(&self.tiles, pos).ok_or(ProcessingError::NoSuchTile(pos))?;
        if self.tiles[tile_idx].location != Loc::Player(pid) {
            return Err(InvalidAction::TileNotInHand(pos).into());
        }

        if board::is_dead(&self.tiles, pos)? {
            return Err(InvalidAction::TileUnplayable(pos).into());
        }

        let mut game = self.clone();
        game.tiles[tile_idx].location = Loc::Board;

        match board::classify_placement(&game.tiles, &game.hotels, pos) {
            PlacementOutcome::Simple => {
                game.phase = Phase::BuyShares;
            }
            PlacementOutcome::Extend { chain, absorbed } => {
                let mut positions = vec![pos];
                positions.extend(absorbed);
                board::set_hotel(&mut game.tiles, &positions, chain);
                game.phase = Phase::BuyShares;
            }
            PlacementOutcome::FoundCandidate { tiles, available } => {
                game.phase = Phase::FoundHotel(FoundHotelContext {
                    available_hotels: available,
                    tiles,
                });
            }
            PlacementOutcome::Merger {
                chains,
                additional_tiles,
            } => {
                let resolution = merge::resolve_merger(&game.tiles, &chains, None, None)?;
                game.enter_merger(resolution, chains.clone(), chains, additional_tiles, None)?;
            }
        }

        Ok(game)
    }

    fn reduce_found_hotel(&self, name: &str, hotel: Chain) -> Result<Game, GameError> {
        let ctx = match &self.phase {
            Phase::FoundHotel(ctx) => ctx.clone(),
            _ => return Err(self.wrong_phase("FOUND_HOTEL")),
        };
        let (_, pid) = self.expect_current(name)?;

        if !ctx.available_hotels.contains(&hotel) {
            return Err(InvalidAction::HotelNotAvailable(hotel).into());
        }

        let mut game = self.clone();
        board::set_hotel(&mut game.tiles, &ctx.tiles, hotel);

        // founder's share, if the bank still has one
        let awarded = game.hotel_mut(hotel).assign_to_player(pid, 1);
        if awarded == 0 {
            log::debug!("[{}] no founder share left for {}", game.game_id, hotel);
        }

        game.phase = Phase::BuyShares;
        Ok(game)
    }

    fn reduce_buy_shares<R: Rng>(
        &self,
        rng: &mut R,
        name: &str,
        shares: &HashMap<Chain, u8>,
    ) -> Result<Game, GameError> {
        if self.phase != Phase::BuyShares {
            return Err(self.wrong_phase("BUY_SHARES"));
        }
        let (idx, pid) = self.expect_current(name)?;

        let total: u32 = shares.values().map(|n| *n as u32).sum();
        if total > BUY_LIMIT {
            return Err(InvalidAction::BuyLimitExceeded(total).into());
        }

        let mut cost: u32 = 0;
        for (chain, count) in shares.iter().filter(|(_, count)| **count > 0) {
            let size = board::chain_size(&self.tiles, *chain);
            if size == 0 {
                return Err(InvalidAction::HotelNotOnBoard(*chain).into());
            }

            let available = self.hotel(*chain).remaining_shares();
            if *count > available {
                return Err(InvalidAction::NotEnoughBankShares {
                    chain: *chain,
                    requested: *count,
                    available,
                }
                .into());
            }

            cost += money::share_price(*chain, size)? * *count as u32;
        }

        let have = self.players[idx].money;
        if cost > have {
            return Err(InvalidAction::InsufficientFunds { need: cost, have }.into());
        }

        let mut game = self.clone();
        for (chain, count) in shares.iter().filter(|(_, count)| **count > 0) {
            game.hotel_mut(*chain).assign_to_player(pid, *count);
        }
        game.players[idx].money -= cost;

        game.advance_turn(rng)?;
        Ok(game)
    }

    fn reduce_resolve_merger(
        &self,
        name: &str,
        decision: Option<SettlementDecision>,
    ) -> Result<Game, GameError> {
        let mut ctx = match &self.phase {
            Phase::ResolveMerger(ctx) => ctx.clone(),
            _ => return Err(self.wrong_phase("RESOLVE_MERGER")),
        };

        let front = *ctx
            .stockholder_ids
            .first()
            .ok_or(ProcessingError::EmptySettlementQueue)?;

        let idx = self.player_index(name)?;
        let pid = self.players[idx].id;
        if pid != front {
            return Err(InvalidAction::OutOfTurn(name.to_string()).into());
        }

        let decision = decision.unwrap_or_default();
        merge::validate_decision(
            self.hotel(ctx.merged_hotel),
            self.hotel(ctx.surviving_hotel),
            pid,
            decision,
        )?;

        let mut game = self.clone();

        // the merged chain's tiles are still on the board, so the sale price
        // reflects its size at the moment of the merger
        let merged_size = board::chain_size(&game.tiles, ctx.merged_hotel);
        let price = money::share_price(ctx.merged_hotel, merged_size)?;
        game.players[idx].money += price * decision.sell as u32;
        game.hotel_mut(ctx.merged_hotel)
            .return_to_bank(pid, decision.sell);
        game.hotel_mut(ctx.merged_hotel)
            .return_to_bank(pid, decision.trade);
        game.hotel_mut(ctx.surviving_hotel)
            .assign_to_player(pid, decision.trade / 2);

        ctx.stockholder_ids.remove(0);

        if !ctx.stockholder_ids.is_empty() {
            game.phase = Phase::ResolveMerger(ctx);
            return Ok(game);
        }

        // every stockholder has settled: fold the merged chain in
        board::retag_chain(&mut game.tiles, ctx.merged_hotel, ctx.surviving_hotel);

        if ctx.remaining_hotels.is_empty() {
            game.phase = Phase::BuyShares;
            return Ok(game);
        }

        // cascade to the next-largest chain, with the survivor pinned so a
        // tie among the remaining chains still pauses for a merge order
        let mut candidates = vec![ctx.surviving_hotel];
        candidates.extend(&ctx.remaining_hotels);
        let resolution = merge::resolve_merger(
            &game.tiles,
            &candidates,
            Some(ctx.surviving_hotel),
            None,
        )?;
        game.enter_merger(
            resolution,
            candidates,
            ctx.original_hotels,
            ctx.additional_tiles,
            Some(ctx.surviving_hotel),
        )?;
        Ok(game)
    }

    fn reduce_break_merger_tie(
        &self,
        name: &str,
        survivor: Chain,
        merged: Chain,
    ) -> Result<Game, GameError> {
        let ctx = match &self.phase {
            Phase::BreakMergerTie(ctx) => ctx.clone(),
            _ => return Err(self.wrong_phase("BREAK_MERGER_TIE")),
        };
        self.expect_current(name)?;

        let resolution = merge::resolve_merger(
            &self.tiles,
            &ctx.candidates,
            ctx.pinned_survivor,
            Some((survivor, merged)),
        )?;

        let mut game = self.clone();
        game.enter_merger(
            resolution,
            ctx.candidates,
            ctx.original_hotels,
            ctx.additional_tiles,
            ctx.pinned_survivor,
        )?;
        Ok(game)
    }

    /// Routes a merger resolution into the right phase: a tie pauses for an
    /// external decision, otherwise the pair's settlement opens (bonuses
    /// paid, stockholder queue built). `pinned_survivor` marks a cascade
    /// step, where the connector tiles have already been folded in.
    fn enter_merger(
        &mut self,
        resolution: MergeResolution,
        candidates: Vec<Chain>,
        original_hotels: Vec<Chain>,
        additional_tiles: Vec<Position>,
        pinned_survivor: Option<Chain>,
    ) -> Result<(), GameError> {
        match resolution {
            MergeResolution::NeedsMergeOrder { tied_hotels } => {
                self.phase = Phase::BreakMergerTie(MergerTieContext {
                    candidates,
                    original_hotels,
                    additional_tiles,
                    pinned_survivor,
                    tied_hotels,
                });
                Ok(())
            }
            MergeResolution::Resolved {
                surviving_hotel,
                merged_hotel,
                remaining_hotels,
            } => {
                if pinned_survivor.is_none() {
                    board::set_hotel(&mut self.tiles, &additional_tiles, surviving_hotel);
                }

                let merged_size = board::chain_size(&self.tiles, merged_hotel);
                let bonuses = money::merger_bonuses(self.hotel(merged_hotel), merged_size)?;
                for (player_id, bonus) in bonuses {
                    log::debug!(
                        "[{}] {:?} receives a ${} bonus for {}",
                        self.game_id,
                        player_id,
                        bonus,
                        merged_hotel
                    );
                    self.players[player_id.0 as usize].money += bonus;
                }

                let stockholder_ids = merge::stockholder_queue(self.hotel(merged_hotel));
                self.phase = Phase::ResolveMerger(MergeContext {
                    original_hotels,
                    additional_tiles,
                    surviving_hotel,
                    merged_hotel,
                    remaining_hotels,
                    stockholder_ids,
                });
                Ok(())
            }
        }
    }

    /// End-of-turn bookkeeping: the mover refills their hand, every hand is
    /// swept for tiles that died this turn, play rotates, and the end
    /// condition is checked.
    fn advance_turn<R: Rng>(&mut self, rng: &mut R) -> Result<(), GameError> {
        let mover = self.players[self.current_player].id;
        let hand = self.hand(mover).len();
        if hand < HAND_SIZE {
            board::draw_tiles(&mut self.tiles, rng, mover, HAND_SIZE - hand)?;
        }

        for idx in 0..self.players.len() {
            let id = self.players[idx].id;
            board::replace_dead_hand_tiles(&mut self.tiles, rng, id)?;
        }

        self.current_player = (self.current_player + 1) % self.players.len();
        if self.current_player == 0 {
            self.turn += 1;
        }

        if self.should_end() {
            self.final_payouts()?;
            self.phase = Phase::GameOver;
            log::debug!("[{}] game over, winners {:?}", self.game_id, self.winners());
        } else {
            self.phase = Phase::PlayTile;
        }

        Ok(())
    }

    /// The game ends once any chain is safe, or every chain on the board has
    /// reached the ending size.
    fn should_end(&self) -> bool {
        let active = board::active_chains(&self.tiles);
        if active.is_empty() {
            return false;
        }

        let any_safe = active
            .iter()
            .any(|chain| board::chain_size(&self.tiles, *chain) >= SAFE_HOTEL_SIZE);
        let all_at_ending_size = active
            .iter()
            .all(|chain| board::chain_size(&self.tiles, *chain) >= GAME_ENDING_HOTEL_SIZE);

        any_safe || all_at_ending_size
    }

    /// Retires every chain: majority/minority bonuses, then all holdings
    /// liquidated at the closing price.
    fn final_payouts(&mut self) -> Result<(), GameError> {
        for chain in board::active_chains(&self.tiles) {
            let size = board::chain_size(&self.tiles, chain);

            let bonuses = money::bonuses(self.hotel(chain), size)?;
            for (player_id, bonus) in bonuses {
                self.players[player_id.0 as usize].money += bonus;
            }

            let price = money::share_price(chain, size)?;
            for (player_id, count) in self.hotel(chain).holders() {
                self.hotel_mut(chain).return_to_bank(player_id, count);
                self.players[player_id.0 as usize].money += price * count as u32;
            }
        }
        Ok(())
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn winners(&self) -> Vec<PlayerId> {
        let most_money = self.players.iter().map(|p| p.money).max().unwrap_or(0);
        self.players
            .iter()
            .filter(|p| p.money == most_money)
            .map(|p| p.id)
            .collect()
    }

    pub fn player_view(&self, player_name: &str) -> Result<PlayerView, GameError> {
        view::player_view(player_name, self)
    }

    pub fn hotel(&self, chain: Chain) -> &Hotel {
        &self.hotels[chain.as_index()]
    }

    fn hotel_mut(&mut self, chain: Chain) -> &mut Hotel {
        &mut self.hotels[chain.as_index()]
    }

    /// The player's hand, sorted row-major.
    pub fn hand(&self, player_id: PlayerId) -> Vec<Position> {
        let mut hand: Vec<Position> = self
            .tiles
            .iter()
            .filter(|t| t.location == Loc::Player(player_id))
            .map(|t| t.pos)
            .collect();
        hand.sort();
        hand
    }

    fn player_index(&self, name: &str) -> Result<usize, InvalidAction> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| InvalidAction::UnknownPlayer(name.to_string()))
    }

    fn expect_current(&self, name: &str) -> Result<(usize, PlayerId), GameError> {
        let idx = self.player_index(name)?;
        if idx != self.current_player {
            return Err(InvalidAction::OutOfTurn(name.to_string()).into());
        }
        Ok((idx, self.players[idx].id))
    }

    fn wrong_phase(&self, action: &str) -> GameError {
        InvalidAction::WrongPhase {
            action: action.to_string(),
            phase: self.phase.name().to_string(),
        }
        .into()
    }
}

#[allow(unused_must_use)]
impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let in_bag = self
            .tiles
            .iter()
            .filter(|t| t.location == Loc::Bag)
            .count();
        f.write_fmt(format_args!(
            "  {}: {} | Turn {} | Tiles in bag {}",
            self.game_id,
            self.phase.name(),
            self.turn,
            in_bag
        ));
        writeln!(f);

        write!(f, "        ");
        for chain in &CHAIN_ARRAY {
            f.write_fmt(format_args!("{}   ", chain.initial()));
        }
        writeln!(f);

        write!(f, " Size:  ");
        for chain in &CHAIN_ARRAY {
            f.write_fmt(format_args!("{: <4}", board::chain_size(&self.tiles, *chain)));
        }
        writeln!(f);

        write!(f, " Bank:  ");
        for chain in &CHAIN_ARRAY {
            f.write_fmt(format_args!("{: <4}", self.hotel(*chain).remaining_shares()));
        }
        writeln!(f);

        for (idx, player) in self.players.iter().enumerate() {
            if idx == self.current_player {
                write!(f, "*");
            } else {
                write!(f, " ");
            }
            f.write_fmt(format_args!(" {: <12}", player.name));
            for chain in &CHAIN_ARRAY {
                f.write_fmt(format_args!("{: <4}", self.hotel(*chain).holding(player.id)));
            }
            f.write_fmt(format_args!(
                "${: <8}{}",
                player.money,
                self.hand(player.id).len()
            ));
            writeln!(f);
        }

        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = Position::new(row, col);
                let glyph = match self.tiles.iter().find(|t| t.pos == pos) {
                    Some(tile) if tile.location == Loc::Board => match tile.hotel {
                        Some(chain) => chain.initial(),
                        None => '■',
                    },
                    Some(tile) if tile.location == Loc::Dead => '▪',
                    _ => '□',
                };
                f.write_fmt(format_args!("{}  ", glyph));
            }
            writeln!(f);
        }

        Ok(())
    }
}
