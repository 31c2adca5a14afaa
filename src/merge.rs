use serde::{Deserialize, Serialize};
use crate::board::{chain_size, is_safe};
use crate::chain::Chain;
use crate::error::{GameError, InvalidAction};
use crate::shares::Hotel;
use crate::tile::{Position, Tile};
use crate::PlayerId;

/// Transient state while a merger's stockholders are settled. Lives only in
/// `Phase::ResolveMerger` and is destroyed once every cascade step and every
/// stockholder has been processed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MergeContext {
    /// All chains involved in the triggering placement.
    pub original_hotels: Vec<Chain>,
    /// The placed tile plus any loose neighbours, folded into the survivor.
    pub additional_tiles: Vec<Position>,
    pub surviving_hotel: Chain,
    pub merged_hotel: Chain,
    /// Chains still waiting for a cascade pass, largest first.
    pub remaining_hotels: Vec<Chain>,
    /// Stockholders of the merged chain still to decide, front first.
    pub stockholder_ids: Vec<PlayerId>,
}

/// Transient state while waiting for an external tie-break decision. Lives
/// only in `Phase::BreakMergerTie`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MergerTieContext {
    /// Chains being ranked in the current cascade step.
    pub candidates: Vec<Chain>,
    /// All chains involved in the triggering placement.
    pub original_hotels: Vec<Chain>,
    pub additional_tiles: Vec<Position>,
    /// Survivor fixed by an earlier cascade step, if any. A tie decision
    /// must keep it as the survivor.
    pub pinned_survivor: Option<Chain>,
    pub tied_hotels: Vec<Chain>,
}

/// A stockholder's answer during settlement. Shares not sold or traded are
/// kept.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SettlementDecision {
    pub sell: u8,
    /// Traded in at two merged shares for one survivor share; must be even.
    pub trade: u8,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MergeResolution {
    /// Two or more chains are tied for largest; an external decision is
    /// required before the merge can proceed.
    NeedsMergeOrder { tied_hotels: Vec<Chain> },
    Resolved {
        surviving_hotel: Chain,
        merged_hotel: Chain,
        remaining_hotels: Vec<Chain>,
    },
}

impl MergeResolution {
    pub fn needs_merge_order(&self) -> bool {
        matches!(self, MergeResolution::NeedsMergeOrder { .. })
    }

    pub fn surviving_hotel(&self) -> Option<Chain> {
        match self {
            MergeResolution::Resolved { surviving_hotel, .. } => Some(*surviving_hotel),
            _ => None,
        }
    }

    pub fn merged_hotel(&self) -> Option<Chain> {
        match self {
            MergeResolution::Resolved { merged_hotel, .. } => Some(*merged_hotel),
            _ => None,
        }
    }
}

/// Orders the candidate chains by size and picks the survivor and the chain
/// to be absorbed next.
///
/// A cascade step passes the already-fixed survivor as `pinned_survivor`; it
/// is excluded from the ranking, and ties are detected among the remaining
/// chains only. With no `resolved_tie`, a tie at the top rank pauses
/// resolution and reports the tied set. A supplied tie decision must name
/// members of the tied set (with a pinned survivor, the decision must keep
/// the pinned chain as survivor). The merged chain must never be safe; ties
/// among the smaller (defunct) chains are broken by declaration order, which
/// the stable sort preserves.
pub fn resolve_merger(
    tiles: &[Tile],
    candidates: &[Chain],
    pinned_survivor: Option<Chain>,
    resolved_tie: Option<(Chain, Chain)>,
) -> Result<MergeResolution, GameError> {
    let mut contenders: Vec<Chain> = candidates
        .iter()
        .filter(|chain| Some(**chain) != pinned_survivor)
        .copied()
        .collect();
    contenders.sort_by(|a, b| chain_size(tiles, *b).cmp(&chain_size(tiles, *a)));

    let top_size = chain_size(tiles, contenders[0]);
    let tied: Vec<Chain> = contenders
        .iter()
        .filter(|chain| chain_size(tiles, **chain) == top_size)
        .copied()
        .collect();

    let (surviving_hotel, merged_hotel) = match resolved_tie {
        Some((survivor, merged)) => {
            let survivor_ok = match pinned_survivor {
                Some(pinned) => survivor == pinned,
                None => tied.contains(&survivor),
            };
            if !survivor_ok {
                return Err(InvalidAction::NotInTiedSet(survivor).into());
            }
            if !tied.contains(&merged) || merged == survivor {
                return Err(InvalidAction::NotInTiedSet(merged).into());
            }
            (survivor, merged)
        }
        None => {
            if tied.len() > 1 {
                return Ok(MergeResolution::NeedsMergeOrder { tied_hotels: tied });
            }
            match pinned_survivor {
                Some(pinned) => (pinned, contenders[0]),
                None => (contenders[0], contenders[1]),
            }
        }
    };

    // a safe chain can never be absorbed; unreachable by construction since
    // a safe chain outranks any mergeable chain, but checked anyway
    if is_safe(tiles, merged_hotel) {
        return Err(InvalidAction::SafeHotelMerge(merged_hotel).into());
    }

    let remaining_hotels: Vec<Chain> = contenders
        .into_iter()
        .filter(|chain| *chain != surviving_hotel && *chain != merged_hotel)
        .collect();

    Ok(MergeResolution::Resolved {
        surviving_hotel,
        merged_hotel,
        remaining_hotels,
    })
}

/// The order in which the merged chain's stockholders decide: holding count
/// descending, ties kept in share-ledger order. That tie order is a rule,
/// not an accident.
pub fn stockholder_queue(hotel: &Hotel) -> Vec<PlayerId> {
    let mut holders = hotel.holders();
    holders.sort_by(|a, b| b.1.cmp(&a.1));
    holders.into_iter().map(|(id, _)| id).collect()
}

/// Checks a settlement decision against the player's holding and the
/// survivor's bank stock.
pub fn validate_decision(
    merged: &Hotel,
    survivor: &Hotel,
    player_id: PlayerId,
    decision: SettlementDecision,
) -> Result<(), InvalidAction> {
    // widened so a client-supplied pair summing past u8 cannot wrap
    let holding = merged.holding(player_id);
    let requested = decision.sell as u16 + decision.trade as u16;
    if requested > holding as u16 {
        return Err(InvalidAction::NotEnoughShares { holding, requested });
    }

    if decision.trade % 2 != 0 {
        return Err(InvalidAction::OddTradeIn(decision.trade));
    }

    let survivor_bank = survivor.remaining_shares();
    if decision.trade / 2 > survivor_bank {
        return Err(InvalidAction::NotEnoughBankShares {
            chain: survivor.chain,
            requested: decision.trade / 2,
            available: survivor_bank,
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::tile_index;
    use crate::tile::{TileLocation, COLS, ROWS};

    fn fresh_tiles() -> Vec<Tile> {
        let mut tiles = vec![];
        for row in 0..ROWS {
            for col in 0..COLS {
                tiles.push(Tile::new(row, col));
            }
        }
        tiles
    }

    fn place_row(tiles: &mut [Tile], row: u8, cols: std::ops::Range<u8>, hotel: Chain) {
        for col in cols {
            let idx = tile_index(tiles, Position::new(row, col)).unwrap();
            tiles[idx].location = TileLocation::Board;
            tiles[idx].hotel = Some(hotel);
        }
    }

    #[test]
    fn test_tie_then_resolution() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..5, Chain::American);
        place_row(&mut tiles, 2, 0..5, Chain::Festival);

        let candidates = [Chain::American, Chain::Festival];

        let resolution = resolve_merger(&tiles, &candidates, None, None).unwrap();
        assert!(resolution.needs_merge_order());
        match &resolution {
            MergeResolution::NeedsMergeOrder { tied_hotels } => {
                assert_eq!(tied_hotels, &vec![Chain::American, Chain::Festival]);
            }
            _ => unreachable!(),
        }

        let resolution =
            resolve_merger(&tiles, &candidates, None, Some((Chain::American, Chain::Festival)))
                .unwrap();
        assert!(!resolution.needs_merge_order());
        assert_eq!(resolution.surviving_hotel(), Some(Chain::American));
        assert_eq!(resolution.merged_hotel(), Some(Chain::Festival));
    }

    #[test]
    fn test_tie_resolution_rejects_outsiders() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..5, Chain::American);
        place_row(&mut tiles, 2, 0..5, Chain::Festival);
        place_row(&mut tiles, 4, 0..3, Chain::Tower);

        let candidates = [Chain::Tower, Chain::American, Chain::Festival];

        // Tower is smaller, so it is not in the tied set
        let err = resolve_merger(&tiles, &candidates, None, Some((Chain::Tower, Chain::Festival)))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::Invalid(InvalidAction::NotInTiedSet(Chain::Tower))
        );
    }

    #[test]
    fn test_clear_ordering_with_cascade() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..6, Chain::Continental);
        place_row(&mut tiles, 2, 0..4, Chain::American);
        place_row(&mut tiles, 4, 0..2, Chain::Tower);
        place_row(&mut tiles, 6, 0..3, Chain::Luxor);

        let resolution = resolve_merger(
            &tiles,
            &[Chain::Tower, Chain::Luxor, Chain::American, Chain::Continental],
            None,
            None,
        )
        .unwrap();

        match resolution {
            MergeResolution::Resolved {
                surviving_hotel,
                merged_hotel,
                remaining_hotels,
            } => {
                assert_eq!(surviving_hotel, Chain::Continental);
                assert_eq!(merged_hotel, Chain::American);
                // cascade queue is largest first
                assert_eq!(remaining_hotels, vec![Chain::Luxor, Chain::Tower]);
            }
            _ => panic!("expected a resolved merger"),
        }
    }

    #[test]
    fn test_pinned_survivor_is_excluded_from_tie_detection() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..6, Chain::Continental);
        place_row(&mut tiles, 2, 0..3, Chain::Tower);
        place_row(&mut tiles, 4, 0..3, Chain::Luxor);

        let candidates = [Chain::Continental, Chain::Tower, Chain::Luxor];

        // Continental would win the ranking outright, but it is pinned, so
        // the Tower/Luxor tie still needs an external decision
        let resolution =
            resolve_merger(&tiles, &candidates, Some(Chain::Continental), None).unwrap();
        match &resolution {
            MergeResolution::NeedsMergeOrder { tied_hotels } => {
                assert_eq!(tied_hotels, &vec![Chain::Tower, Chain::Luxor]);
            }
            _ => panic!("expected a paused merger"),
        }

        // the decision cannot displace the pinned survivor
        let err = resolve_merger(
            &tiles,
            &candidates,
            Some(Chain::Continental),
            Some((Chain::Tower, Chain::Luxor)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GameError::Invalid(InvalidAction::NotInTiedSet(Chain::Tower))
        );

        let resolution = resolve_merger(
            &tiles,
            &candidates,
            Some(Chain::Continental),
            Some((Chain::Continental, Chain::Luxor)),
        )
        .unwrap();
        match resolution {
            MergeResolution::Resolved {
                surviving_hotel,
                merged_hotel,
                remaining_hotels,
            } => {
                assert_eq!(surviving_hotel, Chain::Continental);
                assert_eq!(merged_hotel, Chain::Luxor);
                assert_eq!(remaining_hotels, vec![Chain::Tower]);
            }
            _ => panic!("expected a resolved merger"),
        }
    }

    #[test]
    fn test_pinned_survivor_without_tie_picks_largest_remaining() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..6, Chain::Continental);
        place_row(&mut tiles, 2, 0..4, Chain::Tower);
        place_row(&mut tiles, 4, 0..3, Chain::Luxor);

        let resolution = resolve_merger(
            &tiles,
            &[Chain::Continental, Chain::Tower, Chain::Luxor],
            Some(Chain::Continental),
            None,
        )
        .unwrap();
        assert_eq!(resolution.surviving_hotel(), Some(Chain::Continental));
        assert_eq!(resolution.merged_hotel(), Some(Chain::Tower));
    }

    #[test]
    fn test_safe_chain_cannot_be_merged() {
        let mut tiles = fresh_tiles();
        place_row(&mut tiles, 0, 0..12, Chain::Continental);
        place_row(&mut tiles, 2, 0..11, Chain::American);

        let err = resolve_merger(&tiles, &[Chain::American, Chain::Continental], None, None)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::Invalid(InvalidAction::SafeHotelMerge(Chain::American))
        );
    }

    #[test]
    fn test_stockholder_queue_ordering() {
        let mut hotel = Hotel::new(Chain::Worldwide);
        hotel.assign_to_player(PlayerId(0), 5);
        hotel.assign_to_player(PlayerId(1), 2);
        hotel.assign_to_player(PlayerId(2), 5);

        // descending holdings, equal holdings stay in ledger order
        assert_eq!(
            stockholder_queue(&hotel),
            vec![PlayerId(0), PlayerId(2), PlayerId(1)]
        );
    }

    #[test]
    fn test_validate_decision() {
        let mut merged = Hotel::new(Chain::Tower);
        let mut survivor = Hotel::new(Chain::Luxor);
        merged.assign_to_player(PlayerId(0), 7);
        survivor.assign_to_player(PlayerId(9), 24);

        let ok = SettlementDecision { sell: 3, trade: 2 };
        assert!(validate_decision(&merged, &survivor, PlayerId(0), ok).is_ok());

        let too_many = SettlementDecision { sell: 6, trade: 2 };
        assert!(matches!(
            validate_decision(&merged, &survivor, PlayerId(0), too_many),
            Err(InvalidAction::NotEnoughShares { holding: 7, requested: 8 })
        ));

        // a pair summing past u8 must not wrap around the holding check
        let oversized = SettlementDecision {
            sell: 206,
            trade: 50,
        };
        assert!(matches!(
            validate_decision(&merged, &survivor, PlayerId(0), oversized),
            Err(InvalidAction::NotEnoughShares {
                holding: 7,
                requested: 256
            })
        ));

        let odd = SettlementDecision { sell: 0, trade: 3 };
        assert!(matches!(
            validate_decision(&merged, &survivor, PlayerId(0), odd),
            Err(InvalidAction::OddTradeIn(3))
        ));

        // survivor bank only has one share left
        let starved = SettlementDecision { sell: 0, trade: 4 };
        assert!(matches!(
            validate_decision(&merged, &survivor, PlayerId(0), starved),
            Err(InvalidAction::NotEnoughBankShares { .. })
        ));
    }
}
