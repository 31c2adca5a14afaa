use ahash::HashMap;
use lazy_static::lazy_static;
use crate::chain::{Chain, Tier};
use crate::error::ProcessingError;
use crate::shares::Hotel;
use crate::PlayerId;

/// One row of the price table: applies to every chain size up to and
/// including `max_size`.
#[derive(Copy, Clone, Debug)]
pub struct PriceBracket {
    pub max_size: u16,
    pub price: u32,
    pub majority: u32,
    pub minority: u32,
}

// Base (economy) schedule; standard and luxury chains shift the share price
// up by $100 and $200, bonuses follow at 10x and 5x the price.
const BASE_BRACKETS: [(u16, u32); 9] = [
    (2, 200),
    (3, 300),
    (4, 400),
    (5, 500),
    (10, 600),
    (20, 700),
    (30, 800),
    (40, 900),
    (u16::MAX, 1000),
];

lazy_static! {
    static ref PRICE_BRACKETS: [Vec<PriceBracket>; 3] = {
        let table_for = |offset: u32| -> Vec<PriceBracket> {
            BASE_BRACKETS
                .iter()
                .map(|(max_size, base)| {
                    let price = base + offset;
                    PriceBracket {
                        max_size: *max_size,
                        price,
                        majority: price * 10,
                        minority: price * 5,
                    }
                })
                .collect()
        };

        [table_for(0), table_for(100), table_for(200)]
    };
}

fn bracket(chain: Chain, size: u16) -> Result<&'static PriceBracket, ProcessingError> {
    let tier_idx = match chain.tier() {
        Tier::Economy => 0,
        Tier::Standard => 1,
        Tier::Luxury => 2,
    };

    // first bracket whose max_size covers the current tile count; sizes 0
    // and 1 fall into the smallest (size 2) bracket
    PRICE_BRACKETS[tier_idx]
        .iter()
        .find(|b| b.max_size >= size)
        .ok_or(ProcessingError::NoPriceBracket { chain, size })
}

pub fn share_price(chain: Chain, size: u16) -> Result<u32, ProcessingError> {
    Ok(bracket(chain, size)?.price)
}

pub fn majority_minority(chain: Chain, size: u16) -> Result<(u32, u32), ProcessingError> {
    let b = bracket(chain, size)?;
    Ok((b.majority, b.minority))
}

pub fn round_up_to_nearest_hundred(num: u32) -> u32 {
    ((num + 99) / 100) * 100
}

/// Majority/minority bonuses for the given hotel at the given size.
///
/// Holders sharing the top holding split the combined majority+minority
/// bonus evenly (each share rounded up to $100). A solitary top holder takes
/// the majority alone and the next distinct holding tier splits the minority
/// the same way. Tiers below the first two receive nothing.
pub fn bonuses(hotel: &Hotel, size: u16) -> Result<HashMap<PlayerId, u32>, ProcessingError> {
    let holders = hotel.holders();

    let mut map = HashMap::default();
    if holders.is_empty() {
        return Ok(map);
    }

    let (majority, minority) = majority_minority(hotel.chain, size)?;

    let most_held = holders.iter().map(|(_, n)| *n).max().unwrap();
    let top: Vec<PlayerId> = holders
        .iter()
        .filter(|(_, n)| *n == most_held)
        .map(|(id, _)| *id)
        .collect();

    if top.len() > 1 {
        let split = round_up_to_nearest_hundred((majority + minority) / top.len() as u32);
        for id in top {
            map.insert(id, split);
        }
        return Ok(map);
    }

    map.insert(top[0], majority);

    let second_most_held = holders
        .iter()
        .filter(|(_, n)| *n != most_held)
        .map(|(_, n)| *n)
        .max();

    if let Some(second_most_held) = second_most_held {
        let second: Vec<PlayerId> = holders
            .iter()
            .filter(|(_, n)| *n == second_most_held)
            .map(|(id, _)| *id)
            .collect();

        let split = round_up_to_nearest_hundred(minority / second.len() as u32);
        for id in second {
            map.insert(id, split);
        }
    }

    Ok(map)
}

/// Bonuses at the opening of a merger settlement. A merged chain nobody
/// holds indicates upstream corruption and is rejected.
pub fn merger_bonuses(hotel: &Hotel, size: u16) -> Result<HashMap<PlayerId, u32>, ProcessingError> {
    if hotel.holders().is_empty() {
        return Err(ProcessingError::NoStockholders(hotel.chain));
    }
    bonuses(hotel, size)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chain::Chain;
    use crate::shares::Hotel;

    #[test]
    fn test_economy_price_table() {
        // a fresh two-tile economy chain
        assert_eq!(share_price(Chain::Tower, 2).unwrap(), 200);
        assert_eq!(majority_minority(Chain::Tower, 2).unwrap(), (2000, 1000));

        // sizes 0 and 1 fall into the smallest bracket
        assert_eq!(share_price(Chain::Tower, 0).unwrap(), 200);
        assert_eq!(share_price(Chain::Tower, 1).unwrap(), 200);

        assert_eq!(share_price(Chain::Luxor, 5).unwrap(), 500);
        assert_eq!(share_price(Chain::Luxor, 6).unwrap(), 600);
        assert_eq!(share_price(Chain::Luxor, 10).unwrap(), 600);
        assert_eq!(share_price(Chain::Luxor, 11).unwrap(), 700);
        assert_eq!(share_price(Chain::Luxor, 41).unwrap(), 1000);
        assert_eq!(share_price(Chain::Luxor, 108).unwrap(), 1000);
    }

    #[test]
    fn test_tier_offsets() {
        assert_eq!(share_price(Chain::American, 2).unwrap(), 300);
        assert_eq!(share_price(Chain::Imperial, 2).unwrap(), 400);
        assert_eq!(majority_minority(Chain::Imperial, 2).unwrap(), (4000, 2000));
    }

    #[test]
    fn test_nearest_hundred() {
        assert_eq!(round_up_to_nearest_hundred(0), 0);
        assert_eq!(round_up_to_nearest_hundred(50), 100);
        assert_eq!(round_up_to_nearest_hundred(175), 200);
        assert_eq!(round_up_to_nearest_hundred(125), 200);
        assert_eq!(round_up_to_nearest_hundred(700), 700);
    }

    #[test]
    fn test_solo_majority_with_minority_tier() {
        let mut hotel = Hotel::new(Chain::Tower);
        hotel.assign_to_player(PlayerId(0), 5);
        hotel.assign_to_player(PlayerId(1), 2);
        hotel.assign_to_player(PlayerId(2), 2);

        // size 2 economy: majority 2000, minority 1000 split two ways
        let map = bonuses(&hotel, 2).unwrap();
        assert_eq!(map[&PlayerId(0)], 2000);
        assert_eq!(map[&PlayerId(1)], 500);
        assert_eq!(map[&PlayerId(2)], 500);
    }

    #[test]
    fn test_tied_top_splits_combined() {
        let mut hotel = Hotel::new(Chain::Tower);
        hotel.assign_to_player(PlayerId(0), 4);
        hotel.assign_to_player(PlayerId(1), 4);
        hotel.assign_to_player(PlayerId(2), 1);

        // 2000 + 1000 split two ways, second tier gets nothing
        let map = bonuses(&hotel, 2).unwrap();
        assert_eq!(map[&PlayerId(0)], 1500);
        assert_eq!(map[&PlayerId(1)], 1500);
        assert_eq!(map.get(&PlayerId(2)), None);
    }

    #[test]
    fn test_three_way_tie_rounds_up() {
        let mut hotel = Hotel::new(Chain::Tower);
        hotel.assign_to_player(PlayerId(0), 2);
        hotel.assign_to_player(PlayerId(1), 2);
        hotel.assign_to_player(PlayerId(2), 2);

        // 3000 / 3 = 1000 each, already round
        let map = bonuses(&hotel, 2).unwrap();
        assert_eq!(map[&PlayerId(0)], 1000);

        // at size 3: (3000 + 1500) / 3 = 1500
        let map = bonuses(&hotel, 3).unwrap();
        assert_eq!(map[&PlayerId(1)], 1500);
    }

    #[test]
    fn test_solo_holder_takes_majority_only() {
        let mut hotel = Hotel::new(Chain::Continental);
        hotel.assign_to_player(PlayerId(3), 1);

        let map = bonuses(&hotel, 2).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&PlayerId(3)], 4000);
    }

    #[test]
    fn test_no_holders() {
        let hotel = Hotel::new(Chain::Tower);
        assert!(bonuses(&hotel, 2).unwrap().is_empty());
        assert!(matches!(
            merger_bonuses(&hotel, 2),
            Err(ProcessingError::NoStockholders(Chain::Tower))
        ));
    }
}
