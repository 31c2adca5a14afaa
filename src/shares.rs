use serde::{Deserialize, Serialize};
use crate::chain::Chain;
use crate::PlayerId;

pub const SHARES_PER_HOTEL: usize = 25;

/// Each of the 25 share certificates is either in the bank or held by
/// exactly one player.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ShareLocation {
    Bank,
    Player(PlayerId),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub chain: Chain,
    pub shares: Vec<ShareLocation>,
}

impl Hotel {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            shares: vec![ShareLocation::Bank; SHARES_PER_HOTEL],
        }
    }

    pub fn remaining_shares(&self) -> u8 {
        self.shares
            .iter()
            .filter(|s| **s == ShareLocation::Bank)
            .count() as u8
    }

    pub fn holding(&self, player_id: PlayerId) -> u8 {
        self.shares
            .iter()
            .filter(|s| **s == ShareLocation::Player(player_id))
            .count() as u8
    }

    /// Moves up to `amount` shares from the bank to the player. Clamped to
    /// what the bank actually holds; returns the number assigned.
    pub fn assign_to_player(&mut self, player_id: PlayerId, amount: u8) -> u8 {
        let mut assigned = 0;
        for share in self.shares.iter_mut() {
            if assigned == amount {
                break;
            }
            if *share == ShareLocation::Bank {
                *share = ShareLocation::Player(player_id);
                assigned += 1;
            }
        }
        assigned
    }

    /// Moves up to `amount` of the player's shares back to the bank. Clamped
    /// to the player's holding; returns the number returned.
    pub fn return_to_bank(&mut self, player_id: PlayerId, amount: u8) -> u8 {
        let mut returned = 0;
        for share in self.shares.iter_mut() {
            if returned == amount {
                break;
            }
            if *share == ShareLocation::Player(player_id) {
                *share = ShareLocation::Bank;
                returned += 1;
            }
        }
        returned
    }

    /// Every non-bank holder with their holding count, in stable share-slot
    /// order. Used for settlement queues and bonus computation.
    pub fn holders(&self) -> Vec<(PlayerId, u8)> {
        let mut holders: Vec<(PlayerId, u8)> = vec![];
        for share in &self.shares {
            if let ShareLocation::Player(player_id) = share {
                match holders.iter_mut().find(|(id, _)| id == player_id) {
                    Some((_, count)) => *count += 1,
                    None => holders.push((*player_id, 1)),
                }
            }
        }
        holders
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_assign_and_return() {
        let mut hotel = Hotel::new(Chain::Tower);
        assert_eq!(hotel.remaining_shares(), 25);

        assert_eq!(hotel.assign_to_player(PlayerId(0), 3), 3);
        assert_eq!(hotel.remaining_shares(), 22);
        assert_eq!(hotel.holding(PlayerId(0)), 3);

        assert_eq!(hotel.return_to_bank(PlayerId(0), 2), 2);
        assert_eq!(hotel.remaining_shares(), 24);
        assert_eq!(hotel.holding(PlayerId(0)), 1);
    }

    #[test]
    fn test_clamped_to_availability() {
        let mut hotel = Hotel::new(Chain::Luxor);
        assert_eq!(hotel.assign_to_player(PlayerId(1), 30), 25);
        assert_eq!(hotel.remaining_shares(), 0);

        // nothing left for a second player
        assert_eq!(hotel.assign_to_player(PlayerId(2), 1), 0);

        // returning more than held is clamped too
        assert_eq!(hotel.return_to_bank(PlayerId(2), 5), 0);
        assert_eq!(hotel.return_to_bank(PlayerId(1), 40), 25);
    }

    #[test]
    fn test_conservation() {
        let mut hotel = Hotel::new(Chain::Imperial);
        hotel.assign_to_player(PlayerId(0), 7);
        hotel.assign_to_player(PlayerId(1), 5);
        hotel.return_to_bank(PlayerId(0), 2);

        let held: u8 = hotel.holders().iter().map(|(_, n)| *n).sum();
        assert_eq!(held + hotel.remaining_shares(), 25);
    }

    #[test]
    fn test_holders_stable_order() {
        let mut hotel = Hotel::new(Chain::Festival);
        hotel.assign_to_player(PlayerId(2), 2);
        hotel.assign_to_player(PlayerId(0), 2);

        // share-slot order, which is assignment order
        assert_eq!(hotel.holders(), vec![(PlayerId(2), 2), (PlayerId(0), 2)]);
    }
}
