use serde::{Deserialize, Serialize};
use crate::error::InvalidAction;
use crate::PlayerId;

pub const MAX_NAME_LEN: usize = 32;

// location tags a name could be confused with
const RESERVED_NAMES: [&str; 4] = ["bank", "bag", "board", "dead"];

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub money: u32,
}

/// Lobby-time name rules: non-empty, at most 32 characters, not a reserved
/// word, unique within the game.
pub fn validate_name(name: &str, players: &[Player]) -> Result<(), InvalidAction> {
    if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
        return Err(InvalidAction::NameInvalid(name.to_string()));
    }

    if RESERVED_NAMES.contains(&name.to_lowercase().as_str()) {
        return Err(InvalidAction::NameInvalid(name.to_string()));
    }

    if players.iter().any(|p| p.name == name) {
        return Err(InvalidAction::NameTaken(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn players(names: &[&str]) -> Vec<Player> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Player {
                id: PlayerId(idx as u8),
                name: name.to_string(),
                money: 6000,
            })
            .collect()
    }

    #[test]
    fn test_accepts_ordinary_names() {
        assert!(validate_name("alice", &players(&["bob"])).is_ok());
    }

    #[test]
    fn test_rejects_bad_names() {
        let existing = players(&["alice"]);
        assert!(validate_name("", &existing).is_err());
        assert!(validate_name("   ", &existing).is_err());
        assert!(validate_name(&"x".repeat(33), &existing).is_err());
        assert!(validate_name("Bank", &existing).is_err());
        assert!(validate_name("dead", &existing).is_err());
        assert_eq!(
            validate_name("alice", &existing),
            Err(InvalidAction::NameTaken("alice".to_string()))
        );
    }
}
