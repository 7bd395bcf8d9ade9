//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for participants (players and NPCs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for territories (player-claimable kingdoms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerritoryId(pub Uuid);

impl TerritoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TerritoryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a single conflict event (coup or invasion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictId(pub Uuid);

impl ConflictId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConflictId {
    fn default() -> Self {
        Self::new()
    }
}

/// Gold amount (treasuries, entry costs, loot)
pub type Gold = u64;

/// Reputation score; penalties can push it negative
pub type Reputation = i64;

/// Which roster of a conflict a participant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictSide {
    Attacker,
    Defender,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_unique() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_territory_id_hash() {
        use std::collections::HashMap;
        let id = TerritoryId::new();
        let mut map: HashMap<TerritoryId, &str> = HashMap::new();
        map.insert(id, "ravenholm");
        assert_eq!(map.get(&id), Some(&"ravenholm"));
    }

    #[test]
    fn test_conflict_id_equality() {
        let id = ConflictId::new();
        let same = id;
        assert_eq!(id, same);
        assert_ne!(id, ConflictId::new());
    }

    #[test]
    fn test_side_variants_distinct() {
        assert_ne!(ConflictSide::Attacker, ConflictSide::Defender);
    }
}
