use thiserror::Error;

use crate::core::types::{ConflictId, ParticipantId, TerritoryId};

#[derive(Error, Debug)]
pub enum ConflictError {
    #[error("Conflict not found: {0:?}")]
    ConflictNotFound(ConflictId),

    #[error("Participant not found: {0:?}")]
    ParticipantNotFound(ParticipantId),

    #[error("Territory not found: {0:?}")]
    TerritoryNotFound(TerritoryId),

    #[error("Territory already has an unresolved {kind}: {territory:?}")]
    TerritoryContested {
        territory: TerritoryId,
        kind: &'static str,
    },

    #[error("Conflict is not due for resolution yet: {0:?}")]
    ResolutionNotDue(ConflictId),

    #[error("Conflict already reached a terminal state: {0:?}")]
    ConflictClosed(ConflictId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConflictError>;
