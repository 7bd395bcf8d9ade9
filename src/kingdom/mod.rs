//! Kingdom-side state the conflict engine reads from and reports into
//!
//! Participant records and territory state are collaborator concerns: the
//! resolver only sees them through `StatsSource` and `TerritorySnapshot`,
//! and outcomes flow back through the application entry points here.

pub mod participant;
pub mod store;
pub mod territory;

pub use participant::{ParticipantRecord, WoundDebuff};
pub use store::ParticipantStore;
pub use territory::TerritoryState;
