//! Territorial-conflict engine: coups, invasions, and their consequences
//!
//! The lifecycle types ([`CoupEvent`], [`InvasionEvent`]) are time-boxed
//! state machines; [`resolver`] turns a closed event into an immutable
//! outcome; [`ConflictLedger`] guarantees each event resolves exactly once.

pub mod constants;
pub mod coup;
pub mod invasion;
pub mod ledger;
pub mod outcome;
pub mod penalty;
pub mod resolver;
pub mod stats;

pub use coup::CoupEvent;
pub use invasion::{InvasionEvent, InvasionPhase};
pub use ledger::{ConflictKind, ConflictLedger};
pub use outcome::{ConflictOutcome, CoupOutcome, InvasionOutcome};
pub use penalty::ParticipantPenalty;
pub use resolver::{resolve_coup, resolve_invasion};
pub use stats::{CombatStats, SnapshotSource, StatsSource, TerritorySnapshot};
