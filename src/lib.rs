//! Crownfall - territorial-conflict resolution engine
//!
//! The rules layer of a location-based kingdom game: coup and invasion
//! lifecycles, strength-based outcome computation, and the reward/penalty
//! bookkeeping applied to participants and territories afterwards.

pub mod conflict;
pub mod core;
pub mod kingdom;
pub mod schedule;
