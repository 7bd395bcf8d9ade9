//! Conflict rule constants - all tunable values in one place
//!
//! These are game-design values, fixed for every territory. Deployment
//! knobs (poll cadence, parallelism) live in `core::config` instead.

use std::time::Duration;

use crate::core::types::Gold;

// Window constants
pub const VOTING_WINDOW: Duration = Duration::from_secs(2 * 60 * 60);
pub const RALLY_WINDOW: Duration = Duration::from_secs(2 * 60 * 60);
pub const RECRUITMENT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

// Invasion recruitment constants
pub const MIN_INVASION_ATTACKERS: usize = 5;
pub const INVASION_ENTRY_COST: Gold = 100;

// Strength constants
/// Attackers need a strict 25% advantage; ties go to the defenders
pub const ATTACKER_ADVANTAGE: f64 = 1.25;
/// Flat defense added per wall level during invasions (never coups)
pub const WALL_DEFENSE_BONUS: f64 = 5.0;

// Loot constants
/// Fraction of the treasury shielded per vault level, clamped to [0, 1]
pub const VAULT_PROTECTION_PER_LEVEL: f64 = 0.20;

// Structural damage on a successful invasion
pub const INVASION_WALL_DAMAGE: u8 = 2;
pub const INVASION_PRODUCTION_DAMAGE: u8 = 2;

// Defeat consequences
pub const WOUND_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
pub const INVASION_DEFEAT_ATTACK_LOSS: u32 = 1;
pub const INVASION_DEFEAT_REPUTATION_LOSS: i64 = 50;
pub const COUP_FAILURE_REPUTATION_LOSS: i64 = 100;
pub const COUP_FAILURE_STAT_LOSS: u32 = 2;
pub const OVERTHROWN_REPUTATION_LOSS: i64 = 200;
pub const OVERTHROWN_STAT_LOSS: u32 = 5;

/// Combat stats never drop below this, debuffs included
pub const STAT_FLOOR: u32 = 1;
