//! Conflict resolution - pure strength comparison
//!
//! NO randomness here. Given the rosters, a stats lookup, and a territory
//! snapshot, resolution is a deterministic computation; the only entropy in
//! the engine is the flee roll derived from a coup outcome afterwards.
//!
//! Participants missing from the stats lookup contribute zero strength
//! (silent skip): a deleted or disconnected account weakens its side but
//! never wedges resolution.

use crate::conflict::constants::{
    ATTACKER_ADVANTAGE, INVASION_WALL_DAMAGE, VAULT_PROTECTION_PER_LEVEL, WALL_DEFENSE_BONUS,
    WOUND_DURATION,
};
use crate::conflict::coup::CoupEvent;
use crate::conflict::invasion::InvasionEvent;
use crate::conflict::outcome::{CoupOutcome, InvasionOutcome};
use crate::conflict::stats::{StatsSource, TerritorySnapshot};
use crate::core::types::{Gold, ParticipantId};
use crate::core::Timestamp;

/// Sum attack power over a roster, skipping unknown identities
fn attack_strength(roster: &[ParticipantId], stats: &dyn StatsSource, now: Timestamp) -> f64 {
    roster
        .iter()
        .map(|&id| match stats.combat_stats(id, now) {
            Some(s) => s.attack_power as f64,
            None => {
                tracing::warn!(?id, "attacker missing from stats lookup, contributes 0");
                0.0
            }
        })
        .sum()
}

/// Sum defense power over a roster, skipping unknown identities
fn defense_strength(roster: &[ParticipantId], stats: &dyn StatsSource, now: Timestamp) -> f64 {
    roster
        .iter()
        .map(|&id| match stats.combat_stats(id, now) {
            Some(s) => s.defense_power as f64,
            None => {
                tracing::warn!(?id, "defender missing from stats lookup, contributes 0");
                0.0
            }
        })
        .sum()
}

/// Attackers need a strict 25% advantage; a tie is a defender win
fn attackers_win(attacker_strength: f64, defender_strength: f64) -> bool {
    attacker_strength > defender_strength * ATTACKER_ADVANTAGE
}

/// Resolve a coup
///
/// Defense is personal power only - no wall bonus inside the keep. On
/// victory the initiator becomes the new ruler.
pub fn resolve_coup(
    event: &CoupEvent,
    stats: &dyn StatsSource,
    snapshot: &TerritorySnapshot,
    now: Timestamp,
) -> CoupOutcome {
    let attacker_strength = attack_strength(event.attackers(), stats, now);
    let defender_strength = defense_strength(event.defenders(), stats, now);
    let victory = attackers_win(attacker_strength, defender_strength);

    tracing::debug!(
        conflict = ?event.id,
        attacker_strength,
        defender_strength,
        required = defender_strength * ATTACKER_ADVANTAGE,
        victory,
        "coup resolved"
    );

    CoupOutcome {
        conflict: event.id,
        territory: event.territory,
        victory,
        attacker_strength,
        defender_strength,
        attackers: event.attackers().to_vec(),
        defenders: event.defenders().to_vec(),
        new_ruler: victory.then_some(event.initiator),
        previous_ruler: snapshot.ruler,
    }
}

/// Resolve an invasion
///
/// Defense gains a flat wall bonus per level. Loot is the vault-reduced
/// treasury split evenly across the frozen signup roster; on defeat the
/// attackers take a 24-hour wound instead.
pub fn resolve_invasion(
    event: &InvasionEvent,
    stats: &dyn StatsSource,
    snapshot: &TerritorySnapshot,
    now: Timestamp,
) -> InvasionOutcome {
    let attacker_strength = attack_strength(event.signups(), stats, now);
    let defender_strength = defense_strength(event.defenders(), stats, now)
        + snapshot.wall_level as f64 * WALL_DEFENSE_BONUS;
    let victory = attackers_win(attacker_strength, defender_strength);

    let loot_per_attacker = if victory {
        loot_share(snapshot, event.signups().len())
    } else {
        0
    };

    tracing::debug!(
        conflict = ?event.id,
        attacker_strength,
        defender_strength,
        wall_level = snapshot.wall_level,
        victory,
        loot_per_attacker,
        "invasion resolved"
    );

    InvasionOutcome {
        conflict: event.id,
        territory: event.target_territory,
        victory,
        attacker_strength,
        defender_strength,
        attackers: event.signups().to_vec(),
        defenders: event.defenders().to_vec(),
        new_ruler: victory.then_some(event.attacking_ruler),
        loot_per_attacker,
        wall_damage: if victory { INVASION_WALL_DAMAGE } else { 0 },
        production_damage: victory,
        attacker_wound: (!victory).then_some(WOUND_DURATION),
    }
}

/// Even share of the raidable treasury
///
/// The vault shields 20% per level; the remaining fraction is clamped to
/// [0, 1] so a level-5 vault protects everything and never goes negative.
/// Only called on victory, where `attacker_count >= MIN_INVASION_ATTACKERS`.
fn loot_share(snapshot: &TerritorySnapshot, attacker_count: usize) -> Gold {
    let raidable_fraction =
        (1.0 - snapshot.vault_level as f64 * VAULT_PROTECTION_PER_LEVEL).clamp(0.0, 1.0);
    let lootable = snapshot.treasury_gold as f64 * raidable_fraction;
    (lootable / attacker_count as f64).floor() as Gold
}
