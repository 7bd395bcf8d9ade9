//! Headless Conflict Runner
//!
//! Runs a single coup or invasion scenario from a TOML file and prints the
//! outcome as JSON, for balance tuning without the full game around it.

use crownfall::conflict::constants::{
    ATTACKER_ADVANTAGE, MIN_INVASION_ATTACKERS, RALLY_WINDOW, VOTING_WINDOW,
};
use crownfall::conflict::{
    resolve_coup, resolve_invasion, CombatStats, CoupEvent, InvasionEvent, TerritorySnapshot,
};
use crownfall::core::types::{ConflictSide, Gold, ParticipantId, TerritoryId};
use crownfall::core::Timestamp;

use ahash::AHashMap;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Headless conflict runner - resolve one scenario and print the outcome
#[derive(Parser, Debug)]
#[command(name = "conflict_runner")]
#[command(about = "Resolve a coup or invasion scenario from a TOML file")]
struct Args {
    /// Scenario file (TOML); omit to run the built-in example
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for the flee roll (coups only)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// One combatant in the scenario file
#[derive(Debug, Deserialize)]
struct Fighter {
    name: String,
    #[serde(default)]
    attack_power: u32,
    #[serde(default)]
    defense_power: u32,
    #[serde(default)]
    gold: Gold,
}

#[derive(Debug, Deserialize)]
struct TerritoryConfig {
    #[serde(default)]
    treasury_gold: Gold,
    #[serde(default)]
    wall_level: u8,
    #[serde(default)]
    vault_level: u8,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    /// "coup" or "invasion"
    kind: String,
    territory: TerritoryConfig,
    attackers: Vec<Fighter>,
    #[serde(default)]
    defenders: Vec<Fighter>,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    kind: String,
    victory: bool,
    attacker_strength: f64,
    defender_strength: f64,
    required_strength: f64,
    attackers: usize,
    defenders: usize,
    loot_per_attacker: Option<Gold>,
    wall_damage: Option<u8>,
    ruler_fled: Option<bool>,
    seed: u64,
}

/// Strength the attackers must strictly exceed, per the resolver's rule
fn required_strength(defender_strength: f64) -> f64 {
    defender_strength * ATTACKER_ADVANTAGE
}

fn main() {
    let args = Args::parse();

    let scenario: Scenario = match &args.scenario {
        Some(path) => {
            let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {}", path.display(), e);
                std::process::exit(1);
            });
            toml::from_str(&content).unwrap_or_else(|e| {
                eprintln!("Invalid scenario TOML: {}", e);
                std::process::exit(1);
            })
        }
        None => builtin_scenario(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let territory = TerritoryId::new();
    let ruler = ParticipantId::new();
    let snapshot = TerritorySnapshot {
        treasury_gold: scenario.territory.treasury_gold,
        wall_level: scenario.territory.wall_level,
        vault_level: scenario.territory.vault_level,
        ruler,
    };

    let mut stats: AHashMap<ParticipantId, CombatStats> = AHashMap::new();
    let mut enroll = |fighters: &[Fighter]| -> Vec<ParticipantId> {
        fighters
            .iter()
            .map(|f| {
                let id = ParticipantId::new();
                stats.insert(
                    id,
                    CombatStats::new(f.attack_power, f.defense_power, f.gold),
                );
                id
            })
            .collect()
    };
    let attacker_ids = enroll(&scenario.attackers);
    let defender_ids = enroll(&scenario.defenders);

    if attacker_ids.is_empty() {
        eprintln!("Scenario needs at least one attacker");
        std::process::exit(1);
    }

    let result = match scenario.kind.as_str() {
        "coup" => {
            let opened = Timestamp(0);
            let mut event = CoupEvent::open(attacker_ids[0], territory, "scenario", opened);
            for &id in &attacker_ids[1..] {
                event.join(ConflictSide::Attacker, id, opened);
            }
            for &id in &defender_ids {
                event.join(ConflictSide::Defender, id, opened);
            }
            let deadline = opened + VOTING_WINDOW;
            let outcome = resolve_coup(&event, &stats, &snapshot, deadline);
            RunResult {
                kind: "coup".into(),
                victory: outcome.victory,
                attacker_strength: outcome.attacker_strength,
                defender_strength: outcome.defender_strength,
                required_strength: required_strength(outcome.defender_strength),
                attackers: outcome.attackers.len(),
                defenders: outcome.defenders.len(),
                loot_per_attacker: None,
                wall_damage: None,
                ruler_fled: outcome.victory.then(|| outcome.did_ruler_flee(&mut rng)),
                seed,
            }
        }
        "invasion" => {
            if scenario.attackers.len() < MIN_INVASION_ATTACKERS {
                eprintln!(
                    "Invasion scenario needs at least {} attackers, got {}",
                    MIN_INVASION_ATTACKERS,
                    scenario.attackers.len()
                );
                std::process::exit(1);
            }
            let opened = Timestamp(0);
            let mut event = InvasionEvent::open(
                TerritoryId::new(),
                "attacker homeland",
                attacker_ids[0],
                &scenario.attackers[0].name,
                territory,
                "scenario",
                opened,
            );
            for &id in &attacker_ids {
                event.signup(id, opened);
            }
            event.launch(opened);
            for &id in &defender_ids {
                event.join_defender(id, opened);
            }
            let deadline = opened + RALLY_WINDOW;
            let outcome = resolve_invasion(&event, &stats, &snapshot, deadline);
            RunResult {
                kind: "invasion".into(),
                victory: outcome.victory,
                attacker_strength: outcome.attacker_strength,
                defender_strength: outcome.defender_strength,
                required_strength: required_strength(outcome.defender_strength),
                attackers: outcome.attackers.len(),
                defenders: outcome.defenders.len(),
                loot_per_attacker: Some(outcome.loot_per_attacker),
                wall_damage: Some(outcome.wall_damage),
                ruler_fled: None,
                seed,
            }
        }
        other => {
            eprintln!("Unknown scenario kind '{}', expected coup or invasion", other);
            std::process::exit(1);
        }
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result).unwrap()),
        "text" => {
            println!("Conflict Result");
            println!("===============");
            println!("Kind: {}", result.kind);
            println!(
                "Attackers: {} ({:.1} strength)",
                result.attackers, result.attacker_strength
            );
            println!(
                "Defenders: {} ({:.1} strength, {:.1} required to beat)",
                result.defenders, result.defender_strength, result.required_strength
            );
            println!("Victory: {}", result.victory);
            if let Some(loot) = result.loot_per_attacker {
                println!("Loot per attacker: {}", loot);
            }
            if let Some(fled) = result.ruler_fled {
                println!("Ruler fled: {}", fled);
            }
            println!("Seed: {}", result.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_threshold_matches_the_resolver_boundary() {
        assert!((required_strength(80.0) - 100.0).abs() < f64::EPSILON);

        // An attacker exactly at the reported threshold must lose
        let initiator = ParticipantId::new();
        let defender = ParticipantId::new();
        let mut event = CoupEvent::open(initiator, TerritoryId::new(), "keep", Timestamp(0));
        event.join(ConflictSide::Defender, defender, Timestamp(1));

        let mut stats: AHashMap<ParticipantId, CombatStats> = AHashMap::new();
        stats.insert(initiator, CombatStats::new(100, 0, 0));
        stats.insert(defender, CombatStats::new(0, 80, 0));
        let snapshot = TerritorySnapshot {
            treasury_gold: 0,
            wall_level: 0,
            vault_level: 0,
            ruler: ParticipantId::new(),
        };

        let outcome = resolve_coup(&event, &stats, &snapshot, Timestamp(7200));
        assert!(outcome.attacker_strength <= required_strength(outcome.defender_strength));
        assert!(!outcome.victory);
    }
}

/// Five raiders against a walled, vaulted keep with two defenders
fn builtin_scenario() -> Scenario {
    Scenario {
        kind: "invasion".into(),
        territory: TerritoryConfig {
            treasury_gold: 1000,
            wall_level: 4,
            vault_level: 3,
        },
        attackers: (1..=5)
            .map(|i| Fighter {
                name: format!("Raider {}", i),
                attack_power: 20,
                defense_power: 5,
                gold: 100,
            })
            .collect(),
        defenders: vec![
            Fighter {
                name: "Ser Odo".into(),
                attack_power: 8,
                defense_power: 25,
                gold: 400,
            },
            Fighter {
                name: "Watch captain".into(),
                attack_power: 6,
                defense_power: 25,
                gold: 200,
            },
        ],
    }
}
