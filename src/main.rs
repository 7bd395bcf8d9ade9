//! Crownfall - Entry Point
//!
//! Scripted demo season: opens a coup and an invasion, drives their windows
//! forward on a manual clock, lets the scheduler resolve them, and applies
//! the outcomes to participant and territory state.

use crownfall::conflict::constants::WOUND_DURATION;
use crownfall::conflict::{ConflictLedger, ConflictOutcome};
use crownfall::core::config::EngineConfig;
use crownfall::core::error::Result;
use crownfall::core::types::{ConflictSide, ParticipantId};
use crownfall::core::{Clock, ManualClock, Timestamp};
use crownfall::kingdom::{ParticipantRecord, ParticipantStore, TerritoryState};
use crownfall::schedule::ResolutionScheduler;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("crownfall=debug")
        .init();

    tracing::info!("Crownfall demo season starting");

    let config = EngineConfig::default();
    config
        .validate()
        .map_err(crownfall::core::error::ConflictError::InvalidConfig)?;

    let store = Arc::new(ParticipantStore::new());
    let ledger = Arc::new(ConflictLedger::new(config.clone()));
    let clock = Arc::new(ManualClock::new(Timestamp(0)));
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    // Cast of the season
    let maret = store.insert(named("Queen Maret", 15, 14, 2000));
    let bram = store.insert(named("Bram", 16, 9, 600));
    let edda = store.insert(named("Edda", 12, 8, 300));
    let loyalist = store.insert(named("Ser Odo", 10, 11, 400));
    let raiders: Vec<ParticipantId> = (0..4)
        .map(|i| store.insert(named(&format!("Raider {}", i + 1), 11, 7, 150)))
        .collect();

    let mut ravenholm = TerritoryState::new("Ravenholm", maret);
    ravenholm.treasury_gold = 1500;
    ravenholm.wall_level = 3;
    ravenholm.vault_level = 1;
    ravenholm.production_level = 2;

    let mut saltcliff = TerritoryState::new("Saltcliff", loyalist);
    saltcliff.treasury_gold = 1000;
    saltcliff.wall_level = 2;
    saltcliff.vault_level = 2;
    saltcliff.production_level = 3;

    println!("\n=== CROWNFALL: A SEASON OF CONFLICT ===\n");

    // --- Act 1: Bram's coup against Queen Maret ---
    let coup_id = ledger.open_coup(bram, ravenholm.id, ravenholm.name.clone(), clock.now())?;
    ledger.join_coup(coup_id, ConflictSide::Attacker, edda, clock.now())?;
    ledger.join_coup(coup_id, ConflictSide::Defender, loyalist, clock.now())?;
    ledger.join_coup(coup_id, ConflictSide::Defender, maret, clock.now())?;

    let event = ledger.coup(coup_id).expect("coup just opened");
    println!(
        "Coup brewing in {}: {} rebels vs {} loyalists, {}s until the vote closes",
        event.territory_name,
        event.attackers().len(),
        event.defenders().len(),
        event.time_remaining(clock.now()).as_secs()
    );

    // The voting window closes; one scheduler sweep resolves the coup
    clock.advance(Duration::from_secs(2 * 3600));
    let scheduler = make_scheduler(&ledger, &clock, &store, &[&ravenholm, &saltcliff], &config);
    let resolved = scheduler.step();
    assert_eq!(resolved.len(), 1);

    let Some(ConflictOutcome::Coup(coup)) = ledger.outcome(coup_id) else {
        unreachable!("coup was just resolved");
    };
    println!(
        "Coup resolved: attackers {:.0} vs defenders {:.0} -> {}",
        coup.attacker_strength,
        coup.defender_strength,
        if coup.victory {
            "the throne falls"
        } else {
            "the crown holds"
        }
    );

    if coup.victory {
        ravenholm.apply_coup_outcome(&coup);
        if coup.did_ruler_flee(&mut rng) {
            println!("Queen Maret slips away before the rebels reach her chambers.");
        } else {
            store.apply_overthrown_ruler(coup.previous_ruler, ravenholm.id)?;
            println!("Queen Maret is caught and stripped of her standing.");
        }
    } else {
        for &attacker in coup.attackers.iter() {
            let forfeited = store.apply_coup_failure(attacker, coup.previous_ruler, ravenholm.id)?;
            let name = store.get(attacker).map(|r| r.name).unwrap_or_default();
            println!("{} forfeits {} gold to the crown.", name, forfeited);
        }
    }
    println!("Ravenholm's ruler is now {}\n", ruler_name(&store, &ravenholm));

    // --- Act 2: Ravenholm marches on Saltcliff ---
    let invasion_id = ledger.open_invasion(
        ravenholm.id,
        ravenholm.name.clone(),
        ravenholm.ruler,
        ruler_name(&store, &ravenholm),
        saltcliff.id,
        saltcliff.name.clone(),
        clock.now(),
    )?;

    ledger.signup(invasion_id, ravenholm.ruler, clock.now())?;
    for &raider in &raiders {
        ledger.signup(invasion_id, raider, clock.now())?;
    }
    let muster = ledger.invasion(invasion_id).expect("invasion just opened");
    println!(
        "Invasion of {} musters {} attackers ({} gold committed)",
        muster.target_territory_name,
        muster.signups().len(),
        muster.total_cost()
    );

    if ledger.launch(invasion_id, clock.now())? {
        println!("The host launches; Saltcliff has two hours to rally.");
    }
    ledger.join_invasion_defender(invasion_id, loyalist, clock.now())?;

    // Run the async scheduler through the rally deadline
    clock.advance(Duration::from_secs(2 * 3600));
    let scheduler = make_scheduler(&ledger, &clock, &store, &[&ravenholm, &saltcliff], &config);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let runner = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let _ = shutdown_tx.send(());
    let resolved = runner.await.expect("scheduler task");
    assert_eq!(resolved.len(), 1);

    let Some(ConflictOutcome::Invasion(invasion)) = ledger.outcome(invasion_id) else {
        unreachable!("invasion was just resolved");
    };
    println!(
        "Invasion resolved: attackers {:.0} vs defenders {:.0} (walls included) -> {}",
        invasion.attacker_strength,
        invasion.defender_strength,
        if invasion.victory {
            "the gates are breached"
        } else {
            "the walls hold"
        }
    );

    if invasion.victory {
        saltcliff.apply_invasion_outcome(&invasion);
        println!(
            "Each attacker carries off {} gold; Saltcliff's walls drop to level {}.",
            invasion.loot_per_attacker, saltcliff.wall_level
        );
    } else if let Some(debuff) = invasion.attacker_debuff() {
        let expiry = clock.now() + WOUND_DURATION;
        for &attacker in invasion.attackers.iter() {
            store.apply_wound_debuff(attacker, debuff.attack_lost, expiry)?;
            store.deduct_reputation(attacker, debuff.reputation_lost)?;
        }
        println!(
            "The attackers limp home wounded for {} hours.",
            WOUND_DURATION.as_secs() / 3600
        );
    }

    println!("\n=== SEASON COMPLETE ===");
    println!(
        "Ravenholm: ruler {}, treasury {}, walls {}",
        ruler_name(&store, &ravenholm),
        ravenholm.treasury_gold,
        ravenholm.wall_level
    );
    println!(
        "Saltcliff: ruler {}, treasury {}, walls {}",
        ruler_name(&store, &saltcliff),
        saltcliff.treasury_gold,
        saltcliff.wall_level
    );
    println!("Conflicts in the ledger's history: {}", ledger.history().len());
    Ok(())
}

fn named(name: &str, attack: u32, defense: u32, gold: u64) -> ParticipantRecord {
    let mut record = ParticipantRecord::new(name, attack, defense, gold);
    record.leadership = 5;
    record
}

fn ruler_name(store: &ParticipantStore, territory: &TerritoryState) -> String {
    store
        .get(territory.ruler)
        .map(|r| r.name)
        .unwrap_or_else(|| "unknown".into())
}

/// Snapshot the territories as they stand and wire up a scheduler
fn make_scheduler(
    ledger: &Arc<ConflictLedger>,
    clock: &Arc<ManualClock>,
    store: &Arc<ParticipantStore>,
    territories: &[&TerritoryState],
    config: &EngineConfig,
) -> ResolutionScheduler {
    let mut snapshots = AHashMap::new();
    for territory in territories {
        snapshots.insert(territory.id, territory.snapshot());
    }
    ResolutionScheduler::new(
        Arc::clone(ledger),
        Arc::clone(clock) as Arc<dyn Clock>,
        Arc::clone(store) as Arc<dyn crownfall::conflict::StatsSource>,
        Arc::new(snapshots),
        config.poll_interval,
    )
}
