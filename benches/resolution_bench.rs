//! Benchmarks for conflict resolution throughput.
//!
//! Resolution is the hot path when many territory deadlines land in the
//! same scheduler sweep.

#![allow(missing_docs)]

use std::hint::black_box;

use ahash::AHashMap;
use criterion::{criterion_group, criterion_main, Criterion};

use crownfall::conflict::{
    resolve_invasion, CombatStats, ConflictLedger, InvasionEvent, TerritorySnapshot,
};
use crownfall::core::config::EngineConfig;
use crownfall::core::types::{ParticipantId, TerritoryId};
use crownfall::core::Timestamp;

fn launched_invasion(
    attackers: usize,
    defenders: usize,
) -> (InvasionEvent, AHashMap<ParticipantId, CombatStats>) {
    let mut event = InvasionEvent::open(
        TerritoryId::new(),
        "home",
        ParticipantId::new(),
        "ruler",
        TerritoryId::new(),
        "target",
        Timestamp(0),
    );
    let mut stats = AHashMap::new();
    for i in 0..attackers {
        let id = ParticipantId::new();
        event.signup(id, Timestamp(1));
        stats.insert(id, CombatStats::new(10 + (i % 7) as u32, 5, 100));
    }
    event.launch(Timestamp(10));
    for i in 0..defenders {
        let id = ParticipantId::new();
        event.join_defender(id, Timestamp(20));
        stats.insert(id, CombatStats::new(5, 8 + (i % 5) as u32, 50));
    }
    (event, stats)
}

fn snapshot() -> TerritorySnapshot {
    TerritorySnapshot {
        treasury_gold: 100_000,
        wall_level: 4,
        vault_level: 2,
        ruler: ParticipantId::new(),
    }
}

fn bench_resolve_invasion(c: &mut Criterion) {
    let (event, stats) = launched_invasion(100, 80);
    let snap = snapshot();

    c.bench_function("resolve_invasion_100v80", |b| {
        b.iter(|| {
            let outcome = resolve_invasion(
                black_box(&event),
                black_box(&stats),
                black_box(&snap),
                Timestamp(10 + 7200),
            );
            black_box(outcome)
        });
    });
}

fn bench_ledger_sweep(c: &mut Criterion) {
    // 64 territories hit their coup deadline in the same sweep
    c.bench_function("ledger_sweep_64_coups", |b| {
        b.iter_with_setup(
            || {
                let ledger = ConflictLedger::new(EngineConfig::default());
                let mut stats = AHashMap::new();
                let mut snapshots = AHashMap::new();
                for _ in 0..64 {
                    let territory = TerritoryId::new();
                    let initiator = ParticipantId::new();
                    stats.insert(initiator, CombatStats::new(30, 10, 200));
                    snapshots.insert(territory, snapshot());
                    ledger
                        .open_coup(initiator, territory, "keep", Timestamp(0))
                        .unwrap();
                }
                (ledger, stats, snapshots)
            },
            |(ledger, stats, snapshots)| {
                let resolved = ledger.resolve_due(&stats, &snapshots, Timestamp(7200));
                black_box(resolved)
            },
        );
    });
}

criterion_group!(benches, bench_resolve_invasion, bench_ledger_sweep);
criterion_main!(benches);
