//! Performance benchmarks for rating calculations and match resolution

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use foosball_ladder::ladder::LadderService;
use foosball_ladder::rating::{EloEngine, InMemoryPlayerStore, RatingEngine};
use foosball_ladder::types::{MatchRequest, NewPlayerRequest};
use std::sync::Arc;

fn bench_rating_calculations(c: &mut Criterion) {
    let engine = EloEngine::default();

    c.bench_function("elo_rating_delta", |b| {
        b.iter(|| engine.rating_delta(black_box(1032.5), black_box(987.25)))
    });

    c.bench_function("elo_expected_score", |b| {
        b.iter(|| engine.expected_score(black_box(1400.0), black_box(1000.0)))
    });

    c.bench_function("elo_resolve_pair", |b| {
        b.iter(|| engine.resolve(black_box(1000.0), black_box(1000.0)))
    });
}

fn create_bench_ladder(rt: &tokio::runtime::Runtime, players: usize) -> LadderService {
    let store = Arc::new(InMemoryPlayerStore::default());
    let ladder = LadderService::new(store, Arc::new(EloEngine::default()));

    rt.block_on(async {
        for i in 0..players {
            ladder
                .create_player(NewPlayerRequest {
                    name: format!("player{}", i),
                })
                .await
                .unwrap();
        }
    });

    ladder
}

fn bench_match_resolution(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ladder = create_bench_ladder(&rt, 100);

    let mut round = 0usize;
    c.bench_function("resolve_match", |b| {
        b.iter(|| {
            round += 1;
            let winner = format!("player{}", round % 100);
            let loser = format!("player{}", (round + 1) % 100);
            rt.block_on(ladder.resolve_match(MatchRequest::new(winner, loser)))
                .unwrap()
        })
    });

    c.bench_function("list_players_100", |b| {
        b.iter(|| rt.block_on(ladder.list_players()).unwrap())
    });
}

criterion_group!(benches, bench_rating_calculations, bench_match_resolution);
criterion_main!(benches);
