use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use review_roster::adapters::memory::InMemoryStore;
use review_roster::adapters::random::SeededRandom;
use review_roster::domain::models::{SamplingStrategy, Team, TeamMember};
use review_roster::services::{select_reviewers, PullRequestService, ReviewerSelector, TeamService};

fn team_of(size: usize) -> Team {
    (0..size).fold(Team::new("bench"), |team, i| {
        team.with_member(TeamMember::new(format!("u{i}"), format!("User {i}"), i % 3 != 0))
    })
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_reviewers");
    let random = SeededRandom::new(42);

    for size in [4, 32, 256] {
        let team = team_of(size);
        for strategy in [SamplingStrategy::WithReplacement, SamplingStrategy::Distinct] {
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), size),
                &team,
                |b, team| b.iter(|| select_reviewers(black_box(team), "u1", &random, strategy)),
            );
        }
    }
    group.finish();
}

fn bench_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let store = Arc::new(InMemoryStore::new());
    rt.block_on(async {
        TeamService::new(store.clone(), store.clone())
            .add_team(&team_of(32))
            .await
            .expect("seed team");
    });
    let selector = ReviewerSelector::new(Arc::new(SeededRandom::new(7)), SamplingStrategy::Distinct);
    let service = PullRequestService::new(store.clone(), store.clone(), store, selector);

    let mut counter = 0u64;
    c.bench_function("create_pull_request_in_memory", |b| {
        b.to_async(&rt).iter(|| {
            counter += 1;
            let id = format!("pr-{counter}");
            let service = &service;
            async move { service.create(&id, "Bench", "u1").await.expect("create") }
        });
    });
}

criterion_group!(benches, bench_select, bench_create);
criterion_main!(benches);
