//! Role resolution benchmarks
//!
//! Measures direct rule matching, conversion chains of growing length and
//! collection checks over growing held-role sets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rolecheck_authz::{Payload, Registry, Resolver, RoleDefinition, RoleKind, RoleValue};
use std::sync::Arc;

rolecheck_authz::role_kinds! {
    enum Tier {
        T0, T1, T2, T3, T4, T5, T6, T7, T8, T9,
        Member,
        Admin,
    }
}

/// T0 converts to T1, T1 to T2, and so on up to T9
fn tier_resolver() -> Resolver<Tier> {
    let tiers = &Tier::all()[..10];
    let mut definitions: Vec<RoleDefinition<Tier>> = tiers
        .windows(2)
        .map(|pair| RoleDefinition::new(pair[0]).conversion(pair[1], |payload| Some(payload.clone())))
        .collect();

    definitions.push(RoleDefinition::new(Tier::T9));
    definitions.push(RoleDefinition::new(Tier::Member).with_fields(["team_id"]));
    definitions.push(
        RoleDefinition::new(Tier::Admin)
            .with_fields(["team_id"])
            .attribute_rule("team_id", "team_id", Tier::Member)
            .delegated(Tier::T0, [("team_id", "team_id")], |_, _| false),
    );

    Resolver::new(Arc::new(Registry::build(definitions).unwrap()))
}

fn member(team_id: i64) -> RoleValue<Tier> {
    RoleValue::new(Tier::Member, Payload::new().with("team_id", team_id))
}

fn bench_direct_rules(c: &mut Criterion) {
    let resolver = tier_resolver();
    let admin = RoleValue::new(Tier::Admin, Payload::new().with("team_id", 7));

    let mut group = c.benchmark_group("direct_rules");

    group.bench_function("identity", |b| {
        let provided = member(7);
        b.iter(|| resolver.satisfies(black_box(&provided), black_box(&provided)))
    });

    group.bench_function("attribute_rule", |b| {
        let provided = member(7);
        b.iter(|| resolver.satisfies(black_box(&admin), black_box(&provided)))
    });

    group.bench_function("attribute_mismatch", |b| {
        let provided = member(8);
        b.iter(|| resolver.satisfies(black_box(&admin), black_box(&provided)))
    });

    group.finish();
}

fn bench_conversion_chain(c: &mut Criterion) {
    let resolver = tier_resolver();
    let provided = RoleValue::new(Tier::T0, Payload::new().with("team_id", 7));

    let mut group = c.benchmark_group("conversion_chain");

    for hops in [1usize, 3, 6, 9].iter() {
        let required = RoleValue::new(Tier::all()[*hops], Payload::new().with("team_id", 7));
        group.bench_with_input(BenchmarkId::new("hops", hops), hops, |b, _| {
            b.iter(|| resolver.resolve(black_box(&required), black_box(&provided)))
        });
    }

    group.finish();
}

fn bench_any_satisfies(c: &mut Criterion) {
    let resolver = tier_resolver();
    let required = RoleValue::new(Tier::Admin, Payload::new().with("team_id", 0));

    let mut group = c.benchmark_group("any_satisfies");

    for held_count in [1i64, 10, 100].iter() {
        // Only the last held role matches
        let held: Vec<RoleValue<Tier>> = (0..*held_count).rev().map(member).collect();
        group.bench_with_input(BenchmarkId::new("held", held_count), &held, |b, held| {
            b.iter(|| resolver.any_satisfies(black_box(held), black_box(&required)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_direct_rules, bench_conversion_chain, bench_any_satisfies);
criterion_main!(benches);
