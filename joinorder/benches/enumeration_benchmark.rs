/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate criterion;
extern crate joinorder;

use criterion::*;
use joinorder::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct BenchQuery {
    graph: InMemoryJoinGraph,
    indexes: InMemoryIndexCatalog,
    cardinality: SelectivityCardinalityEstimator,
}

// Fully connected graph with random base cardinalities
fn setup_query(num_nodes: usize, seed: u64) -> BenchQuery {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = InMemoryJoinGraph::new();
    let mut indexes = InMemoryIndexCatalog::new();
    let mut base = Vec::with_capacity(num_nodes);

    for i in 0..num_nodes {
        let node = graph.add_node(AccessPath::new(format!("coll{}", i))).unwrap();
        base.push(rng.gen_range(10.0..100_000.0));
        if rng.gen_bool(0.5) {
            let field = format!("f{}", i);
            indexes.add_index(node, IndexEntry::new(format!("{}_1", field), &[field.as_str()]));
        }
    }
    for i in 1..num_nodes {
        for j in 0..i {
            graph
                .add_simple_equality_edge(j, i, &format!("f{}", j), &format!("f{}", i))
                .unwrap();
        }
    }

    let mut cardinality = SelectivityCardinalityEstimator::new(base);
    for edge in graph.edges() {
        cardinality.add_edge_selectivity(edge.nodes(), rng.gen_range(0.001..0.5));
    }

    BenchQuery {
        graph,
        indexes,
        cardinality,
    }
}

fn enumerate(query: &BenchQuery, strategy: &EnumerationStrategy) -> JoinPlanTable {
    let coster = DefaultJoinCostEstimator::new(&query.cardinality);
    PlanEnumerator::new(
        &query.graph,
        &query.indexes,
        &query.cardinality,
        Some(&coster),
        strategy,
    )
    .unwrap()
    .enumerate_join_subsets()
}

fn strategy(shape: PlanTreeShape, mode: PlanEnumerationMode) -> EnumerationStrategy {
    EnumerationStrategy::default()
        .with_plan_shape(shape)
        .with_mode(PerSubsetLevelEnumerationMode::from_mode(mode).unwrap())
}

fn enumeration_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cheapest");
    for num_nodes in [4usize, 8, 10, 12] {
        let query = setup_query(num_nodes, 42);
        for shape in [PlanTreeShape::LeftDeep, PlanTreeShape::ZigZag] {
            let strategy = strategy(shape, PlanEnumerationMode::Cheapest);
            group.bench_with_input(
                BenchmarkId::new(shape.to_string(), num_nodes),
                &query,
                |b, query| b.iter(|| enumerate(query, &strategy)),
            );
        }
    }
    group.finish();

    let mut group = c.benchmark_group("all-plans");
    group.sample_size(10);
    for num_nodes in [3usize, 4, 5] {
        let query = setup_query(num_nodes, 7);
        let strategy = strategy(PlanTreeShape::ZigZag, PlanEnumerationMode::All);
        group.bench_with_input(BenchmarkId::from_parameter(num_nodes), &query, |b, query| {
            b.iter(|| enumerate(query, &strategy))
        });
    }
    group.finish();

    c.bench_function("parse_schedule", |b| {
        b.iter(|| parse_schedule(black_box("0:CHEAPEST, 3:HINTED(4,HJ,left), 4:HINTED(1,NLJ,right), 5:ALL")))
    });
}

criterion_group!(benches, enumeration_benchmark);
criterion_main!(benches);
