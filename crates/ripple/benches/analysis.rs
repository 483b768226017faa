//! Benchmarks for impact analysis.
//!
//! These benchmarks measure the performance of:
//! - `analyze_impact` over layered snapshots of growing size
//! - `find_path` between the bottom and top layers

// Benchmark code - performance of the benchmark setup is not critical
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ripple::{
    ChangeSet, ChangeType, Dependency, DependencyGraph, DependencyResult, DependencyStrength,
    DependencyType, ImpactAnalysisConfig, ImpactAnalyzer, ModuleDependencies, TraversalDirection,
    find_path,
};

const LAYERS: usize = 6;

/// Generate a layered snapshot with `width` modules per layer.
///
/// Every module in layer `n + 1` depends on two modules of layer `n`:
/// ```text
/// layer5/m* -> layer4/m* -> ... -> layer0/m*
/// ```
fn generate_layered_snapshot(width: usize) -> DependencyResult {
    let mut deps = DependencyResult {
        repository: "bench".to_string(),
        ..DependencyResult::default()
    };

    for layer in 0..LAYERS {
        for i in 0..width {
            let name = format!("layer{layer}/m{i}");
            deps.modules
                .insert(name.clone(), ModuleDependencies::new(name.clone(), "go"));
            if layer == 0 {
                continue;
            }
            for target in [i, (i + 1) % width] {
                let strength = if target == i {
                    DependencyStrength::Strong
                } else {
                    DependencyStrength::Weak
                };
                deps.dependencies.push(
                    Dependency::new(
                        name.clone(),
                        format!("layer{}/m{target}", layer - 1),
                        DependencyType::Import,
                        strength,
                    )
                    .with_language("go"),
                );
            }
        }
    }

    deps
}

fn bench_analyze_impact(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_impact");
    let analyzer = ImpactAnalyzer::new(ImpactAnalysisConfig::default()).expect("valid config");

    for width in [10, 50, 200] {
        let deps = generate_layered_snapshot(width);
        let change = ChangeSet::new("bench", ChangeType::Modification, ["layer0/m0", "layer0/m1"]);

        group.throughput(Throughput::Elements(deps.dependencies.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &deps, |b, deps| {
            b.iter(|| {
                analyzer
                    .analyze_impact(black_box(&change), black_box(deps))
                    .expect("analysis failed")
            });
        });
    }

    group.finish();
}

fn bench_find_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");

    for width in [10, 50, 200] {
        let deps = generate_layered_snapshot(width);
        let graph = DependencyGraph::from_edges(&deps.dependencies);
        let target = format!("layer{}/m{}", LAYERS - 1, width / 2);

        group.bench_with_input(BenchmarkId::from_parameter(width), &graph, |b, graph| {
            b.iter(|| {
                find_path(
                    black_box(graph),
                    "layer0/m0",
                    black_box(&target),
                    TraversalDirection::Dependents,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze_impact, bench_find_path);
criterion_main!(benches);
