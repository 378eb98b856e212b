use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kubeforge_api::{build_graph, render_project_yaml};
use kubeforge_common::{
    ConfigMap, ContainerSpec, GraphFilter, Namespace, ProjectState, ServiceAccount, WorkloadConfig,
};

// Benchmark configuration
const SMALL_PROJECT: usize = 10;
const MEDIUM_PROJECT: usize = 100;
const LARGE_PROJECT: usize = 1000;

/// Project with `size` Deployments spread over ten namespaces, each with its
/// own ConfigMap and ServiceAccount
fn synthetic_project(size: usize) -> ProjectState {
    let namespace = |i: usize| format!("team-{}", i % 10);

    ProjectState {
        namespaces: (0..size.min(10)).map(|i| Namespace::new(namespace(i))).collect(),
        deployments: (0..size)
            .map(|i| WorkloadConfig {
                app_name: format!("app-{}", i),
                namespace: namespace(i),
                replicas: 3,
                containers: vec![ContainerSpec {
                    name: "app".to_string(),
                    image: format!("registry.example.com/app-{}:1.0", i),
                    port: Some(8080),
                    ..Default::default()
                }],
                target_port: 8080,
                selected_config_maps: vec![format!("app-{}-config", i)],
                service_account: Some(format!("app-{}-sa", i)),
                ..Default::default()
            })
            .collect(),
        config_maps: (0..size)
            .map(|i| {
                let mut config_map = ConfigMap {
                    name: format!("app-{}-config", i),
                    namespace: namespace(i),
                    ..Default::default()
                };
                config_map.data.insert("LOG_LEVEL".to_string(), "info".to_string());
                config_map
            })
            .collect(),
        service_accounts: (0..size)
            .map(|i| ServiceAccount {
                name: format!("app-{}-sa", i),
                namespace: namespace(i),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// Benchmark whole-project YAML rendering with different project sizes
fn bench_render_project_yaml(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_project_yaml");

    for size in [SMALL_PROJECT, MEDIUM_PROJECT, LARGE_PROJECT].iter() {
        let project = synthetic_project(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &project, |b, project| {
            b.iter(|| black_box(render_project_yaml(project, None)));
        });
    }

    group.finish();
}

/// Benchmark graph building for the grouped view and a single-kind view
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for size in [SMALL_PROJECT, MEDIUM_PROJECT, LARGE_PROJECT].iter() {
        let project = synthetic_project(*size);
        group.bench_with_input(BenchmarkId::new("all", size), &project, |b, project| {
            b.iter(|| black_box(build_graph(project, GraphFilter::All, None)));
        });
        group.bench_with_input(BenchmarkId::new("deployments", size), &project, |b, project| {
            b.iter(|| black_box(build_graph(project, GraphFilter::Deployments, None)));
        });
    }

    group.finish();
}

/// Benchmark parsing a stored project blob
fn bench_parse_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_project");

    for size in [SMALL_PROJECT, MEDIUM_PROJECT].iter() {
        let raw = serde_json::to_string(&synthetic_project(*size)).unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| black_box(ProjectState::from_document(raw)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_project_yaml,
    bench_build_graph,
    bench_parse_project
);
criterion_main!(benches);
