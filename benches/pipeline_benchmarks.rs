//! Performance benchmarks for the order pipeline
//! Measures fast-forward throughput across kitchen capacities and order volumes

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use restaurant_sim::config::{SimulationConfig, SimulationMode};
use restaurant_sim::kitchen::{preparation_time, SlotPool};
use restaurant_sim::menu::default_menu;
use restaurant_sim::restaurant::Restaurant;
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

const ITEM_MIX: [&[&str]; 4] = [
    &["burger", "fries"],
    &["pizza", "salad"],
    &["pasta", "soup"],
    &["burger", "pizza", "fries"],
];

async fn run_orders(capacity: usize, orders: usize) -> usize {
    let config = SimulationConfig {
        mode: SimulationMode::FastForward,
        capacity,
        seed: Some(11),
        ..Default::default()
    };
    let restaurant = Restaurant::from_config(&config).unwrap();
    let menu = default_menu();

    for i in 0..orders {
        let items = menu.resolve(ITEM_MIX[i % ITEM_MIX.len()]).unwrap();
        restaurant.create_order("bench", items).unwrap();
    }
    restaurant.wait_until_drained().await;
    restaurant.kitchen().peak_load()
}

fn bench_pipeline_throughput(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("pipeline_throughput");
    group.measurement_time(Duration::from_secs(10));

    for orders in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("orders", orders), orders, |b, &orders| {
            b.to_async(&rt)
                .iter(|| async move { black_box(run_orders(10, orders).await) });
        });
    }

    group.finish();
}

fn bench_capacity_scaling(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("capacity_scaling");

    for capacity in &[1usize, 4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("capacity", capacity),
            capacity,
            |b, &capacity| {
                b.to_async(&rt)
                    .iter(|| async move { black_box(run_orders(capacity, 200).await) });
            },
        );
    }

    group.finish();
}

fn bench_slot_acquire_release(c: &mut Criterion) {
    let pool = SlotPool::new(8);
    c.bench_function("slot_acquire_release", |b| {
        b.iter(|| {
            let slot = pool.try_acquire();
            black_box(&slot);
        })
    });
}

fn bench_preparation_time(c: &mut Criterion) {
    c.bench_function("preparation_time", |b| {
        b.iter(|| preparation_time(black_box(Duration::from_secs(1_380)), black_box(3)))
    });
}

criterion_group!(
    benches,
    bench_pipeline_throughput,
    bench_capacity_scaling,
    bench_slot_acquire_release,
    bench_preparation_time
);

criterion_main!(benches);
