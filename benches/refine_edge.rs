use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sprocket_edge::tools::{add_noise, synthetic_step_frame};
use sprocket_edge::{BoundingRegion, RefineConfig, Refiner, refine_edge};

mod common;

fn box_for(width: usize, height: usize, edge_row: f32) -> BoundingRegion {
    let top = edge_row as i32 - 10;
    BoundingRegion::new(
        (width / 5) as i32,
        top,
        (width - width / 5) as i32,
        top + (height / 2) as i32,
    )
}

fn bench_refine_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine_edge");
    for &(width, height) in &[(64usize, 160usize), (160, 400), (320, 800)] {
        let edge_row = height as f32 * 0.3 + 0.2;
        let mut frame = synthetic_step_frame(width, height, edge_row, 40, 200);
        add_noise(&mut frame, 6, 11);
        let bbox = box_for(width, height, edge_row);
        let config = RefineConfig::default();
        group.bench_with_input(
            BenchmarkId::new("default", format!("{width}x{height}")),
            &frame,
            |b, frame| {
                let view = frame.view().unwrap();
                b.iter(|| {
                    refine_edge(
                        black_box(&view),
                        black_box(&bbox),
                        black_box(bbox.top as f32),
                        &config,
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_refine_configs(c: &mut Criterion) {
    let (width, height) = (160usize, 400usize);
    let edge_row = 120.2;
    let mut frame = synthetic_step_frame(width, height, edge_row, 40, 200);
    add_noise(&mut frame, 6, 5);
    let bbox = box_for(width, height, edge_row);
    let view = frame.view().unwrap();

    let configs = [
        ("default", RefineConfig::default()),
        ("compat", RefineConfig::compat()),
        (
            "parallel_methods",
            RefineConfig {
                parallel_methods: true,
                ..Default::default()
            },
        ),
    ];

    let mut group = c.benchmark_group("refine_edge_config");
    for (name, config) in &configs {
        group.bench_function(*name, |b| {
            b.iter(|| refine_edge(black_box(&view), &bbox, bbox.top as f32, config))
        });
    }
    group.finish();
}

fn bench_dataset_sequence(c: &mut Criterion) {
    let frames = common::load_dataset_frames();
    if frames.is_empty() {
        return;
    }
    let config = RefineConfig {
        smoothing_enabled: true,
        ..Default::default()
    };
    c.bench_function("refine_dataset_sequence", |b| {
        b.iter(|| {
            let mut refiner = Refiner::new(config.clone()).unwrap();
            for (frame, bbox) in &frames {
                let view = frame.view().unwrap();
                black_box(refiner.process(&view, bbox));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_refine_sizes,
    bench_refine_configs,
    bench_dataset_sequence
);
criterion_main!(benches);
