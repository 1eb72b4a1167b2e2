use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sprocket_edge::config::{ContourThresholds, GradientPolarity};
use sprocket_edge::edges::contour::contour_edge_map;
use sprocket_edge::edges::gradient::gradient_edge_map;
use sprocket_edge::edges::morphology::morphological_edge_map;
use sprocket_edge::models::WorkingRegion;
use sprocket_edge::tools::{add_noise, synthetic_step_frame};
use sprocket_edge::utils::grayscale::{region_luma, region_luma_parallel};

fn bench_luma(c: &mut Criterion) {
    let mut frame = synthetic_step_frame(640, 480, 200.4, 40, 200);
    add_noise(&mut frame, 8, 3);
    let view = frame.view().unwrap();
    let region = WorkingRegion {
        left: 100,
        top: 100,
        right: 400,
        bottom: 400,
    };
    c.bench_function("region_luma_300x300", |b| {
        b.iter(|| region_luma(black_box(&view), black_box(&region)))
    });
    c.bench_function("region_luma_parallel_300x300", |b| {
        b.iter(|| region_luma_parallel(black_box(&view), black_box(&region)))
    });
}

fn bench_methods(c: &mut Criterion) {
    let mut frame = synthetic_step_frame(120, 200, 60.3, 40, 200);
    add_noise(&mut frame, 8, 9);
    let view = frame.view().unwrap();
    let region = WorkingRegion {
        left: 0,
        top: 0,
        right: 120,
        bottom: 200,
    };
    let luma = region_luma(&view, &region);

    c.bench_function("gradient_edge_map_120x200", |b| {
        b.iter(|| gradient_edge_map(black_box(&luma), GradientPolarity::DarkToBright))
    });
    c.bench_function("contour_edge_map_120x200", |b| {
        b.iter(|| {
            contour_edge_map(
                black_box(&luma),
                ContourThresholds::Adaptive {
                    low_ratio: 0.33,
                    high_ratio: 0.66,
                },
            )
        })
    });
    c.bench_function("morphological_edge_map_120x200", |b| {
        b.iter(|| morphological_edge_map(black_box(&luma), 1))
    });
}

criterion_group!(benches, bench_luma, bench_methods);
criterion_main!(benches);
