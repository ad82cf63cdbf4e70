use criterion::{Criterion, criterion_group, criterion_main};
use kview::body::{build_overlay, rasterize, Body, JointType, PinholeMapper, TrackingState, BODY_COUNT};
use kview::image::{self, InfraredParams, MAP_DEPTH_TO_BYTE};
use kview::types::{Dimensions, StreamKind, ValidRange};
use std::hint::black_box;

const DEPTH: Dimensions = Dimensions {
    width: 512,
    height: 424,
};

/// Deterministic ramp covering in-range and out-of-range samples
fn samples() -> Vec<u16> {
    (0..DEPTH.pixel_count())
        .map(|i| u16::try_from(i % 9000).unwrap())
        .collect()
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth");
    let samples = samples();
    let mut out = vec![0u8; samples.len()];

    group.bench_function("map_depth_512x424", |b| {
        b.iter(|| {
            image::map_depth(black_box(&samples), ValidRange::KINECT_DEPTH, MAP_DEPTH_TO_BYTE, &mut out).unwrap();
            black_box(&out);
        });
    });

    group.bench_function("map_depth_far_field_512x424", |b| {
        let range = ValidRange::KINECT_DEPTH.far_field();
        b.iter(|| {
            image::map_depth(black_box(&samples), range, MAP_DEPTH_TO_BYTE, &mut out).unwrap();
            black_box(&out);
        });
    });

    group.finish();
}

fn bench_infrared(c: &mut Criterion) {
    let mut group = c.benchmark_group("infrared");
    let samples: Vec<u16> = samples().iter().map(|s| s.wrapping_mul(7)).collect();
    let mut out = vec![0f32; samples.len()];
    let params = InfraredParams::default();

    group.bench_function("map_infrared_512x424", |b| {
        b.iter(|| {
            image::map_infrared(black_box(&samples), &params, &mut out).unwrap();
            black_box(&out);
        });
    });

    group.finish();
}

fn bench_skeleton(c: &mut Criterion) {
    let mut group = c.benchmark_group("skeleton");
    let mapper = PinholeMapper::default();

    let bodies: Vec<Body> = (0..BODY_COUNT)
        .map(|slot| {
            let mut body = Body {
                is_tracked: true,
                ..Body::default()
            };
            for (i, joint_type) in JointType::ALL.into_iter().enumerate() {
                let joint = body.joint_mut(joint_type);
                joint.position.x = slot as f32 * 0.3 - 0.8;
                joint.position.y = 0.8 - i as f32 * 0.06;
                joint.position.z = 2.5;
                joint.tracking_state = TrackingState::Tracked;
            }
            body
        })
        .collect();

    let mut out = vec![0u8; StreamKind::Body.default_description().dimensions.pixel_count() * 4];

    group.bench_function("overlay_six_bodies", |b| {
        b.iter(|| {
            let commands = build_overlay(black_box(&bodies), &mapper, DEPTH);
            rasterize(&commands, DEPTH, &mut out).unwrap();
            black_box(&out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_depth, bench_infrared, bench_skeleton);
criterion_main!(benches);
