use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ct_animator::{Animator, CameraController};
use ct_geometry::{scene_rng, Populations, SceneConfig};
use ct_hand::{HandSample, InteractionState};
use ct_vision::{encode_jpeg, parse_hand_response, CAPTURE_HEIGHT, CAPTURE_WIDTH, JPEG_QUALITY};
use image::{Rgb, RgbImage};
use std::hint::black_box;

fn generate(c: &mut Criterion) {
    let config = SceneConfig::default();

    c.bench_function("Populations::generate (default counts)", |b| {
        b.iter(|| Populations::generate(black_box(&config), &mut scene_rng()))
    });
}

fn tick(c: &mut Criterion) {
    let config = SceneConfig::default();
    let populations = Populations::generate(&config, &mut scene_rng());

    for state in [InteractionState::Formed, InteractionState::Chaos] {
        let sample = HandSample::new(state, 0.7, 0.3);

        c.bench_function(&format!("Animator::tick ({state})"), |b| {
            b.iter_batched_ref(
                || Animator::new(&populations, &config.motion),
                |animator| {
                    for frame in 0..60 {
                        animator.tick(black_box(&sample), frame as f32 / 60.);
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }

    c.bench_function("CameraController::update", |b| {
        let mut camera = CameraController::new(config.camera);
        let sample = HandSample::new(InteractionState::Chaos, 0.9, 0.1);
        b.iter(|| camera.update(black_box(&sample)))
    });
}

fn vision(c: &mut Criterion) {
    let frame = RgbImage::from_fn(640, 480, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));

    c.bench_function("encode_jpeg (640x480 -> 320x240)", |b| {
        b.iter(|| encode_jpeg(black_box(&frame), CAPTURE_WIDTH, CAPTURE_HEIGHT, JPEG_QUALITY))
    });

    c.bench_function("parse_hand_response", |b| {
        b.iter(|| parse_hand_response(black_box(r#"{"status":"CHAOS","x":0.9,"y":0.1}"#)))
    });
}

criterion_group!(benches, generate, tick, vision);
criterion_main!(benches);
