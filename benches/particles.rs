use std::sync::{Arc, Mutex};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Mat4;
use rand::SeedableRng;
use rand::rngs::StdRng;

use diorama::atmosphere::{LightningTrigger, RAIN_PARTICLE_COUNT, RainField, Weather};
use diorama::core::input::InputState;
use diorama::overlay::{RemoteOverlay, SharedDebugState};
use diorama::render::FrameRecorder;
use diorama::scene::{FrameOrchestrator, ProgramSettings, SceneConfig, SceneState};

fn bench_rain_advance(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut rain = RainField::new(&mut rng);

    c.bench_function("rain_advance_30k", |b| {
        b.iter(|| {
            rain.advance();
            black_box(rain.particles().len());
        });
    });
}

fn bench_rain_instances(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let rain = RainField::new(&mut rng);
    let mut out: Vec<Mat4> = Vec::with_capacity(RAIN_PARTICLE_COUNT);
    let scale = Weather::Storm.rain_scale().unwrap_or(1.0);

    c.bench_function("rain_instance_matrices_30k", |b| {
        b.iter(|| {
            rain.write_instance_matrices(black_box(scale), &mut out);
            black_box(out.len());
        });
    });
}

fn bench_lightning_advance(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut trigger = LightningTrigger::new(&mut rng);

    c.bench_function("lightning_advance", |b| {
        b.iter(|| black_box(trigger.advance(&mut rng)));
    });
}

fn bench_storm_frame(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let mut state = SceneState::new(SceneConfig::default(), &ProgramSettings::default(), &mut rng);
    state.weather = Weather::Storm;
    let mut orchestrator = FrameOrchestrator::new(state, rng);
    let input = InputState::new();
    let mut recorder = FrameRecorder::new();
    let mut overlay = RemoteOverlay::new(Arc::new(Mutex::new(SharedDebugState::default())));
    let mut elapsed = 0.0;

    c.bench_function("storm_frame_recorded", |b| {
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            recorder.begin_frame();
            let outcome = orchestrator.frame(elapsed, &input, &mut recorder, &mut overlay);
            black_box((outcome, recorder.commands().len()));
        });
    });
}

criterion_group!(
    benches,
    bench_rain_advance,
    bench_rain_instances,
    bench_lightning_advance,
    bench_storm_frame,
);
criterion_main!(benches);
