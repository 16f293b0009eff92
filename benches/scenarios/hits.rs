//! Benchmarks for rendering whole hits, as the sequencer does on every step.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drumgrid::{
    backend::RecordingBackend,
    sequencing::{step_interval, ManualClock},
    voices::{presets, SynthMode, VoiceSettings, VoiceSynthesizer},
    DrumMachine, MachineConfig, Voice, STEPS,
};

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/hits");
    let synth = VoiceSynthesizer::new(SAMPLE_RATE, SynthMode::Full);

    for voice in Voice::ALL {
        let settings = VoiceSettings::default_for(voice);
        for preset in presets::presets(voice) {
            let id = BenchmarkId::new(voice.as_str(), preset.name);
            group.bench_function(id, |b| {
                b.iter(|| synth.render(voice, black_box(&settings), preset))
            });
        }
    }

    let fallback = VoiceSynthesizer::new(SAMPLE_RATE, SynthMode::Fallback);
    let settings = VoiceSettings::default_for(Voice::Kick);
    let preset = presets::default_preset(Voice::Kick);
    group.bench_function("fallback/kick", |b| {
        b.iter(|| fallback.render(Voice::Kick, black_box(&settings), preset))
    });

    group.finish();
}

/// One full bar of the busiest template: every tick rendered and queued.
pub fn bench_bar(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bar");

    group.bench_function("disco_120bpm", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let (backend, hits) = RecordingBackend::new(SAMPLE_RATE);
            let mut machine = DrumMachine::with_clock(
                MachineConfig::new().bpm(120),
                Box::new(backend),
                SynthMode::Full,
                clock.clone(),
            );
            machine.load_template("disco");
            machine.play();
            for _ in 1..STEPS {
                clock.advance(step_interval(120));
                machine.poll();
            }
            black_box(hits.len())
        })
    });

    group.finish();
}
