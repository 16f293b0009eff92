use drumgrid::{
    backend::RecordingBackend,
    error::ImportError,
    sequencing::{ManualClock, Template},
    voices::SynthMode,
    DrumMachine, MachineConfig, Voice, STEPS,
};

fn machine(bpm: u32) -> DrumMachine<ManualClock> {
    let (backend, _) = RecordingBackend::new(8_000.0);
    DrumMachine::with_clock(
        MachineConfig::new().bpm(bpm),
        Box::new(backend),
        SynthMode::Full,
        ManualClock::new(),
    )
}

#[test]
fn export_then_import_round_trips() {
    let mut source = machine(133);
    source.load_template("shuffle");
    source.toggle_step(Voice::Kick, 15);
    let json = source.export_json().unwrap();

    let mut target = machine(60);
    target.import_pattern(&json).unwrap();
    assert_eq!(target.bpm(), 133);
    assert_eq!(target.pattern(), source.pattern());
    assert_eq!(target.export_pattern(), source.export_pattern());
}

#[test]
fn export_format() {
    let m = machine(90);
    let value: serde_json::Value = serde_json::from_str(&m.export_json().unwrap()).unwrap();
    assert_eq!(value["bpm"], 90);
    for voice in Voice::ALL {
        assert_eq!(value["patterns"][voice.as_str()].as_array().unwrap().len(), STEPS);
    }
}

#[test]
fn short_voice_array_rejects_import() {
    let mut m = machine(100);
    m.load_template("disco");
    let before = m.export_pattern();

    let raw = format!(r#"{{"bpm": 90, "patterns": {{"kick": {:?}}}}}"#, [false; 15]);
    let err = m.import_pattern(&raw).unwrap_err();
    assert!(matches!(err, ImportError::StepCount { voice: Voice::Kick, len: 15 }));
    assert_eq!(m.export_pattern(), before);
}

#[test]
fn sparse_import_fills_defaults() {
    let mut m = machine(100);
    m.import_pattern(r#"{"patterns": {"hihat": [true,false,true,false,true,false,true,false,true,false,true,false,true,false,true,false]}}"#)
        .unwrap();
    assert_eq!(m.bpm(), 60);
    assert_eq!(m.pattern().active_count(), 8);
    assert!(m.pattern().row(Voice::Kick).iter().all(|&on| !on));
}

#[test]
fn import_while_playing_restarts_at_new_tempo() {
    let mut m = machine(120);
    m.play();
    m.import_pattern(r#"{"bpm": 150}"#).unwrap();
    assert!(!m.is_playing());
    assert_eq!(m.bpm(), 150);
}

#[test]
fn clear_template_zeroes_everything() {
    let mut m = machine(120);
    m.load_template("funk");
    assert!(!m.pattern().is_empty());
    m.load_template("clear");
    assert!(m.pattern().is_empty());
    assert!(Template::by_id("funk").unwrap().pattern.active_count() > 0);
}
