use voicepath::session::{Band, LiveSession, SessionConfig};

const SR: f32 = 48_000.0;

fn voice(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (std::f32::consts::TAU * 220.0 * i as f32 / SR).sin())
        .collect()
}

fn impulse(len: usize) -> Vec<f32> {
    let mut buffer = vec![0.0; len];
    buffer[0] = 1.0;
    buffer
}

#[test]
fn renders_voice_through_default_session() {
    let (mut session, _handle) = LiveSession::start(SessionConfig::default()).unwrap();
    let input = voice(4096);
    let mut output = vec![0.0; 4096];

    session.process_block(&input, &mut output);

    assert!(output.iter().any(|s| s.abs() > 0.0));
    assert!(output.iter().all(|s| s.is_finite() && s.abs() <= 1.01));
}

#[test]
fn muted_session_is_silent_even_with_echo() {
    let (mut session, mut handle) = LiveSession::start(SessionConfig::default()).unwrap();
    handle.set_echo(true);
    handle.toggle_mute();

    let mut output = vec![1.0; 16_000];
    session.process_block(&voice(16_000), &mut output);

    assert!(output.iter().all(|&s| s == 0.0));
}

#[test]
fn echo_repeats_input_after_two_hundred_ms() {
    let len = 12_000;
    let echo_at = (0.2 * SR) as usize;

    let (mut dry, _) = LiveSession::start(SessionConfig::default()).unwrap();
    let mut dry_out = vec![0.0; len];
    dry.process_block(&impulse(len), &mut dry_out);

    let (mut wet, _) = LiveSession::start(SessionConfig::default()).unwrap();
    wet.set_echo(true).unwrap();
    let mut wet_out = vec![0.0; len];
    wet.process_block(&impulse(len), &mut wet_out);

    assert!(dry_out[echo_at].abs() < 1e-3);
    assert!((wet_out[echo_at] - 0.5).abs() < 1e-3, "echo sample {}", wet_out[echo_at]);
}

#[test]
fn tone_controls_change_output() {
    let input = voice(8192);

    let (mut flat, _) = LiveSession::start(SessionConfig::default()).unwrap();
    let mut flat_out = vec![0.0; 8192];
    flat.process_block(&input, &mut flat_out);

    let (mut boosted, mut handle) = LiveSession::start(SessionConfig::default()).unwrap();
    handle.set_band(Band::Bass, 3.0);
    let mut boosted_out = vec![0.0; 8192];
    boosted.process_block(&input, &mut boosted_out);

    let energy = |b: &[f32]| b.iter().map(|s| s * s).sum::<f32>();
    assert!(energy(&boosted_out) > energy(&flat_out) * 1.1);
}

#[test]
fn closed_session_ignores_further_control() {
    let (mut session, mut handle) = LiveSession::start(SessionConfig::default()).unwrap();
    session.close();
    handle.set_pitch_offset(0.4);

    let mut output = vec![1.0; 512];
    session.process_block(&voice(512), &mut output);

    assert!(session.is_closed());
    assert_eq!(session.pitch_offset(), None);
    assert!(output.iter().all(|&s| s == 0.0));
}
