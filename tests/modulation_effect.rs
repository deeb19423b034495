use rustfft::{num_complex::Complex, FftPlanner};
use voicepath::{
    effect::{EffectState, ModulationConfig, ModulationEffect},
    graph::{AudioContext, AudioHost, Destination, HostCapabilities, NodeKind, ParamName},
    HostError,
};

const SR: f32 = 48_000.0;

/// Effect spliced between the context's source and destination.
fn spliced(config: ModulationConfig) -> (AudioContext, ModulationEffect) {
    let mut ctx = AudioContext::new(SR);
    let effect = ModulationEffect::new(&mut ctx, config).unwrap();
    ctx.connect(ctx.source(), effect.input().into()).unwrap();
    ctx.connect(effect.output(), ctx.destination().into()).unwrap();
    (ctx, effect)
}

/// Magnitude spectrum of one second of audio (1 Hz per bin).
fn spectrum(samples: &[f32]) -> Vec<f32> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(samples.len());
    let mut buf: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buf);
    buf.iter().map(|c| c.norm()).collect()
}

fn tone(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (std::f32::consts::TAU * freq * i as f32 / SR).sin())
        .collect()
}

#[test]
fn construction_wires_each_edge_once() {
    let mut ctx = AudioContext::new(SR);
    let effect = ModulationEffect::new(&mut ctx, ModulationConfig::default()).unwrap();

    assert_eq!(ctx.connections().len(), 4);
    assert!(ctx.is_connected(effect.input(), effect.delay().into()));
    assert!(ctx.is_connected(effect.delay(), effect.modulation_gain().into()));
    assert!(ctx.is_connected(effect.modulation_gain(), effect.output().into()));
    assert!(ctx.is_connected(
        effect.oscillator(),
        effect.modulation_gain().param(ParamName::Gain)
    ));
    // Oscillator drives the gain parameter, not the signal input
    assert!(!ctx.is_connected(effect.oscillator(), effect.modulation_gain().into()));
    assert_eq!(ctx.active_oscillators(), 1);

    // Re-wiring an existing edge does not duplicate it
    ctx.connect(effect.input(), effect.delay().into()).unwrap();
    assert_eq!(ctx.connections().len(), 4);
}

#[test]
fn pitch_offset_sets_scaled_gain_exactly() {
    let (mut ctx, effect) = spliced(ModulationConfig::default());

    for offset in [0.0, 0.5, 1.0, -1.0, 10.0] {
        effect.set_pitch_offset(&mut ctx, offset).unwrap();
        let value = ctx.param(effect.modulation_gain(), ParamName::Gain).unwrap();
        assert_eq!(value, offset * 4.0, "offset {}", offset);
    }
}

#[test]
fn pitch_offset_accepts_any_finite_value() {
    let (mut ctx, effect) = spliced(ModulationConfig::default());

    for offset in [f32::MAX, f32::MIN, f32::MIN_POSITIVE, -0.0, 1e-30, 123.456] {
        assert!(effect.set_pitch_offset(&mut ctx, offset).is_ok());
    }
}

#[test]
fn dispose_stops_oscillator_and_clears_output() {
    let (mut ctx, mut effect) = spliced(ModulationConfig::default());
    let output = effect.output();

    effect.dispose(&mut ctx).unwrap();

    assert_eq!(ctx.active_oscillators(), 0);
    assert!(!ctx
        .connections()
        .iter()
        .any(|c| c.to == Destination::Node(output) || c.from == output));
    assert_eq!(effect.state(&ctx), EffectState::Stopped);

    // The rest of the context keeps rendering
    let mut out = vec![1.0; 512];
    ctx.render(&tone(440.0, 512), &mut out);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn dispose_right_after_construction() {
    let mut ctx = AudioContext::new(SR);
    let mut effect = ModulationEffect::new(&mut ctx, ModulationConfig::default()).unwrap();

    assert!(effect.dispose(&mut ctx).is_ok());
    assert_eq!(ctx.active_oscillators(), 0);
}

#[test]
fn quarter_offset_at_thirty_hz_produces_sidebands() {
    let config = ModulationConfig::default()
        .with_base_delay(0.01)
        .with_oscillator_frequency(30.0);
    let (mut ctx, effect) = spliced(config);
    effect.set_pitch_offset(&mut ctx, 0.25).unwrap();
    assert_eq!(
        ctx.param(effect.modulation_gain(), ParamName::Gain),
        Ok(1.0)
    );

    let len = SR as usize;
    let mut out = vec![0.0; len];
    ctx.render(&tone(1000.0, len), &mut out);

    // out = tone × (1 + sin 30 Hz): carrier plus sidebands at ±30 Hz, each half the carrier
    let mags = spectrum(&out);
    let carrier = mags[1000];
    let lower = mags[970];
    let upper = mags[1030];
    assert!(carrier > 1000.0, "carrier magnitude {}", carrier);
    for sideband in [lower, upper] {
        let ratio = sideband / carrier;
        assert!((0.4..0.6).contains(&ratio), "sideband ratio {}", ratio);
    }
    // Nothing of note between carrier and sidebands
    assert!(mags[985] < carrier * 0.05);
}

#[test]
fn larger_offset_reduces_modulation_depth() {
    let (mut ctx, effect) = spliced(ModulationConfig::default());
    // Gain value 2.0: sidebands at 1/(2·2) of the carrier
    effect.set_pitch_offset(&mut ctx, 0.5).unwrap();

    let len = SR as usize;
    let mut out = vec![0.0; len];
    ctx.render(&tone(1000.0, len), &mut out);

    let mags = spectrum(&out);
    let ratio = mags[1030] / mags[1000];
    assert!((0.2..0.3).contains(&ratio), "sideband ratio {}", ratio);
}

#[test]
fn output_is_delayed_by_base_delay() {
    let (mut ctx, effect) = spliced(ModulationConfig::default().with_base_delay(0.005));
    effect.set_pitch_offset(&mut ctx, 0.25).unwrap();

    let mut input = vec![0.0; 1024];
    input[0] = 1.0;
    let mut out = vec![0.0; 1024];
    ctx.render(&input, &mut out);

    // 5 ms at 48 kHz = 240 samples
    let first = out.iter().position(|s| s.abs() > 1e-3);
    assert_eq!(first, Some(240));
}

#[test]
fn missing_delay_node_propagates_capability_error() {
    let caps = HostCapabilities::default().without(NodeKind::Delay);
    let mut ctx = AudioContext::with_capabilities(SR, caps);

    let result = ModulationEffect::new(&mut ctx, ModulationConfig::default());

    assert_eq!(result.unwrap_err(), HostError::Capability(NodeKind::Delay));
}

#[test]
fn construction_on_closed_host_fails() {
    let mut ctx = AudioContext::new(SR);
    ctx.close();

    let result = ModulationEffect::new(&mut ctx, ModulationConfig::default());

    assert_eq!(result.unwrap_err(), HostError::Closed);
}

#[cfg(feature = "serde")]
#[test]
fn config_deserializes_with_defaults() {
    let config: ModulationConfig =
        serde_json::from_str(r#"{ "offset_scale": 10.0 }"#).unwrap();

    assert_eq!(config.offset_scale, 10.0);
    assert_eq!(config.base_delay_seconds, 0.01);
    assert_eq!(config.oscillator_frequency_hz, 30.0);
}
