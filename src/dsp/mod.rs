//! Low-level DSP primitives used by the graph host's nodes.
//!
//! These components are allocation-free once constructed, so the host can
//! embed them directly in its node table and run them on the audio thread.
//! They stay focused on the signal-processing math; wiring, parameters and
//! scheduling live in [`crate::graph`].

/// RBJ cookbook biquad filters (shelves, peaking, low/high-pass).
pub mod biquad;
/// Circular delay line with fractional reads.
pub mod delay;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;

pub use biquad::BiquadType;
pub use oscillator::Waveform;
