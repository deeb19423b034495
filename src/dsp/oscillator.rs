use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

The oscillator keeps a phase in [0, 1) and advances it by `frequency /
sample_rate` every sample. The waveform is a pure function of that phase:

    sine      sin(2π·phase)
    square    +1 for the first half cycle, -1 for the second
    sawtooth  rises linearly from -1 to +1, then snaps back
    triangle  -1 → +1 → -1, linear both ways

All shapes are bipolar (-1.0 to +1.0). Frequency can change every sample,
which is what lets another signal drive the oscillator's pitch.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[inline]
    fn shape(&self) -> f32 {
        let p = self.phase;
        match self.waveform {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.shape();
        self.phase += frequency / sample_rate;
        // rem_euclid handles negative and above-Nyquist frequencies
        self.phase = self.phase.rem_euclid(1.0);
        out
    }

    /// Fill `out` using a per-sample frequency buffer.
    pub fn render(&mut self, out: &mut [f32], frequencies: &[f32], sample_rate: f32) {
        for (sample, &freq) in out.iter_mut().zip(frequencies) {
            *sample = self.next_sample(freq, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
