#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{effect::ModulationConfig, DEFAULT_SAMPLE_RATE};

/// Tone-control band of the live session's equalizer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Low shelf
    Bass,
    /// Peaking
    Mid,
    /// High shelf
    Treble,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Bass, Band::Mid, Band::Treble];

    pub(crate) fn index(self) -> usize {
        match self {
            Band::Bass => 0,
            Band::Mid => 1,
            Band::Treble => 2,
        }
    }
}

/// Everything needed to build one live session's graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub sample_rate: f32,
    pub modulation: ModulationConfig,
    /// Initial linear volume.
    pub volume: f32,
    pub echo_delay_seconds: f32,
    pub echo_gain: f32,
    /// Low-shelf corner frequency in Hz.
    pub bass_hz: f32,
    /// Peaking center frequency in Hz.
    pub mid_hz: f32,
    pub mid_q: f32,
    /// High-shelf corner frequency in Hz.
    pub treble_hz: f32,
    /// dB of boost per unit of band control value.
    pub band_gain_scale: f32,
}

impl SessionConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_modulation(mut self, modulation: ModulationConfig) -> Self {
        self.modulation = modulation;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_echo(mut self, delay_seconds: f32, gain: f32) -> Self {
        self.echo_delay_seconds = delay_seconds;
        self.echo_gain = gain;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            modulation: ModulationConfig::default(),
            volume: 1.0,
            echo_delay_seconds: 0.2,
            echo_gain: 0.5,
            bass_hz: 200.0,
            mid_hz: 1000.0,
            mid_q: 1.0,
            treble_hz: 3000.0,
            band_gain_scale: 2.0,
        }
    }
}
