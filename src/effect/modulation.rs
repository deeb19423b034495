use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    error::HostError,
    graph::{AudioHost, NodeId, ParamName},
};

/*
Pitch Modulation Effect
=======================

A fixed four-node topology that gives a voice a warbling, "chipmunk-ish"
colour. Despite the control being called *pitch offset*, nothing here
resamples or phase-vocodes: the effect is amplitude modulation of a slightly
delayed copy of the input.

Signal Flow
-----------

    input ──► delay ──► modulation gain ──► output
                              ▲
                              │ (gain parameter, not signal input)
                        sine oscillator

  input / output      unity-gain junctions for splicing into a larger chain
  delay               fixed `base_delay_seconds` (5-50 ms typical)
  modulation gain     gain = offset × offset_scale + sin(2π·rate·t)
  oscillator          sine at `oscillator_frequency_hz`, started on build

Because the oscillator drives the gain *parameter*, its output is added to
the intrinsic gain value every sample. `set_pitch_offset` only moves that
intrinsic value; the oscillator keeps swinging around it.

What It Sounds Like
-------------------

Feed a 1 kHz tone in with rate = 30 Hz:

    out(t) = in(t - d) × (g + sin(2π·30·t))

which is a carrier at 1 kHz with sidebands at 970 Hz and 1030 Hz. Larger
offsets raise the carrier relative to the sidebands (shallower modulation);
an offset of 0 leaves pure ring modulation.

Lifecycle
---------

  Running   nodes created, wired, oscillator started
  Stopped   `dispose()` called, or the host was closed underneath us

`dispose()` stops the oscillator and releases every node so a long-lived
host does not keep an orphaned oscillator spinning.

Example:

  let mut ctx = AudioContext::new(48_000.0);
  let effect = ModulationEffect::new(&mut ctx, ModulationConfig::default())?;
  ctx.connect(ctx.source(), effect.input().into())?;
  ctx.connect(effect.output(), ctx.destination().into())?;
  effect.set_pitch_offset(&mut ctx, 0.25)?;   // modulation gain = 1.0
*/

/// Construction constants for [`ModulationEffect`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationConfig {
    /// Nominal delay applied to the input, in seconds.
    pub base_delay_seconds: f32,
    /// Rate of the oscillator driving the modulation gain, in Hz.
    pub oscillator_frequency_hz: f32,
    /// Multiplier from pitch offset to modulation gain value.
    pub offset_scale: f32,
}

impl ModulationConfig {
    pub fn with_base_delay(mut self, seconds: f32) -> Self {
        self.base_delay_seconds = seconds;
        self
    }

    pub fn with_oscillator_frequency(mut self, hz: f32) -> Self {
        self.oscillator_frequency_hz = hz;
        self
    }

    pub fn with_offset_scale(mut self, scale: f32) -> Self {
        self.offset_scale = scale;
        self
    }
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            base_delay_seconds: 0.01,
            oscillator_frequency_hz: 30.0,
            offset_scale: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    Running,
    Stopped,
}

/// Delay → oscillator-driven gain, exposed as an input/output pair.
#[derive(Debug)]
pub struct ModulationEffect {
    config: ModulationConfig,
    input: NodeId,
    output: NodeId,
    delay: NodeId,
    modulation_gain: NodeId,
    oscillator: NodeId,
    disposed: bool,
}

impl ModulationEffect {
    /// Build and start the effect on `host`.
    ///
    /// Any host error (most commonly a missing node type) is returned as-is.
    /// Nodes created before the failure stay with the host; a caller that
    /// degrades to a plain pass-through is expected to discard the host or
    /// close it.
    pub fn new<H: AudioHost>(host: &mut H, config: ModulationConfig) -> Result<Self, HostError> {
        let input = host.create_gain()?;
        let output = host.create_gain()?;

        let delay = host.create_delay(config.base_delay_seconds.max(0.0))?;
        host.set_param(delay, ParamName::DelayTime, config.base_delay_seconds)?;

        let modulation_gain = host.create_gain()?;
        let oscillator = host.create_oscillator(Waveform::Sine)?;
        host.set_param(oscillator, ParamName::Frequency, config.oscillator_frequency_hz)?;
        host.connect(oscillator, modulation_gain.param(ParamName::Gain))?;

        host.connect(input, delay.into())?;
        host.connect(delay, modulation_gain.into())?;
        host.connect(modulation_gain, output.into())?;

        host.start(oscillator)?;

        debug!(
            "modulation effect up: delay {:.4}s, rate {:.2} Hz, scale {}",
            config.base_delay_seconds, config.oscillator_frequency_hz, config.offset_scale
        );

        Ok(Self {
            config,
            input,
            output,
            delay,
            modulation_gain,
            oscillator,
            disposed: false,
        })
    }

    /// Junction to feed signal into.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Junction to take the processed signal from.
    pub fn output(&self) -> NodeId {
        self.output
    }

    pub fn modulation_gain(&self) -> NodeId {
        self.modulation_gain
    }

    pub fn oscillator(&self) -> NodeId {
        self.oscillator
    }

    pub fn delay(&self) -> NodeId {
        self.delay
    }

    pub fn config(&self) -> &ModulationConfig {
        &self.config
    }

    /// Set the modulation gain to `offset × offset_scale`.
    ///
    /// No clamping and no smoothing: the new value takes effect from the
    /// next rendered block.
    pub fn set_pitch_offset<H: AudioHost>(&self, host: &mut H, offset: f32) -> Result<(), HostError> {
        host.set_param(
            self.modulation_gain,
            ParamName::Gain,
            offset * self.config.offset_scale,
        )
    }

    pub fn state<H: AudioHost>(&self, host: &H) -> EffectState {
        if self.disposed || host.is_closed() {
            EffectState::Stopped
        } else {
            EffectState::Running
        }
    }

    /// Stop the oscillator, disconnect every owned node and release them.
    ///
    /// Nodes the host no longer knows about are skipped. If the host fails
    /// part way, the effect stays `Running` and a later call picks up where
    /// this one stopped. Once disposed, or on a host that is already closed,
    /// this does nothing.
    pub fn dispose<H: AudioHost>(&mut self, host: &mut H) -> Result<(), HostError> {
        if self.disposed {
            return Ok(());
        }
        if host.is_closed() {
            self.disposed = true;
            return Ok(());
        }

        already_gone(host.stop(self.oscillator))?;
        let owned = [
            self.oscillator,
            self.input,
            self.delay,
            self.modulation_gain,
            self.output,
        ];
        for node in owned {
            already_gone(host.disconnect_all(node))?;
        }
        for node in owned {
            already_gone(host.remove_node(node))?;
        }

        self.disposed = true;
        debug!("modulation effect disposed");
        Ok(())
    }
}

/// Treat a node that was already removed as released.
fn already_gone(result: Result<(), HostError>) -> Result<(), HostError> {
    match result {
        Err(HostError::UnknownNode(_)) => Ok(()),
        other => other,
    }
}
