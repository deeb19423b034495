use crate::{
    dsp::{BiquadType, Waveform},
    error::HostError,
    graph::node::{Destination, NodeId, NodeKind, ParamName},
};

/*
Audio Host
==========

Effects in this crate never process samples themselves. They ask a host for
pre-built nodes, wire them together, and leave the per-sample work to the
host's render loop. `AudioHost` is that contract:

  create_*      allocate a node, or fail with `HostError::Capability`
  set_param     write a parameter's intrinsic value
  connect       signal edge (node → node) or modulation edge (node → param)
  start / stop  schedule source nodes (oscillators)
  remove_node   release a node and every edge touching it

Parameters follow the usual realtime-graph rule: the value a node sees for a
parameter on each sample is

    intrinsic value + Σ (signals connected to that parameter)

so connecting an oscillator to a gain parameter makes the gain swing around
whatever `set_param` last wrote.

`AudioContext` is the software host shipped with this crate; anything that
implements the trait (a hardware DSP, a test double) can host the same
effects.
*/

pub trait AudioHost {
    fn sample_rate(&self) -> f32;

    fn is_closed(&self) -> bool;

    /// Gain node with unity gain.
    fn create_gain(&mut self) -> Result<NodeId, HostError>;

    /// Delay node able to delay by up to `max_delay_seconds`, starting at 0.
    fn create_delay(&mut self, max_delay_seconds: f32) -> Result<NodeId, HostError>;

    /// Oscillator at 440 Hz. Silent until started.
    fn create_oscillator(&mut self, waveform: Waveform) -> Result<NodeId, HostError>;

    fn create_biquad(&mut self, filter_type: BiquadType) -> Result<NodeId, HostError>;

    fn set_param(&mut self, node: NodeId, param: ParamName, value: f32) -> Result<(), HostError>;

    /// Intrinsic value of a parameter (connected modulation not included).
    fn param(&self, node: NodeId, param: ParamName) -> Result<f32, HostError>;

    /// Connect `from`'s output to `to`. Connecting an existing edge again is a no-op.
    fn connect(&mut self, from: NodeId, to: Destination) -> Result<(), HostError>;

    /// Remove one edge. Removing an edge that does not exist is a no-op.
    fn disconnect(&mut self, from: NodeId, to: Destination) -> Result<(), HostError>;

    /// Remove every outgoing edge of `from`.
    fn disconnect_all(&mut self, from: NodeId) -> Result<(), HostError>;

    fn start(&mut self, node: NodeId) -> Result<(), HostError>;

    fn stop(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Free `node` and drop every edge into or out of it.
    fn remove_node(&mut self, node: NodeId) -> Result<(), HostError>;
}

/// Node types a host is able to create.
///
/// Every flag defaults to `true`; clearing one models a platform that lacks
/// the node type, so callers can exercise their degraded paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub gain: bool,
    pub delay: bool,
    pub oscillator: bool,
    pub biquad: bool,
}

impl HostCapabilities {
    pub fn supports(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Gain => self.gain,
            NodeKind::Delay => self.delay,
            NodeKind::Oscillator => self.oscillator,
            NodeKind::Biquad => self.biquad,
            NodeKind::Source | NodeKind::Destination => true,
        }
    }

    pub fn without(mut self, kind: NodeKind) -> Self {
        match kind {
            NodeKind::Gain => self.gain = false,
            NodeKind::Delay => self.delay = false,
            NodeKind::Oscillator => self.oscillator = false,
            NodeKind::Biquad => self.biquad = false,
            NodeKind::Source | NodeKind::Destination => {}
        }
        self
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            gain: true,
            delay: true,
            oscillator: true,
            biquad: true,
        }
    }
}
