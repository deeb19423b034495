use std::fmt;

/// Context passed to nodes while a block renders
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Handle to a node owned by an audio host.
///
/// Ids are never reused within one host, so a stale id held after
/// `remove_node` fails with `UnknownNode` instead of aliasing a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Destination for driving one of this node's parameters.
    pub fn param(self, param: ParamName) -> Destination {
        Destination::Param(self, param)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Gain,
    Delay,
    Oscillator,
    Biquad,
    /// Live input feeding the graph (microphone)
    Source,
    /// Final mix that leaves the graph (speaker)
    Destination,
}

impl NodeKind {
    /// Whether the node accepts signal connections.
    pub fn has_inputs(self) -> bool {
        !matches!(self, NodeKind::Oscillator | NodeKind::Source)
    }

    /// Parameters exposed by nodes of this kind, in slot order.
    pub fn params(self) -> &'static [ParamName] {
        match self {
            NodeKind::Gain => &[ParamName::Gain],
            NodeKind::Delay => &[ParamName::DelayTime],
            NodeKind::Oscillator => &[ParamName::Frequency],
            NodeKind::Biquad => &[ParamName::Frequency, ParamName::Q, ParamName::Gain],
            NodeKind::Source | NodeKind::Destination => &[],
        }
    }

    pub(crate) fn param_slot(self, param: ParamName) -> Option<usize> {
        self.params().iter().position(|&p| p == param)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Gain => "gain",
            NodeKind::Delay => "delay",
            NodeKind::Oscillator => "oscillator",
            NodeKind::Biquad => "biquad",
            NodeKind::Source => "source",
            NodeKind::Destination => "destination",
        };
        f.write_str(name)
    }
}

/// Automatable parameters a node can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    /// Linear gain on gain nodes, boost/cut in dB on biquads
    Gain,
    /// Seconds
    DelayTime,
    /// Hz
    Frequency,
    Q,
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamName::Gain => "gain",
            ParamName::DelayTime => "delay_time",
            ParamName::Frequency => "frequency",
            ParamName::Q => "q",
        };
        f.write_str(name)
    }
}

/// Where a connection lands: a node's signal input or one of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Node(NodeId),
    Param(NodeId, ParamName),
}

impl Destination {
    pub fn node(self) -> NodeId {
        match self {
            Destination::Node(id) | Destination::Param(id, _) => id,
        }
    }
}

impl From<NodeId> for Destination {
    fn from(id: NodeId) -> Self {
        Destination::Node(id)
    }
}

/// One edge of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: NodeId,
    pub to: Destination,
}

impl Connection {
    /// True when the edge starts or ends at `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to.node() == node
    }
}

/// Lifecycle of a scheduled source node (oscillator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotStarted,
    Running,
    Stopped,
}
