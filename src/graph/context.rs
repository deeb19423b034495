use log::debug;

use crate::{
    dsp::{BiquadType, Waveform},
    error::HostError,
    graph::{
        host::{AudioHost, HostCapabilities},
        node::{Connection, Destination, NodeId, NodeKind, ParamName, PlaybackState, RenderCtx},
        processor::{NodeSlot, MAX_PARAMS},
    },
    MAX_BLOCK_SIZE,
};

/*
Software Audio Context
======================

A single-threaded realtime graph. It owns every node, the edge list, and a
cached processing order:

  mutation (create / connect / remove)  →  rebuild topological order
  render(input, output)                 →  walk the order, block by block

Each node renders one block into its own output buffer. Before a node runs,
the context sums every edge landing on its signal input into a scratch
buffer, and fills one scratch buffer per parameter with

    intrinsic value + Σ connected signals

The live input enters through the built-in `source()` node; whatever reaches
the built-in `destination()` node is the rendered output.

Cycles are rejected at connect time, so a plain topological order is always
enough. Rendering never allocates: all buffers are sized to MAX_BLOCK_SIZE
when the node or the context is created, and longer host buffers are split
into MAX_BLOCK_SIZE chunks.

Rewiring can happen on the audio thread too (a session toggling echo from
its control queue). The cycle search and the order rebuild therefore work in
scratch vectors owned by the context, sized when nodes are created, and the
edge list starts with room for EDGE_CAPACITY connections. Only creating
nodes, or growing past that many edges, allocates.
*/

/// Longest delay a delay node may be created with.
const MAX_DELAY_SECONDS: f32 = 180.0;

/// Edges the context can hold before the edge list has to grow.
const EDGE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Closed,
}

pub struct AudioContext {
    sample_rate: f32,
    capabilities: HostCapabilities,
    state: ContextState,
    nodes: Vec<Option<NodeSlot>>,
    connections: Vec<Connection>,
    order: Vec<NodeId>,
    source: NodeId,
    destination: NodeId,
    input_mix: Vec<f32>,
    param_mix: Vec<Vec<f32>>,
    frames_rendered: u64,
    // Scratch for `reaches` and `rebuild_order`
    indegree: Vec<usize>,
    ready: Vec<NodeId>,
    seen: Vec<bool>,
    stack: Vec<NodeId>,
}

impl AudioContext {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_capabilities(sample_rate, HostCapabilities::default())
    }

    /// Context that refuses to create the node kinds `capabilities` leaves out.
    pub fn with_capabilities(sample_rate: f32, capabilities: HostCapabilities) -> Self {
        let mut ctx = Self {
            sample_rate,
            capabilities,
            state: ContextState::Running,
            nodes: Vec::new(),
            connections: Vec::with_capacity(EDGE_CAPACITY),
            order: Vec::new(),
            source: NodeId(0),
            destination: NodeId(0),
            input_mix: vec![0.0; MAX_BLOCK_SIZE],
            param_mix: vec![vec![0.0; MAX_BLOCK_SIZE]; MAX_PARAMS],
            frames_rendered: 0,
            indegree: Vec::new(),
            ready: Vec::new(),
            seen: Vec::new(),
            stack: Vec::with_capacity(EDGE_CAPACITY + 1),
        };
        ctx.source = ctx.insert(NodeSlot::source());
        ctx.destination = ctx.insert(NodeSlot::destination());
        ctx
    }

    /// Built-in node carrying the live input into the graph.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Built-in node whose input becomes the rendered output.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Seconds of audio rendered so far.
    pub fn current_time(&self) -> f64 {
        self.frames_rendered as f64 / self.sample_rate as f64
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_connected(&self, from: NodeId, to: Destination) -> bool {
        self.connections.contains(&Connection { from, to })
    }

    /// Number of live nodes, built-in source and destination included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn node_kind(&self, node: NodeId) -> Result<NodeKind, HostError> {
        Ok(self.slot(node)?.kind)
    }

    pub fn playback_state(&self, node: NodeId) -> Result<Option<PlaybackState>, HostError> {
        Ok(self.slot(node)?.playback_state())
    }

    /// Oscillators currently started and not yet stopped.
    pub fn active_oscillators(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.playback_state() == Some(PlaybackState::Running))
            .count()
    }

    /// Stop every oscillator, drop every edge, and refuse further mutation.
    pub fn close(&mut self) {
        if self.state == ContextState::Closed {
            return;
        }
        for node in self.nodes.iter_mut().flatten() {
            if node.playback_state() == Some(PlaybackState::Running) {
                node.set_playback_state(PlaybackState::Stopped);
            }
        }
        self.connections.clear();
        self.order.clear();
        self.state = ContextState::Closed;
        debug!("audio context closed after {:.3}s", self.current_time());
    }

    /// Render `output.len()` samples, feeding `input` through the source node.
    ///
    /// A short `input` is zero padded. A closed context renders silence.
    pub fn render(&mut self, input: &[f32], output: &mut [f32]) {
        if self.state == ContextState::Closed {
            output.fill(0.0);
            return;
        }

        let mut offset = 0;
        while offset < output.len() {
            let len = (output.len() - offset).min(MAX_BLOCK_SIZE);
            let live = input.get(offset..).unwrap_or(&[]);
            let live = &live[..live.len().min(len)];
            self.render_block(live, &mut output[offset..offset + len]);
            offset += len;
        }
    }

    fn render_block(&mut self, live: &[f32], out: &mut [f32]) {
        let len = out.len();
        let ctx = RenderCtx::new(self.sample_rate);

        for step in 0..self.order.len() {
            let id = self.order[step];
            let (kind, intrinsic) = match &self.nodes[id.index()] {
                Some(node) => (node.kind, node.params),
                None => continue,
            };

            // Signal input: sum of everything connected to the node
            let mix = &mut self.input_mix[..len];
            mix.fill(0.0);
            for conn in &self.connections {
                if conn.to != Destination::Node(id) {
                    continue;
                }
                if let Some(from) = &self.nodes[conn.from.index()] {
                    for (m, &s) in mix.iter_mut().zip(&from.output[..len]) {
                        *m += s;
                    }
                }
            }

            // Parameters: intrinsic value plus connected modulation
            for (slot, &param) in kind.params().iter().enumerate() {
                let buf = &mut self.param_mix[slot][..len];
                buf.fill(intrinsic[slot]);
                for conn in &self.connections {
                    if conn.to != Destination::Param(id, param) {
                        continue;
                    }
                    if let Some(from) = &self.nodes[conn.from.index()] {
                        for (p, &s) in buf.iter_mut().zip(&from.output[..len]) {
                            *p += s;
                        }
                    }
                }
            }

            if let Some(node) = self.nodes[id.index()].as_mut() {
                node.process(&self.input_mix[..len], &self.param_mix, live, len, &ctx);
            }
        }

        match &self.nodes[self.destination.index()] {
            Some(dest) => out.copy_from_slice(&dest.output[..len]),
            None => out.fill(0.0),
        }
        self.frames_rendered += len as u64;
    }

    fn insert(&mut self, node: NodeSlot) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        debug!("create {} node {}", node.kind, id);
        self.nodes.push(Some(node));

        let count = self.nodes.len();
        self.order.reserve(count.saturating_sub(self.order.len()));
        self.ready.reserve(count.saturating_sub(self.ready.len()));
        self.indegree.resize(count, 0);
        self.seen.resize(count, false);

        self.rebuild_order();
        id
    }

    fn create(&mut self, kind: NodeKind, build: impl FnOnce() -> NodeSlot) -> Result<NodeId, HostError> {
        self.ensure_running()?;
        if !self.capabilities.supports(kind) {
            return Err(HostError::Capability(kind));
        }
        Ok(self.insert(build()))
    }

    fn ensure_running(&self) -> Result<(), HostError> {
        match self.state {
            ContextState::Running => Ok(()),
            ContextState::Closed => Err(HostError::Closed),
        }
    }

    fn slot(&self, node: NodeId) -> Result<&NodeSlot, HostError> {
        self.nodes
            .get(node.index())
            .and_then(Option::as_ref)
            .ok_or(HostError::UnknownNode(node))
    }

    fn slot_mut(&mut self, node: NodeId) -> Result<&mut NodeSlot, HostError> {
        self.nodes
            .get_mut(node.index())
            .and_then(Option::as_mut)
            .ok_or(HostError::UnknownNode(node))
    }

    fn param_slot(&self, node: NodeId, param: ParamName) -> Result<usize, HostError> {
        let kind = self.slot(node)?.kind;
        kind.param_slot(param)
            .ok_or(HostError::UnknownParam { node, kind, param })
    }

    /// True if `to` can already reach `from` through existing edges.
    fn reaches(&mut self, to: NodeId, from: NodeId) -> bool {
        // Each edge is pushed at most once, when its source is first seen
        self.stack.clear();
        self.stack.reserve(self.connections.len() + 1);
        self.seen.fill(false);

        self.stack.push(to);
        while let Some(current) = self.stack.pop() {
            if current == from {
                return true;
            }
            if std::mem::replace(&mut self.seen[current.index()], true) {
                continue;
            }
            for conn in self.connections.iter().filter(|c| c.from == current) {
                self.stack.push(conn.to.node());
            }
        }
        false
    }

    /// Kahn's algorithm over live nodes; param edges count as dependencies.
    fn rebuild_order(&mut self) {
        self.indegree.fill(0);
        for conn in &self.connections {
            self.indegree[conn.to.node().index()] += 1;
        }

        self.order.clear();
        self.ready.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_some() && self.indegree[i] == 0 {
                self.ready.push(NodeId(i as u32));
            }
        }

        while let Some(id) = self.ready.pop() {
            self.order.push(id);
            for conn in self.connections.iter().filter(|c| c.from == id) {
                let target = conn.to.node().index();
                self.indegree[target] -= 1;
                if self.indegree[target] == 0 {
                    self.ready.push(NodeId(target as u32));
                }
            }
        }
    }
}

impl AudioHost for AudioContext {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_closed(&self) -> bool {
        self.state == ContextState::Closed
    }

    fn create_gain(&mut self) -> Result<NodeId, HostError> {
        self.create(NodeKind::Gain, NodeSlot::gain)
    }

    fn create_delay(&mut self, max_delay_seconds: f32) -> Result<NodeId, HostError> {
        let max_seconds = max_delay_seconds.clamp(0.0, MAX_DELAY_SECONDS);
        let max_samples = (max_seconds * self.sample_rate).ceil() as usize;
        self.create(NodeKind::Delay, || NodeSlot::delay(max_samples))
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> Result<NodeId, HostError> {
        self.create(NodeKind::Oscillator, || NodeSlot::oscillator(waveform))
    }

    fn create_biquad(&mut self, filter_type: BiquadType) -> Result<NodeId, HostError> {
        self.create(NodeKind::Biquad, || NodeSlot::biquad(filter_type))
    }

    fn set_param(&mut self, node: NodeId, param: ParamName, value: f32) -> Result<(), HostError> {
        self.ensure_running()?;
        let slot = self.param_slot(node, param)?;
        self.slot_mut(node)?.params[slot] = value;
        Ok(())
    }

    fn param(&self, node: NodeId, param: ParamName) -> Result<f32, HostError> {
        let slot = self.param_slot(node, param)?;
        Ok(self.slot(node)?.params[slot])
    }

    fn connect(&mut self, from: NodeId, to: Destination) -> Result<(), HostError> {
        self.ensure_running()?;
        self.slot(from)?;
        let target = to.node();
        match to {
            Destination::Node(_) => {
                let kind = self.slot(target)?.kind;
                if !kind.has_inputs() {
                    return Err(HostError::NoInputs { node: target, kind });
                }
            }
            Destination::Param(_, param) => {
                self.param_slot(target, param)?;
            }
        }

        let conn = Connection { from, to };
        if self.connections.contains(&conn) {
            return Ok(());
        }
        if self.reaches(target, from) {
            return Err(HostError::Cycle { from, to: target });
        }

        debug!("connect {} -> {:?}", from, to);
        self.connections.push(conn);
        self.rebuild_order();
        Ok(())
    }

    fn disconnect(&mut self, from: NodeId, to: Destination) -> Result<(), HostError> {
        self.ensure_running()?;
        self.slot(from)?;
        let before = self.connections.len();
        self.connections.retain(|c| !(c.from == from && c.to == to));
        if self.connections.len() != before {
            debug!("disconnect {} -> {:?}", from, to);
            self.rebuild_order();
        }
        Ok(())
    }

    fn disconnect_all(&mut self, from: NodeId) -> Result<(), HostError> {
        self.ensure_running()?;
        self.slot(from)?;
        self.connections.retain(|c| c.from != from);
        self.rebuild_order();
        Ok(())
    }

    fn start(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_running()?;
        let slot = self.slot_mut(node)?;
        match slot.playback_state() {
            Some(PlaybackState::NotStarted) => {
                slot.set_playback_state(PlaybackState::Running);
                Ok(())
            }
            Some(_) => Err(HostError::InvalidState {
                node,
                reason: "source was already started",
            }),
            None => Err(HostError::InvalidState {
                node,
                reason: "node cannot be scheduled",
            }),
        }
    }

    fn stop(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_running()?;
        let slot = self.slot_mut(node)?;
        match slot.playback_state() {
            Some(PlaybackState::Running) | Some(PlaybackState::Stopped) => {
                slot.set_playback_state(PlaybackState::Stopped);
                Ok(())
            }
            Some(PlaybackState::NotStarted) => Err(HostError::InvalidState {
                node,
                reason: "source was never started",
            }),
            None => Err(HostError::InvalidState {
                node,
                reason: "node cannot be scheduled",
            }),
        }
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_running()?;
        if node == self.source || node == self.destination {
            return Err(HostError::InvalidState {
                node,
                reason: "built-in nodes cannot be removed",
            });
        }
        self.slot(node)?;
        self.connections.retain(|c| !c.touches(node));
        self.nodes[node.index()] = None;
        debug!("remove node {}", node);
        self.rebuild_order();
        Ok(())
    }
}
