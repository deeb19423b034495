use thiserror::Error;

use crate::graph::node::{NodeId, NodeKind, ParamName};

/// Errors raised by an audio host while building or mutating a graph.
///
/// Effects built on a host never recover from these locally; they hand them
/// back to whoever owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host cannot create nodes of this kind.
    #[error("host cannot create {0} nodes")]
    Capability(NodeKind),

    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("{kind} node {node} has no `{param}` parameter")]
    UnknownParam {
        node: NodeId,
        kind: NodeKind,
        param: ParamName,
    },

    /// Source nodes (oscillators, live input) accept no signal input.
    #[error("{kind} node {node} has no signal input")]
    NoInputs { node: NodeId, kind: NodeKind },

    #[error("connecting {from} to {to} would create a cycle")]
    Cycle { from: NodeId, to: NodeId },

    /// Scheduling call that does not fit the node's lifecycle (double start,
    /// stop before start, start on a non-source node).
    #[error("invalid state for node {node}: {reason}")]
    InvalidState { node: NodeId, reason: &'static str },

    #[error("audio context is closed")]
    Closed,
}
