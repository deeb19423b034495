//! Realtime audio graph host.
//!
//! Effects are built by asking an [`AudioHost`] for pre-built nodes (gain,
//! delay, oscillator, biquad) and wiring them together. [`AudioContext`] is
//! the software host: it owns the nodes, keeps them in topological order,
//! and renders blocks on whichever thread drives it.

/// Software host that owns and renders a node graph.
pub mod context;
/// The `AudioHost` contract and host capability flags.
pub mod host;
/// Node ids, kinds, parameters and connection types.
pub mod node;
/// Per-node processing state.
mod processor;

pub use context::{AudioContext, ContextState};
pub use host::{AudioHost, HostCapabilities};
pub use node::{Connection, Destination, NodeId, NodeKind, ParamName, PlaybackState, RenderCtx};
