//! Effects assembled from host graph nodes.

/// Delay line + oscillator-driven gain ("pitch offset" warble).
pub mod modulation;

pub use modulation::{EffectState, ModulationConfig, ModulationEffect};
