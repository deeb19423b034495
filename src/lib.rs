pub mod dsp;
pub mod effect; // Pitch-modulation effect built on host graph nodes
pub mod error;
pub mod graph; // Realtime audio graph host
pub mod io;
pub mod session; // Live microphone session and its control queue

pub use error::HostError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
