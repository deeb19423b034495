//! Graph-level scenario benchmarks.
//!
//! These render through the software host exactly as a live session does,
//! so they include edge summing and parameter modulation overhead.

mod effect;
mod session;

pub use effect::bench_effect;
pub use session::bench_session;
