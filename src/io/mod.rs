// Purpose - live device I/O around a session

pub mod stream;

pub use stream::{list_devices, AudioDevice, LiveStream, RunningStream, StreamConfig};

use crate::error::HostError;

/// Error types for live audio I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No input or output device available on the system.
    #[error("No {0} device available")]
    NoDevice(&'static str),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Stream setup or runtime error reported by the platform.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// Building the session graph failed.
    #[error("Audio graph error: {0}")]
    Host(#[from] HostError),
}

pub type Result<T> = std::result::Result<T, Error>;
