use log::warn;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::session::config::Band;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SessionMessage {
    SetVolume(f32),
    SetMuted(bool),
    ToggleMute,
    SetEcho(bool),
    ToggleEcho,
    SetPitchOffset(f32),
    SetBand(Band, f32),
    Close,
}

pub(crate) const SESSION_QUEUE_SIZE: usize = 64;

pub(crate) fn channel() -> (SessionHandle, Consumer<SessionMessage>) {
    let (tx, rx) = RingBuffer::<SessionMessage>::new(SESSION_QUEUE_SIZE);
    (SessionHandle { tx }, rx)
}

/// Control side of a live session, usable from any one thread.
///
/// Messages are applied by the session at the start of its next block. When
/// the queue is full the message is dropped and `false` returned.
pub struct SessionHandle {
    tx: Producer<SessionMessage>,
}

impl SessionHandle {
    pub fn send(&mut self, msg: SessionMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(_) => {
                warn!("session control queue full, dropped {:?}", msg);
                false
            }
        }
    }

    pub fn set_volume(&mut self, volume: f32) -> bool {
        self.send(SessionMessage::SetVolume(volume))
    }

    pub fn set_muted(&mut self, muted: bool) -> bool {
        self.send(SessionMessage::SetMuted(muted))
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.send(SessionMessage::ToggleMute)
    }

    pub fn set_echo(&mut self, enabled: bool) -> bool {
        self.send(SessionMessage::SetEcho(enabled))
    }

    pub fn toggle_echo(&mut self) -> bool {
        self.send(SessionMessage::ToggleEcho)
    }

    pub fn set_pitch_offset(&mut self, offset: f32) -> bool {
        self.send(SessionMessage::SetPitchOffset(offset))
    }

    pub fn set_band(&mut self, band: Band, value: f32) -> bool {
        self.send(SessionMessage::SetBand(band, value))
    }

    pub fn close(&mut self) -> bool {
        self.send(SessionMessage::Close)
    }

    /// True once the session side has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}
