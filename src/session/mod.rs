//! One live microphone session: the whole voice path and its controls.
//!
//! A [`LiveSession`] owns the graph host, every node it creates, and the
//! control flags (volume, mute, echo, tone). Nothing is global: drop or close
//! the session and the whole path goes with it. Other threads steer it
//! through a [`SessionHandle`].

pub mod config;
pub mod message;

use log::{debug, info, warn};
use rtrb::Consumer;

use crate::{
    dsp::BiquadType,
    effect::ModulationEffect,
    error::HostError,
    graph::{AudioContext, AudioHost, NodeId, ParamName},
};

pub use config::{Band, SessionConfig};
pub use message::{SessionHandle, SessionMessage};

/*
Session Graph
=============

  source ─► volume ─► [modulation effect] ─► bass ─► mid ─► treble ─► destination
               │                                                        ▲
               └───► echo delay ─► echo gain ──────────────────────────┘
                     (edges present only while echo is enabled)

Volume and mute share the volume gain node: its value is 0 while muted and
the stored volume otherwise, so moving the volume while muted does not
unmute. Band controls map linearly to shelf/peak gain in dB.
*/

pub struct LiveSession {
    ctx: AudioContext,
    config: SessionConfig,
    volume_gain: NodeId,
    effect: ModulationEffect,
    bands: [NodeId; 3],
    echo_delay: NodeId,
    echo_gain: NodeId,
    volume: f32,
    muted: bool,
    echo_enabled: bool,
    pitch_offset: Option<f32>,
    band_values: [f32; 3],
    rx: Consumer<SessionMessage>,
}

impl LiveSession {
    /// Build the session graph on a fresh software host.
    pub fn start(config: SessionConfig) -> Result<(Self, SessionHandle), HostError> {
        Self::with_context(AudioContext::new(config.sample_rate), config)
    }

    /// Build the session graph on a caller-provided host.
    pub fn with_context(
        mut ctx: AudioContext,
        config: SessionConfig,
    ) -> Result<(Self, SessionHandle), HostError> {
        let volume_gain = ctx.create_gain()?;
        ctx.set_param(volume_gain, ParamName::Gain, config.volume)?;

        let effect = ModulationEffect::new(&mut ctx, config.modulation)?;

        let bass = ctx.create_biquad(BiquadType::LowShelf)?;
        ctx.set_param(bass, ParamName::Frequency, config.bass_hz)?;
        let mid = ctx.create_biquad(BiquadType::Peaking)?;
        ctx.set_param(mid, ParamName::Frequency, config.mid_hz)?;
        ctx.set_param(mid, ParamName::Q, config.mid_q)?;
        let treble = ctx.create_biquad(BiquadType::HighShelf)?;
        ctx.set_param(treble, ParamName::Frequency, config.treble_hz)?;

        let echo_delay = ctx.create_delay(config.echo_delay_seconds.max(0.0))?;
        ctx.set_param(echo_delay, ParamName::DelayTime, config.echo_delay_seconds)?;
        let echo_gain = ctx.create_gain()?;
        ctx.set_param(echo_gain, ParamName::Gain, config.echo_gain)?;

        let source = ctx.source();
        let destination = ctx.destination();
        ctx.connect(source, volume_gain.into())?;
        ctx.connect(volume_gain, effect.input().into())?;
        ctx.connect(effect.output(), bass.into())?;
        ctx.connect(bass, mid.into())?;
        ctx.connect(mid, treble.into())?;
        ctx.connect(treble, destination.into())?;
        ctx.connect(echo_delay, echo_gain.into())?;

        let (handle, rx) = message::channel();

        info!(
            "live session started at {} Hz (volume {:.2})",
            config.sample_rate, config.volume
        );

        let session = Self {
            ctx,
            config,
            volume_gain,
            effect,
            bands: [bass, mid, treble],
            echo_delay,
            echo_gain,
            volume: config.volume,
            muted: false,
            echo_enabled: false,
            pitch_offset: None,
            band_values: [0.0; 3],
            rx,
        };
        Ok((session, handle))
    }

    pub fn context(&self) -> &AudioContext {
        &self.ctx
    }

    pub fn effect(&self) -> &ModulationEffect {
        &self.effect
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn echo_enabled(&self) -> bool {
        self.echo_enabled
    }

    /// Last offset passed to `set_pitch_offset`, if any.
    pub fn pitch_offset(&self) -> Option<f32> {
        self.pitch_offset
    }

    pub fn band(&self, band: Band) -> f32 {
        self.band_values[band.index()]
    }

    pub fn band_node(&self, band: Band) -> NodeId {
        self.bands[band.index()]
    }

    pub fn volume_node(&self) -> NodeId {
        self.volume_gain
    }

    pub fn echo_nodes(&self) -> (NodeId, NodeId) {
        (self.echo_delay, self.echo_gain)
    }

    pub fn is_closed(&self) -> bool {
        self.ctx.is_closed()
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), HostError> {
        self.volume = volume;
        self.apply_volume()
    }

    pub fn set_muted(&mut self, muted: bool) -> Result<(), HostError> {
        self.muted = muted;
        self.apply_volume()
    }

    pub fn toggle_mute(&mut self) -> Result<(), HostError> {
        self.set_muted(!self.muted)
    }

    fn apply_volume(&mut self) -> Result<(), HostError> {
        let gain = if self.muted { 0.0 } else { self.volume };
        self.ctx.set_param(self.volume_gain, ParamName::Gain, gain)
    }

    pub fn set_echo(&mut self, enabled: bool) -> Result<(), HostError> {
        if enabled == self.echo_enabled {
            return Ok(());
        }
        let destination = self.ctx.destination();
        if enabled {
            self.ctx.connect(self.volume_gain, self.echo_delay.into())?;
            self.ctx.connect(self.echo_gain, destination.into())?;
        } else {
            self.ctx.disconnect(self.volume_gain, self.echo_delay.into())?;
            self.ctx.disconnect(self.echo_gain, destination.into())?;
        }
        self.echo_enabled = enabled;
        debug!("echo {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    pub fn toggle_echo(&mut self) -> Result<(), HostError> {
        self.set_echo(!self.echo_enabled)
    }

    pub fn set_pitch_offset(&mut self, offset: f32) -> Result<(), HostError> {
        self.effect.set_pitch_offset(&mut self.ctx, offset)?;
        self.pitch_offset = Some(offset);
        Ok(())
    }

    /// Set a tone band; filter gain becomes `value × band_gain_scale` dB.
    pub fn set_band(&mut self, band: Band, value: f32) -> Result<(), HostError> {
        let gain_db = value * self.config.band_gain_scale;
        self.ctx
            .set_param(self.bands[band.index()], ParamName::Gain, gain_db)?;
        self.band_values[band.index()] = value;
        Ok(())
    }

    pub fn apply(&mut self, msg: SessionMessage) -> Result<(), HostError> {
        match msg {
            SessionMessage::SetVolume(v) => self.set_volume(v),
            SessionMessage::SetMuted(m) => self.set_muted(m),
            SessionMessage::ToggleMute => self.toggle_mute(),
            SessionMessage::SetEcho(e) => self.set_echo(e),
            SessionMessage::ToggleEcho => self.toggle_echo(),
            SessionMessage::SetPitchOffset(o) => self.set_pitch_offset(o),
            SessionMessage::SetBand(band, v) => self.set_band(band, v),
            SessionMessage::Close => {
                self.close();
                Ok(())
            }
        }
    }

    /// Apply queued control messages, then render one buffer.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        while let Ok(msg) = self.rx.pop() {
            if self.ctx.is_closed() {
                continue;
            }
            if let Err(err) = self.apply(msg) {
                warn!("session control {:?} failed: {}", msg, err);
            }
        }
        self.ctx.render(input, output);
    }

    /// Dispose the effect and close the host. Later blocks render silence.
    pub fn close(&mut self) {
        if self.ctx.is_closed() {
            return;
        }
        if let Err(err) = self.effect.dispose(&mut self.ctx) {
            warn!("disposing modulation effect failed: {}", err);
        }
        self.ctx.close();
        debug!("live session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Destination;

    fn session() -> (LiveSession, SessionHandle) {
        LiveSession::start(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_mute_keeps_volume() {
        let (mut session, _handle) = session();
        session.set_volume(0.6).unwrap();
        session.toggle_mute().unwrap();

        let node = session.volume_node();
        assert_eq!(session.context().param(node, ParamName::Gain), Ok(0.0));

        session.set_volume(0.3).unwrap();
        assert!(session.is_muted());
        assert_eq!(session.context().param(node, ParamName::Gain), Ok(0.0));

        session.toggle_mute().unwrap();
        assert_eq!(session.context().param(node, ParamName::Gain), Ok(0.3));
    }

    #[test]
    fn test_echo_toggles_edges() {
        let (mut session, _handle) = session();
        let (delay, gain) = session.echo_nodes();
        let volume = session.volume_node();
        let dest = Destination::Node(session.context().destination());

        assert!(!session.context().is_connected(volume, delay.into()));

        session.set_echo(true).unwrap();
        assert!(session.context().is_connected(volume, delay.into()));
        assert!(session.context().is_connected(gain, dest));

        // Enabling twice must not fail or duplicate edges
        let edges = session.context().connections().len();
        session.set_echo(true).unwrap();
        assert_eq!(session.context().connections().len(), edges);

        session.toggle_echo().unwrap();
        assert!(!session.context().is_connected(volume, delay.into()));
        assert!(!session.context().is_connected(gain, dest));
    }

    #[test]
    fn test_band_maps_to_db() {
        let (mut session, _handle) = session();
        session.set_band(Band::Treble, 0.75).unwrap();

        let node = session.band_node(Band::Treble);
        assert_eq!(session.context().param(node, ParamName::Gain), Ok(1.5));
        assert_eq!(session.band(Band::Treble), 0.75);
    }

    #[test]
    fn test_handle_messages_apply_on_next_block() {
        let (mut session, mut handle) = session();
        handle.set_pitch_offset(0.25);
        handle.set_echo(true);

        assert_eq!(session.pitch_offset(), None);

        let mut out = vec![0.0; 128];
        session.process_block(&[0.0; 128], &mut out);

        assert_eq!(session.pitch_offset(), Some(0.25));
        assert!(session.echo_enabled());
        let gain = session.effect().modulation_gain();
        assert_eq!(session.context().param(gain, ParamName::Gain), Ok(1.0));
    }

    #[test]
    fn test_close_message_silences_output() {
        let (mut session, mut handle) = session();
        handle.close();
        handle.set_volume(0.5);

        let mut out = vec![1.0; 256];
        session.process_block(&[0.5; 256], &mut out);

        assert!(session.is_closed());
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(session.context().active_oscillators(), 0);
    }
}
