//! Microphone-to-speaker streaming via cpal.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, SupportedStreamConfig};
use log::{info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    io::{Error, Result},
    session::LiveSession,
    MAX_BLOCK_SIZE,
};

/*
Live Stream
===========

Two platform callbacks, one session:

  input callback   downmix each frame to mono → push into an SPSC ring
  output callback  pop a block from the ring (zeros on underrun)
                   → session.process_block → copy mono to every channel

The session is moved into the output callback and owned there; control
changes reach it through its own `SessionHandle`, never through a lock.

The ring holds `buffer_frames` samples. Anything the output side has not
consumed by then is dropped on the input side, which bounds the latency
between speaking and hearing yourself.
*/

/// Audio device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    pub name: String,
    pub is_input: bool,
    pub is_output: bool,
}

/// Stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Input device name or fragment (uses default if `None`).
    pub input_device: Option<String>,
    /// Output device name or fragment (uses default if `None`).
    pub output_device: Option<String>,
    /// Capacity of the input→output ring, in mono frames.
    pub buffer_frames: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            input_device: None,
            output_device: None,
            buffer_frames: 4096,
        }
    }
}

/// List every input and output device the default host reports.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices: Vec<AudioDevice> = Vec::new();

    let inputs = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    for device in inputs {
        if let Ok(name) = device.name() {
            devices.push(AudioDevice {
                name,
                is_input: true,
                is_output: false,
            });
        }
    }

    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    for device in outputs {
        if let Ok(name) = device.name() {
            match devices.iter_mut().find(|d| d.name == name) {
                Some(existing) => existing.is_output = true,
                None => devices.push(AudioDevice {
                    name,
                    is_input: false,
                    is_output: true,
                }),
            }
        }
    }

    Ok(devices)
}

/// Case-insensitive substring match against device names.
fn find_device(devices: impl Iterator<Item = Device>, wanted: &str) -> Option<Device> {
    let wanted = wanted.to_lowercase();
    devices.into_iter().find(|d| {
        d.name()
            .map(|name| name.to_lowercase().contains(&wanted))
            .unwrap_or(false)
    })
}

/// Opened input/output device pair, ready to run a session.
pub struct LiveStream {
    input: Device,
    output: Device,
    input_config: SupportedStreamConfig,
    output_config: SupportedStreamConfig,
    buffer_frames: usize,
}

impl LiveStream {
    pub fn open(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();

        let input = match &config.input_device {
            Some(name) => {
                let devices = host
                    .input_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;
                find_device(devices, name).ok_or_else(|| Error::DeviceNotFound(name.clone()))?
            }
            None => host.default_input_device().ok_or(Error::NoDevice("input"))?,
        };

        let output = match &config.output_device {
            Some(name) => {
                let devices = host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;
                find_device(devices, name).ok_or_else(|| Error::DeviceNotFound(name.clone()))?
            }
            None => host.default_output_device().ok_or(Error::NoDevice("output"))?,
        };

        let input_config = input
            .default_input_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let output_config = output
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        if input_config.sample_rate() != output_config.sample_rate() {
            warn!(
                "input runs at {} Hz but output at {} Hz; no resampling is done",
                input_config.sample_rate().0,
                output_config.sample_rate().0
            );
        }

        Ok(Self {
            input,
            output,
            input_config,
            output_config,
            buffer_frames: config.buffer_frames.max(MAX_BLOCK_SIZE),
        })
    }

    /// Output sample rate; build the session with this.
    pub fn sample_rate(&self) -> f32 {
        self.output_config.sample_rate().0 as f32
    }

    pub fn input_name(&self) -> String {
        self.input.name().unwrap_or_else(|_| "<unknown>".into())
    }

    pub fn output_name(&self) -> String {
        self.output.name().unwrap_or_else(|_| "<unknown>".into())
    }

    /// Start both streams with `session` rendering on the output callback.
    pub fn play(self, session: LiveSession) -> Result<RunningStream> {
        let in_channels = self.input_config.channels().max(1) as usize;
        let out_channels = self.output_config.channels().max(1) as usize;

        let (mut producer, consumer) = RingBuffer::<f32>::new(self.buffer_frames);
        let underruns = Arc::new(AtomicU64::new(0));

        let input_stream = self
            .input
            .build_input_stream(
                &self.input_config.clone().into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    push_input(&mut producer, data, in_channels);
                },
                |err| warn!("input stream error: {}", err),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        let output_underruns = Arc::clone(&underruns);
        let mut bridge = OutputBridge::new(consumer, session, out_channels);
        let output_stream = self
            .output
            .build_output_stream(
                &self.output_config.clone().into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let short = bridge.fill(data);
                    if short > 0 {
                        output_underruns.fetch_add(short as u64, Ordering::Relaxed);
                    }
                },
                |err| warn!("output stream error: {}", err),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        input_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;
        output_stream
            .play()
            .map_err(|e| Error::Stream(e.to_string()))?;

        info!(
            "streaming {} -> {} ({} in / {} out channels)",
            self.input_name(),
            self.output_name(),
            in_channels,
            out_channels
        );

        Ok(RunningStream {
            _input: input_stream,
            _output: output_stream,
            underruns,
        })
    }
}

/// Keeps both platform streams alive; dropping it stops audio.
pub struct RunningStream {
    _input: Stream,
    _output: Stream,
    underruns: Arc<AtomicU64>,
}

impl RunningStream {
    /// Output blocks that had to be padded because input ran dry.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

/// Downmix interleaved `data` to mono and queue it for the output side.
///
/// Returns how many frames were dropped because the ring was full.
pub(crate) fn push_input(producer: &mut Producer<f32>, data: &[f32], channels: usize) -> usize {
    let mut dropped = 0;
    for frame in data.chunks(channels.max(1)) {
        let mono = frame.iter().sum::<f32>() / frame.len() as f32;
        // Full ring: the output side is behind, drop the frame
        if producer.push(mono).is_err() {
            dropped += 1;
        }
    }
    dropped
}

/// Output-callback state: pulls mono input from the ring, renders it through
/// the session and fans the result out to every output channel.
pub(crate) struct OutputBridge {
    consumer: Consumer<f32>,
    session: LiveSession,
    channels: usize,
    in_block: Vec<f32>,
    out_block: Vec<f32>,
}

impl OutputBridge {
    pub(crate) fn new(consumer: Consumer<f32>, session: LiveSession, channels: usize) -> Self {
        Self {
            consumer,
            session,
            channels: channels.max(1),
            in_block: vec![0.0; MAX_BLOCK_SIZE],
            out_block: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Fill interleaved `data`. Returns the number of blocks that were zero
    /// padded because the input ring ran dry.
    pub(crate) fn fill(&mut self, data: &mut [f32]) -> usize {
        let channels = self.channels;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;
        let mut short_blocks = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            let mut short = false;
            for sample in self.in_block[..frames].iter_mut() {
                *sample = match self.consumer.pop() {
                    Ok(s) => s,
                    Err(_) => {
                        short = true;
                        0.0
                    }
                };
            }
            if short {
                short_blocks += 1;
            }

            self.session
                .process_block(&self.in_block[..frames], &mut self.out_block[..frames]);

            // Mono to all channels
            let offset = frames_written * channels;
            for (i, &s) in self.out_block[..frames].iter().enumerate() {
                let start = offset + i * channels;
                data[start..start + channels].fill(s);
            }

            frames_written += frames;
        }

        // Trailing partial frame, if the host ever hands us one
        data[total_frames * channels..].fill(0.0);
        short_blocks
    }
}
