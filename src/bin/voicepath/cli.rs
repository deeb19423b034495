//! Command-line arguments and logging setup.

use clap::Parser;
use log::LevelFilter;

use voicepath::{
    effect::ModulationConfig,
    io::StreamConfig,
    session::{Band, SessionConfig},
};

/// voicepath - live microphone to speaker with a pitch-modulation warble
#[derive(Parser, Debug)]
#[command(name = "voicepath")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print available audio devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Input device name (substring match)
    #[arg(long)]
    pub input: Option<String>,

    /// Output device name (substring match)
    #[arg(long)]
    pub output: Option<String>,

    /// Initial volume (linear gain)
    #[arg(long, default_value_t = 1.0)]
    pub volume: f32,

    /// Initial pitch offset
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f32>,

    /// Start with echo enabled
    #[arg(long)]
    pub echo: bool,

    /// Bass band value (dB = value x 2)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub bass: f32,

    /// Mid band value
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub mid: f32,

    /// Treble band value
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub treble: f32,

    /// Effect delay in seconds
    #[arg(long)]
    pub base_delay: Option<f32>,

    /// Effect oscillator rate in Hz
    #[arg(long)]
    pub rate: Option<f32>,

    /// Pitch offset to modulation gain multiplier
    #[arg(long)]
    pub offset_scale: Option<f32>,

    /// Input-to-output buffer in frames
    #[arg(long, default_value_t = 4096)]
    pub buffer_frames: usize,
}

impl Args {
    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    pub fn modulation_config(&self) -> ModulationConfig {
        let mut config = ModulationConfig::default();
        if let Some(delay) = self.base_delay {
            config = config.with_base_delay(delay);
        }
        if let Some(rate) = self.rate {
            config = config.with_oscillator_frequency(rate);
        }
        if let Some(scale) = self.offset_scale {
            config = config.with_offset_scale(scale);
        }
        config
    }

    pub fn session_config(&self, sample_rate: f32) -> SessionConfig {
        SessionConfig::default()
            .with_sample_rate(sample_rate)
            .with_modulation(self.modulation_config())
            .with_volume(self.volume)
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            input_device: self.input.clone(),
            output_device: self.output.clone(),
            buffer_frames: self.buffer_frames,
        }
    }

    /// Band values that differ from flat.
    pub fn bands(&self) -> impl Iterator<Item = (Band, f32)> {
        [
            (Band::Bass, self.bass),
            (Band::Mid, self.mid),
            (Band::Treble, self.treble),
        ]
        .into_iter()
        .filter(|&(_, value)| value != 0.0)
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Keep dependencies (cpal backends) quiet unless asked for everything
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module("voicepath", args.log_level());

    // RUST_LOG still wins when set
    builder.parse_default_env();
    builder.init();
}
