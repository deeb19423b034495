use crate::{
    dsp::{
        biquad::{Biquad, BiquadType, Coefficients},
        delay::DelayLine,
        oscillator::{Oscillator, Waveform},
    },
    graph::node::{NodeKind, PlaybackState, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Most parameters any node kind exposes (biquad: frequency, q, gain).
pub(crate) const MAX_PARAMS: usize = 3;

pub(crate) enum Processor {
    Gain,
    Delay {
        line: DelayLine,
    },
    Oscillator {
        osc: Oscillator,
        state: PlaybackState,
    },
    Biquad {
        filter: Biquad,
        filter_type: BiquadType,
        /// (frequency, q, gain_db) the current coefficients were built from
        designed: Option<[f32; 3]>,
    },
    Source,
    Destination,
}

/// One node in the host's table: its kind, intrinsic parameter values,
/// processing state and the output of the last rendered block.
pub(crate) struct NodeSlot {
    pub kind: NodeKind,
    pub params: [f32; MAX_PARAMS],
    pub processor: Processor,
    pub output: Vec<f32>,
}

impl NodeSlot {
    fn with(kind: NodeKind, processor: Processor, defaults: &[f32]) -> Self {
        let mut params = [0.0; MAX_PARAMS];
        params[..defaults.len()].copy_from_slice(defaults);
        Self {
            kind,
            params,
            processor,
            output: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn gain() -> Self {
        Self::with(NodeKind::Gain, Processor::Gain, &[1.0])
    }

    pub fn delay(max_delay_samples: usize) -> Self {
        Self::with(
            NodeKind::Delay,
            Processor::Delay {
                line: DelayLine::with_capacity(max_delay_samples),
            },
            &[0.0],
        )
    }

    pub fn oscillator(waveform: Waveform) -> Self {
        Self::with(
            NodeKind::Oscillator,
            Processor::Oscillator {
                osc: Oscillator::new(waveform),
                state: PlaybackState::NotStarted,
            },
            &[440.0],
        )
    }

    pub fn biquad(filter_type: BiquadType) -> Self {
        Self::with(
            NodeKind::Biquad,
            Processor::Biquad {
                filter: Biquad::new(),
                filter_type,
                designed: None,
            },
            // frequency, q, gain_db
            &[350.0, 1.0, 0.0],
        )
    }

    pub fn source() -> Self {
        Self::with(NodeKind::Source, Processor::Source, &[])
    }

    pub fn destination() -> Self {
        Self::with(NodeKind::Destination, Processor::Destination, &[])
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        match &self.processor {
            Processor::Oscillator { state, .. } => Some(*state),
            _ => None,
        }
    }

    pub fn set_playback_state(&mut self, next: PlaybackState) {
        if let Processor::Oscillator { state, .. } = &mut self.processor {
            *state = next;
        }
    }

    /// Render `len` samples into `self.output`.
    ///
    /// `input` is the summed signal input, `params[slot]` the per-sample
    /// parameter values (intrinsic + modulation), `live` the host's live input.
    pub fn process(
        &mut self,
        input: &[f32],
        params: &[Vec<f32>],
        live: &[f32],
        len: usize,
        ctx: &RenderCtx,
    ) {
        let out = &mut self.output[..len];

        match &mut self.processor {
            Processor::Gain => {
                let gain = &params[0][..len];
                for ((o, &x), &g) in out.iter_mut().zip(input).zip(gain) {
                    *o = x * g;
                }
            }
            Processor::Delay { line } => {
                let delay_time = &params[0][..len];
                for ((o, &x), &seconds) in out.iter_mut().zip(input).zip(delay_time) {
                    *o = line.next_sample(x, seconds * ctx.sample_rate);
                }
            }
            Processor::Oscillator { osc, state } => {
                if *state == PlaybackState::Running {
                    osc.render(out, &params[0][..len], ctx.sample_rate);
                } else {
                    out.fill(0.0);
                }
            }
            Processor::Biquad {
                filter,
                filter_type,
                designed,
            } => {
                // Coefficients follow the parameters once per block
                let wanted = [params[0][0], params[1][0], params[2][0]];
                if *designed != Some(wanted) {
                    filter.set_coefficients(Coefficients::new(
                        *filter_type,
                        wanted[0],
                        wanted[1],
                        wanted[2],
                        ctx.sample_rate,
                    ));
                    *designed = Some(wanted);
                }
                for (o, &x) in out.iter_mut().zip(input) {
                    *o = filter.process(x);
                }
            }
            Processor::Source => {
                let available = live.len().min(len);
                out[..available].copy_from_slice(&live[..available]);
                out[available..].fill(0.0);
            }
            Processor::Destination => {
                out.copy_from_slice(&input[..len]);
            }
        }
    }
}
