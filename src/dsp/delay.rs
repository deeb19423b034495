/*
Delay Line
==========

A circular buffer of past input samples. Each call writes the newest sample,
then reads one from `delay` samples back:

    delay = 0        →  the sample just written (pass-through)
    delay = 480      →  10 ms ago at 48 kHz
    delay = 480.5    →  halfway between 480 and 481 samples ago

Fractional delays are read with linear interpolation. That keeps modulated
delay times (chorus, vibrato) free of zipper noise while costing one extra
read per sample.

The buffer is sized once from the longest delay the owner will ask for, so
reads and writes never allocate.
*/

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line able to hold `max_delay_samples` of history.
    pub fn with_capacity(max_delay_samples: usize) -> Self {
        // +2: room for the newest sample and the interpolation neighbour
        Self {
            buffer: vec![0.0; max_delay_samples + 2],
            write_pos: 0,
        }
    }

    /// Longest delay (in samples) this line can read back.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 2
    }

    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read the sample written `delay` samples before the newest one.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(self.max_delay());
        self.buffer[(self.write_pos + len - 1 - delay) % len]
    }

    /// Read at a fractional delay, linearly interpolating between neighbours.
    pub fn read_interpolated(&self, delay: f32) -> f32 {
        let delay = delay.clamp(0.0, self.max_delay() as f32);
        let whole = delay.floor();
        let frac = delay - whole;
        let a = self.read(whole as usize);
        if frac == 0.0 {
            return a;
        }
        let b = self.read(whole as usize + 1);
        a + (b - a) * frac
    }

    /// Write `sample`, then read it back `delay` samples later.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay: f32) -> f32 {
        self.write(sample);
        self.read_interpolated(delay)
    }

    pub fn render(&mut self, buffer: &mut [f32], delay: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
