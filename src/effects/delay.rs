//! Tempo-synced feedback delay.

/// Ring buffer for a delay line.
#[derive(Debug, Clone)]
struct DelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl DelayLine {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(2)],
            write_pos: 0,
        }
    }

    fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    fn read(&self, delay_samples: usize) -> f64 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - delay_samples.min(len - 1)) % len;
        self.buffer[read_pos]
    }

    fn read_interpolated(&self, delay_samples: f64) -> f64 {
        let delay_int = delay_samples.floor() as usize;
        let frac = delay_samples - delay_int as f64;
        let a = self.read(delay_int);
        let b = self.read(delay_int + 1);
        a * (1.0 - frac) + b * frac
    }
}

/// Fully wet feedback delay whose time is a fraction of a beat.
///
/// The delay time is latched from the tempo and only follows a new tempo once
/// it holds steady, so a tempo ramp never bends the echoes already in flight.
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    line: DelayLine,
    time_beats: f64,
    feedback: f64,
    sample_rate: f64,
    delay_samples: f64,
    latched_bpm: Option<f64>,
    last_bpm: Option<f64>,
}

impl FeedbackDelay {
    /// `max_secs` bounds the longest delay time the line can hold.
    pub fn new(time_beats: f64, feedback: f64, max_secs: f64, sample_rate: u32) -> Self {
        let sample_rate = sample_rate as f64;
        Self {
            line: DelayLine::new((max_secs * sample_rate).ceil() as usize + 2),
            time_beats,
            feedback: feedback.clamp(0.0, 0.95),
            sample_rate,
            delay_samples: 1.0,
            latched_bpm: None,
            last_bpm: None,
        }
    }

    /// Delay time in seconds at `bpm`.
    pub fn time_secs(&self, bpm: f64) -> f64 {
        self.time_beats * 60.0 / bpm
    }

    /// Tempo the current delay time was taken from.
    pub fn latched_bpm(&self) -> Option<f64> {
        self.latched_bpm
    }

    fn follow_tempo(&mut self, bpm: f64) {
        let steady = self.last_bpm == Some(bpm);
        self.last_bpm = Some(bpm);
        if self.latched_bpm.is_none() || (steady && self.latched_bpm != Some(bpm)) {
            self.latched_bpm = Some(bpm);
            self.delay_samples = (self.time_secs(bpm) * self.sample_rate).max(1.0);
        }
    }

    /// Process one sample; returns only the delayed signal.
    #[inline]
    pub fn process(&mut self, input: f64, bpm: f64) -> f64 {
        self.follow_tempo(bpm);
        let delayed = self.line.read_interpolated(self.delay_samples);
        self.line.write(input + delayed * self.feedback);
        delayed
    }
}
