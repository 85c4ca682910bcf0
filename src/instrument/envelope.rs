//! ADSR envelope generator for synth voices.

/// Attack-Decay-Sustain-Release envelope.
///
/// All time values are in seconds. Sustain is a level (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrEnvelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl AdsrEnvelope {
    pub const fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Level while the note is held, `t` seconds after note-on.
    fn held_level(&self, t: f64) -> f64 {
        if t < self.attack {
            t / self.attack
        } else if t < self.attack + self.decay {
            let decay_t = (t - self.attack) / self.decay;
            1.0 - decay_t * (1.0 - self.sustain)
        } else {
            self.sustain
        }
    }

    /// Amplitude at time `t` for a note held for `note_duration` seconds.
    ///
    /// Release ramps linearly to zero from whatever level the note had
    /// reached at note-off, so notes shorter than attack + decay fade out
    /// without a jump.
    pub fn amplitude(&self, t: f64, note_duration: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if t < note_duration {
            return self.held_level(t);
        }
        if self.release <= 0.0 {
            return 0.0;
        }
        let release_t = (t - note_duration) / self.release;
        if release_t >= 1.0 {
            return 0.0;
        }
        self.held_level(note_duration.max(0.0)) * (1.0 - release_t)
    }

    /// Total sound duration including release tail.
    pub fn total_duration(&self, note_duration: f64) -> f64 {
        note_duration + self.release
    }
}
