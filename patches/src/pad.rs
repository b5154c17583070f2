use crate::EnvelopedVoice;
use padkeys_core::{Sig, SigT};
use padkeys_keyboard::Note;
use padkeys_modules::{
    BiquadMode, ExpEnvelope, biquad_filter, noise::NoiseLoop, saw, triangle,
};

/// A sustained pad sound made from a saw and a slightly detuned triangle wave with some noise,
/// passed through a filter tracking the note's frequency.
#[derive(Clone, Debug)]
pub struct PadConfig {
    pub attack_s: f32,
    pub release_s: f32,
    /// Level at which the attack starts
    pub attack_floor: f32,
    /// Level reached at the end of the release, after which the voice falls silent
    pub release_floor: f32,
    /// The triangle wave plays at `freq * (1 - detune_ratio)`
    pub detune_ratio: f32,
    pub noise_gain: f32,
    /// Length of the repeating noise buffer
    pub noise_loop_s: f32,
    pub filter_mode: BiquadMode,
    /// The filter cutoff is this multiple of the note's frequency
    pub filter_cutoff_ratio: f32,
    pub filter_q_db: f32,
    pub filter_gain_db: f32,
    pub gain: f32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            attack_s: 0.05,
            release_s: 3.0,
            attack_floor: 1e-5,
            release_floor: 1e-4,
            detune_ratio: 1.0 / 700.0,
            noise_gain: 0.1,
            noise_loop_s: 4.0,
            filter_mode: BiquadMode::LowPass,
            filter_cutoff_ratio: 1.5,
            filter_q_db: 1.0,
            filter_gain_db: 0.0,
            gain: 0.5,
        }
    }
}

impl PadConfig {
    /// A buffer of noise for voices to share. Each voice reads it from a random position.
    pub fn noise(&self) -> NoiseLoop {
        NoiseLoop::new(self.noise_loop_s)
    }

    pub fn source(
        &self,
        note: Note,
        noise: &NoiseLoop,
    ) -> Sig<impl SigT<Item = f32> + use<>> {
        let freq_hz = note.freq_hz();
        let oscillators = saw(freq_hz)
            + triangle(freq_hz - (freq_hz * self.detune_ratio))
            + (noise.sig() * self.noise_gain);
        oscillators.filter(
            biquad_filter(self.filter_mode, freq_hz * self.filter_cutoff_ratio)
                .q_db(self.filter_q_db)
                .gain_db(self.filter_gain_db),
        )
    }

    pub fn envelope(&self) -> ExpEnvelope {
        ExpEnvelope::new(self.attack_s, self.release_s)
            .attack_floor(self.attack_floor)
            .release_floor(self.release_floor)
    }

    pub fn voice(
        &self,
        note: Note,
        noise: &NoiseLoop,
    ) -> EnvelopedVoice<impl SigT<Item = f32> + use<>> {
        EnvelopedVoice::new(self.source(note, noise), self.envelope(), self.gain)
    }
}
