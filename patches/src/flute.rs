use crate::EnvelopedVoice;
use padkeys_core::SigT;
use padkeys_keyboard::Note;
use padkeys_modules::{ExpEnvelope, sine};

/// A pure sine tone with a gentle attack.
#[derive(Clone, Debug)]
pub struct FluteConfig {
    pub attack_s: f32,
    pub release_s: f32,
    pub attack_floor: f32,
    pub release_floor: f32,
    pub gain: f32,
}

impl Default for FluteConfig {
    fn default() -> Self {
        Self {
            attack_s: 0.1,
            release_s: 1.0,
            attack_floor: 1e-7,
            release_floor: 1e-4,
            gain: 0.5,
        }
    }
}

impl FluteConfig {
    pub fn voice(
        &self,
        note: Note,
    ) -> EnvelopedVoice<impl SigT<Item = f32> + use<>> {
        let envelope = ExpEnvelope::new(self.attack_s, self.release_s)
            .attack_floor(self.attack_floor)
            .release_floor(self.release_floor);
        EnvelopedVoice::new(sine(note.freq_hz()), envelope, self.gain)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use padkeys_core::{Buf, SigCtx};
    use padkeys_keyboard::Voice;

    #[test]
    fn flute_reaches_full_gain() {
        let ctx = SigCtx {
            sample_rate_hz: 8_000.0,
            batch_index: 0,
            num_samples: 4_000,
        };
        let config = FluteConfig::default();
        let mut voice = config.voice(Note::A_4);
        let mut out = Vec::new();
        voice.sample(&ctx).clone_to_vec(&mut out);
        let peak = out[2_000..].iter().fold(0.0f32, |acc, x| acc.max(x.abs()));
        assert!((peak - config.gain).abs() < 0.01, "{}", peak);
        voice.release();
        voice.sample(&ctx).clone_to_vec(&mut out);
        voice.sample(&ctx).clone_to_vec(&mut out);
        assert!(voice.is_finished());
    }
}
