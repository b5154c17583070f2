use padkeys_core::{Buf, FrameSigT, Sig, SigCtx, SigT};
use padkeys_keyboard::{KeyEvents, Note, Voice, VoiceTable};

/// Plays a voice for each held key. Each frame the pending key events are applied to a table of
/// voices, voices which have finished fading out are dropped, and the remaining voices are mixed.
pub struct KeyboardSynth<K, V, F>
where
    K: FrameSigT<Item = KeyEvents>,
    V: SigT<Item = f32> + Voice,
    F: FnMut(Note) -> V,
{
    key_events: K,
    voice_table: VoiceTable<V>,
    make_voice: F,
    volume: f32,
    buf: Vec<f32>,
}

impl<K, V, F> KeyboardSynth<K, V, F>
where
    K: FrameSigT<Item = KeyEvents>,
    V: SigT<Item = f32> + Voice,
    F: FnMut(Note) -> V,
{
    pub fn num_sounding(&self) -> usize {
        self.voice_table.num_sounding()
    }
}

impl<K, V, F> SigT for KeyboardSynth<K, V, F>
where
    K: FrameSigT<Item = KeyEvents>,
    V: SigT<Item = f32> + Voice,
    F: FnMut(Note) -> V,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        let key_events = self.key_events.frame_sample(ctx);
        self.voice_table
            .handle_events(&key_events, &mut self.make_voice);
        self.voice_table.collect_finished();
        self.buf.clear();
        self.buf.resize(ctx.num_samples, 0.0);
        let volume = self.volume;
        for voice in self.voice_table.voices_mut() {
            let buf_voice = voice.sample(ctx);
            for (out, sample) in self.buf.iter_mut().zip(buf_voice.iter()) {
                *out += sample * volume;
            }
        }
        &self.buf
    }
}

pub struct KeyboardSynthBuilder<K>
where
    K: FrameSigT<Item = KeyEvents>,
{
    key_events: K,
    volume: f32,
}

impl<K> KeyboardSynthBuilder<K>
where
    K: FrameSigT<Item = KeyEvents>,
{
    /// Every voice is scaled by this amount before mixing.
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn build<V, F>(self, make_voice: F) -> Sig<KeyboardSynth<K, V, F>>
    where
        V: SigT<Item = f32> + Voice,
        F: FnMut(Note) -> V,
    {
        Sig(KeyboardSynth {
            key_events: self.key_events,
            voice_table: VoiceTable::new(),
            make_voice,
            volume: self.volume,
            buf: Vec::new(),
        })
    }
}

/// A synthesizer playing one voice per held key, driven by a stream of key events.
pub fn keyboard_synth<K>(key_events: K) -> KeyboardSynthBuilder<K>
where
    K: FrameSigT<Item = KeyEvents>,
{
    KeyboardSynthBuilder {
        key_events,
        volume: 0.25,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{EnvelopedVoice, FluteConfig};
    use padkeys_keyboard::{Key, KeyEvent, KeyEventQueue};
    use padkeys_modules::ExpEnvelope;

    const CTX: SigCtx = SigCtx {
        sample_rate_hz: 1_000.0,
        batch_index: 0,
        num_samples: 100,
    };

    fn dc_voice(_note: Note) -> EnvelopedVoice<f32> {
        EnvelopedVoice::new(1.0, ExpEnvelope::new(0.0, 0.15), 1.0)
    }

    #[test]
    fn mixes_held_voices() {
        let queue = KeyEventQueue::new();
        let mut synth = keyboard_synth(queue.clone().frame_sig())
            .volume(0.5)
            .build(dc_voice);
        let mut out = Vec::new();
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(out, vec![0.0; 100]);
        queue.push(KeyEvent::press(Key::A, Note::A_4));
        queue.push(KeyEvent::press(Key::S, Note::B_4));
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(out, vec![1.0; 100]);
        assert_eq!(synth.0.num_sounding(), 2);
    }

    #[test]
    fn repeated_press_does_not_stack() {
        let queue = KeyEventQueue::new();
        let mut synth = keyboard_synth(queue.clone().frame_sig())
            .volume(1.0)
            .build(dc_voice);
        let press = KeyEvent::press(Key::D, Note::C_5);
        queue.push(press);
        queue.push(KeyEvent {
            repeat: true,
            ..press
        });
        let mut out = Vec::new();
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(out[0], 1.0);
        assert_eq!(synth.0.num_sounding(), 1);
    }

    #[test]
    fn released_voices_are_dropped_after_fading() {
        let queue = KeyEventQueue::new();
        let mut synth = keyboard_synth(queue.clone().frame_sig()).build(dc_voice);
        queue.push(KeyEvent::press(Key::F, Note::D_5));
        let mut out = Vec::new();
        synth.sample(&CTX).clone_to_vec(&mut out);
        queue.push(KeyEvent::release(Key::F, Note::D_5));
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(synth.0.num_sounding(), 1);
        assert!(out[99] < out[0]);
        // the release lasts 150 samples so finishes during this frame
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(out[99], 0.0);
        synth.sample(&CTX).clone_to_vec(&mut out);
        assert_eq!(synth.0.num_sounding(), 0);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let queue = KeyEventQueue::new();
        let flute = FluteConfig::default();
        let mut synth = keyboard_synth(queue.clone().frame_sig())
            .build(|note| flute.voice(note));
        queue.push(KeyEvent::press(Key::G, Note::E_5));
        queue.push(KeyEvent::press(Key::H, Note::F_5));
        let mut out = Vec::new();
        synth.sample(&CTX).clone_to_vec(&mut out);
        queue.push_release_all();
        for _ in 0..12 {
            synth.sample(&CTX).clone_to_vec(&mut out);
        }
        assert_eq!(synth.0.num_sounding(), 0);
    }
}
