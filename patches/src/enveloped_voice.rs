use padkeys_core::{Buf, SigCtx, SigT};
use padkeys_keyboard::Voice;
use padkeys_modules::ExpEnvelope;

/// A source signal shaped by an envelope which is released when the voice's key is released. The
/// source stops being sampled once the envelope has finished.
pub struct EnvelopedVoice<S>
where
    S: SigT<Item = f32>,
{
    source: S,
    envelope: ExpEnvelope,
    gain: f32,
    buf: Vec<f32>,
}

impl<S> EnvelopedVoice<S>
where
    S: SigT<Item = f32>,
{
    pub fn new(source: S, envelope: ExpEnvelope, gain: f32) -> Self {
        Self {
            source,
            envelope,
            gain,
            buf: Vec::new(),
        }
    }
}

impl<S> SigT for EnvelopedVoice<S>
where
    S: SigT<Item = f32>,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        self.buf.clear();
        if self.envelope.is_finished() {
            self.buf.resize(ctx.num_samples, 0.0);
            return &self.buf;
        }
        let gain = self.gain;
        let buf_source = self.source.sample(ctx);
        let buf_envelope = self.envelope.sample(ctx);
        self.buf.extend(
            buf_source
                .iter()
                .zip(buf_envelope.iter())
                .map(|(sample, level)| sample * level * gain),
        );
        &self.buf
    }
}

impl<S> Voice for EnvelopedVoice<S>
where
    S: SigT<Item = f32>,
{
    fn release(&mut self) {
        self.envelope.release();
    }

    fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }
}
