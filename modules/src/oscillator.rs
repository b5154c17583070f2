use itertools::izip;
use padkeys_core::{Buf, Sig, SigCtx, SigT};

pub mod waveform {
    use std::f32::consts::PI;

    /// Maps the phase of an oscillator (in the range 0..1) to a sample.
    pub trait Waveform: Copy {
        fn sample(&self, state_01: f32, pulse_width_01: f32) -> f32;
    }

    #[derive(Clone, Copy, Debug)]
    pub struct Sine;
    impl Waveform for Sine {
        fn sample(&self, state_01: f32, _pulse_width_01: f32) -> f32 {
            (state_01 * PI * 2.0).sin()
        }
    }

    #[derive(Clone, Copy, Debug)]
    pub struct Triangle;
    impl Waveform for Triangle {
        fn sample(&self, state_01: f32, _pulse_width_01: f32) -> f32 {
            (((state_01 * 2.0) - 1.0).abs() * 2.0) - 1.0
        }
    }

    #[derive(Clone, Copy, Debug)]
    pub struct Saw;
    impl Waveform for Saw {
        fn sample(&self, state_01: f32, _pulse_width_01: f32) -> f32 {
            (state_01 * 2.0) - 1.0
        }
    }

    #[derive(Clone, Copy, Debug)]
    pub struct Pulse;
    impl Waveform for Pulse {
        fn sample(&self, state_01: f32, pulse_width_01: f32) -> f32 {
            if state_01 < pulse_width_01 { -1.0 } else { 1.0 }
        }
    }
}

pub use waveform::{Pulse, Saw, Sine, Triangle, Waveform};

/// Phase accumulator which advances by `freq_hz / sample_rate_hz` each sample, wrapping into the
/// range 0..1.
pub struct Oscillator<W, F, P>
where
    W: Waveform,
    F: SigT<Item = f32>,
    P: SigT<Item = f32>,
{
    state_01: f32,
    waveform: W,
    freq_hz: F,
    pulse_width_01: P,
    buf: Vec<f32>,
}

impl<W, F, P> SigT for Oscillator<W, F, P>
where
    W: Waveform,
    F: SigT<Item = f32>,
    P: SigT<Item = f32>,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        self.buf.resize(ctx.num_samples, 0.0);
        let buf_freq_hz = self.freq_hz.sample(ctx);
        let buf_pulse_width_01 = self.pulse_width_01.sample(ctx);
        for (out, freq_hz, pulse_width_01) in izip! {
            self.buf.iter_mut(),
            buf_freq_hz.iter(),
            buf_pulse_width_01.iter(),
        } {
            *out = self.waveform.sample(self.state_01, pulse_width_01);
            let state_delta = freq_hz / ctx.sample_rate_hz;
            self.state_01 = (self.state_01 + state_delta).rem_euclid(1.0);
        }
        &self.buf
    }
}

pub struct OscillatorBuilder<W, F, P>
where
    W: Waveform,
    F: SigT<Item = f32>,
    P: SigT<Item = f32>,
{
    waveform: W,
    freq_hz: F,
    pulse_width_01: P,
    reset_offset_01: f32,
}

impl<W, F, P> OscillatorBuilder<W, F, P>
where
    W: Waveform,
    F: SigT<Item = f32>,
    P: SigT<Item = f32>,
{
    /// Only affects the `Pulse` waveform.
    pub fn pulse_width_01<X>(self, pulse_width_01: X) -> OscillatorBuilder<W, F, X>
    where
        X: SigT<Item = f32>,
    {
        let Self {
            waveform,
            freq_hz,
            reset_offset_01,
            ..
        } = self;
        OscillatorBuilder {
            waveform,
            freq_hz,
            pulse_width_01,
            reset_offset_01,
        }
    }

    /// Phase at which the oscillator starts.
    pub fn reset_offset_01(mut self, reset_offset_01: f32) -> Self {
        self.reset_offset_01 = reset_offset_01;
        self
    }

    pub fn build(self) -> Sig<Oscillator<W, F, P>> {
        Sig(Oscillator {
            state_01: self.reset_offset_01.rem_euclid(1.0),
            waveform: self.waveform,
            freq_hz: self.freq_hz,
            pulse_width_01: self.pulse_width_01,
            buf: Vec::new(),
        })
    }
}

/// A signal which oscillates with a given waveform at a given frequency.
pub fn oscillator<W, F>(waveform: W, freq_hz: F) -> OscillatorBuilder<W, F, f32>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    OscillatorBuilder {
        waveform,
        freq_hz,
        pulse_width_01: 0.5,
        reset_offset_01: 0.0,
    }
}

pub fn sine<F>(freq_hz: F) -> Sig<Oscillator<Sine, F, f32>>
where
    F: SigT<Item = f32>,
{
    oscillator(Sine, freq_hz).build()
}

pub fn triangle<F>(freq_hz: F) -> Sig<Oscillator<Triangle, F, f32>>
where
    F: SigT<Item = f32>,
{
    oscillator(Triangle, freq_hz).build()
}

pub fn saw<F>(freq_hz: F) -> Sig<Oscillator<Saw, F, f32>>
where
    F: SigT<Item = f32>,
{
    oscillator(Saw, freq_hz).build()
}

pub fn pulse<F>(freq_hz: F) -> Sig<Oscillator<Pulse, F, f32>>
where
    F: SigT<Item = f32>,
{
    oscillator(Pulse, freq_hz).build()
}

#[cfg(test)]
mod test {
    use super::*;
    use padkeys_core::SigSampleIntoBufT;

    const CTX: SigCtx = SigCtx {
        sample_rate_hz: 8.0,
        batch_index: 0,
        num_samples: 8,
    };

    fn approx_eq(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| (a - b).abs() < 1e-5)
    }

    #[test]
    fn saw_ramps_once_per_period() {
        let mut sig = saw(1.0f32);
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert!(approx_eq(
            &out,
            &[-1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75]
        ));
    }

    #[test]
    fn phase_continues_between_batches() {
        let mut sig = triangle(2.0f32);
        let mut first = Vec::new();
        let mut second = Vec::new();
        sig.sample_into_buf(&CTX, &mut first);
        sig.sample_into_buf(&CTX, &mut second);
        assert!(approx_eq(&first, &second));
        assert!(approx_eq(&first[0..4], &[1.0, 0.0, -1.0, 0.0]));
    }

    #[test]
    fn sine_starts_at_zero() {
        let mut sig = sine(1.0f32);
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert!(approx_eq(&out[0..3], &[0.0, 0.70710677, 1.0]));
    }

    #[test]
    fn pulse_width() {
        let mut sig = oscillator(Pulse, 1.0f32).pulse_width_01(0.25f32).build();
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert_eq!(out, vec![-1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let mut sig = pulse(1.0f32);
        sig.sample_into_buf(&CTX, &mut out);
        assert_eq!(out.iter().filter(|&&x| x < 0.0).count(), 4);
    }

    #[test]
    fn reset_offset() {
        let mut sig = oscillator(Saw, 1.0f32).reset_offset_01(0.5).build();
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert!(approx_eq(&out[0..2], &[0.0, 0.25]));
    }
}
