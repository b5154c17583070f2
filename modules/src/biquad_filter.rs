//! Second order filters based on the formulae in Robert Bristow-Johnson's audio EQ cookbook,
//! parameterized the way web browsers' `BiquadFilterNode` is: the quality factor of the pass
//! filters is given in dB and shelf filters have a fixed slope of 1.
use itertools::izip;
use padkeys_core::{Buf, Filter, SigCtx, SigT};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiquadMode {
    LowPass,
    HighPass,
    /// Boosts or cuts frequencies below the cutoff by the gain, leaving higher frequencies
    /// untouched.
    LowShelf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    fn new(
        mode: BiquadMode,
        sample_rate_hz: f32,
        cutoff_hz: f32,
        q_db: f32,
        gain_db: f32,
    ) -> Self {
        // Not `clamp` as the range is empty at very low sample rates.
        let cutoff_hz = cutoff_hz.min(sample_rate_hz * 0.499).max(1.0);
        let w0 = 2.0 * PI * cutoff_hz / sample_rate_hz;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let (b0, b1, b2, a0, a1, a2) = match mode {
            BiquadMode::LowPass | BiquadMode::HighPass => {
                let q = 10_f32.powf(q_db / 20.0);
                let alpha = sin_w0 / (2.0 * q);
                let (b0, b1) = if mode == BiquadMode::LowPass {
                    ((1.0 - cos_w0) / 2.0, 1.0 - cos_w0)
                } else {
                    ((1.0 + cos_w0) / 2.0, -(1.0 + cos_w0))
                };
                (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            BiquadMode::LowShelf => {
                let a = 10_f32.powf(gain_db / 40.0);
                let alpha = sin_w0 / 2.0 * 2_f32.sqrt();
                let k = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + k),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - k),
                    (a + 1.0) + (a - 1.0) * cos_w0 + k,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - k,
                )
            }
        };
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct form 1 state
#[derive(Default)]
struct State {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl State {
    fn process_sample(&mut self, c: &Coefficients, x: f32) -> f32 {
        let y = (c.b0 * x) + (c.b1 * self.x1) + (c.b2 * self.x2)
            - (c.a1 * self.y1)
            - (c.a2 * self.y2);
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

pub struct Props<C>
where
    C: SigT<Item = f32>,
{
    mode: BiquadMode,
    cutoff_hz: C,
    q_db: f32,
    gain_db: f32,
}

impl<C> Props<C>
where
    C: SigT<Item = f32>,
{
    /// Quality factor in dB. Only affects the pass modes.
    pub fn q_db(mut self, q_db: f32) -> Self {
        self.q_db = q_db;
        self
    }

    /// Only affects the shelf mode.
    pub fn gain_db(mut self, gain_db: f32) -> Self {
        self.gain_db = gain_db;
        self
    }
}

/// A second order filter whose cutoff frequency may vary over time.
pub fn biquad_filter<C>(mode: BiquadMode, cutoff_hz: C) -> Props<C>
where
    C: SigT<Item = f32>,
{
    Props {
        mode,
        cutoff_hz,
        q_db: 1.0,
        gain_db: 0.0,
    }
}

pub fn low_pass<C>(cutoff_hz: C) -> Props<C>
where
    C: SigT<Item = f32>,
{
    biquad_filter(BiquadMode::LowPass, cutoff_hz)
}

pub fn high_pass<C>(cutoff_hz: C) -> Props<C>
where
    C: SigT<Item = f32>,
{
    biquad_filter(BiquadMode::HighPass, cutoff_hz)
}

pub fn low_shelf<C>(cutoff_hz: C) -> Props<C>
where
    C: SigT<Item = f32>,
{
    biquad_filter(BiquadMode::LowShelf, cutoff_hz)
}

impl<C> Filter for Props<C>
where
    C: SigT<Item = f32>,
{
    type ItemIn = f32;

    type Out<S>
        = BiquadFilter<S, C>
    where
        S: SigT<Item = Self::ItemIn>;

    fn into_sig<S>(self, sig: S) -> Self::Out<S>
    where
        S: SigT<Item = Self::ItemIn>,
    {
        BiquadFilter {
            props: self,
            sig,
            state: State::default(),
            coefficients: None,
            prev_cutoff_hz: 0.0,
            buf: Vec::new(),
        }
    }
}

pub struct BiquadFilter<S, C>
where
    S: SigT<Item = f32>,
    C: SigT<Item = f32>,
{
    props: Props<C>,
    sig: S,
    state: State,
    coefficients: Option<Coefficients>,
    prev_cutoff_hz: f32,
    buf: Vec<f32>,
}

impl<S, C> SigT for BiquadFilter<S, C>
where
    S: SigT<Item = f32>,
    C: SigT<Item = f32>,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        self.buf.resize(ctx.num_samples, 0.0);
        let buf_sig = self.sig.sample(ctx);
        let buf_cutoff_hz = self.props.cutoff_hz.sample(ctx);
        for (out, sample, cutoff_hz) in izip! {
            self.buf.iter_mut(),
            buf_sig.iter(),
            buf_cutoff_hz.iter(),
        } {
            // Coefficients are only recomputed when the cutoff changes.
            let coefficients = match self.coefficients {
                Some(coefficients) if cutoff_hz == self.prev_cutoff_hz => {
                    coefficients
                }
                _ => {
                    let coefficients = Coefficients::new(
                        self.props.mode,
                        ctx.sample_rate_hz,
                        cutoff_hz,
                        self.props.q_db,
                        self.props.gain_db,
                    );
                    self.coefficients = Some(coefficients);
                    self.prev_cutoff_hz = cutoff_hz;
                    coefficients
                }
            };
            *out = self.state.process_sample(&coefficients, sample);
        }
        &self.buf
    }
}
