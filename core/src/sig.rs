use std::{iter, marker::PhantomData};

/// Passed to signals each time the audio device wants more samples.
#[derive(Clone, Copy, Debug)]
pub struct SigCtx {
    pub sample_rate_hz: f32,
    /// Counts batches since playback started
    pub batch_index: u64,
    pub num_samples: usize,
}

/// The samples a signal produced for one batch.
pub trait Buf<T>
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T>;

    /// Replaces the contents of `out` with the samples in this batch.
    fn clone_to_vec(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend(self.iter());
    }
}

impl<T> Buf<T> for &Vec<T>
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T> {
        self.as_slice().iter().cloned()
    }

    fn clone_to_vec(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend_from_slice(self);
    }
}

/// A batch where every sample has the same value.
pub struct ConstBuf<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Buf<T> for ConstBuf<T>
where
    T: Clone,
{
    fn iter(&self) -> impl Iterator<Item = T> {
        iter::repeat_n(self.value.clone(), self.count)
    }

    fn clone_to_vec(&self, out: &mut Vec<T>) {
        out.clear();
        out.resize(self.count, self.value.clone());
    }
}

/// Applies a function to each sample as the batch is read, so mapping never allocates.
pub struct MapBuf<B, F, I, O>
where
    I: Clone,
    O: Clone,
    B: Buf<I>,
    F: Fn(I) -> O,
{
    buf: B,
    f: F,
    phantom: PhantomData<(I, O)>,
}

impl<B, F, I, O> Buf<O> for MapBuf<B, F, I, O>
where
    I: Clone,
    O: Clone,
    B: Buf<I>,
    F: Fn(I) -> O,
{
    fn iter(&self) -> impl Iterator<Item = O> {
        self.buf.iter().map(&self.f)
    }
}

/// Something that produces a value for every audio sample. Signals are pulled a batch at a time
/// and every call must yield exactly `ctx.num_samples` values.
pub trait SigT {
    type Item: Clone;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item>;

    fn filter<F>(self, filter: F) -> Sig<F::Out<Self>>
    where
        F: Filter<ItemIn = Self::Item>,
        Self: Sized,
    {
        Sig(filter.into_sig(self))
    }
}

/// Sampling into a buffer owned by the caller. This is how the player gets samples.
pub trait SigSampleIntoBufT {
    type Item: Clone;

    fn sample_into_buf(&mut self, ctx: &SigCtx, buf: &mut Vec<Self::Item>);
}

impl SigT for f32 {
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<f32> {
        ConstBuf {
            value: *self,
            count: ctx.num_samples,
        }
    }
}

/// Wraps any signal so that operators and combinators can be implemented on it.
#[derive(Clone)]
pub struct Sig<S>(pub S)
where
    S: SigT;

impl<S: SigT> SigT for Sig<S> {
    type Item = S::Item;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<S::Item> {
        self.0.sample(ctx)
    }
}

impl<S: SigT> SigSampleIntoBufT for Sig<S> {
    type Item = S::Item;

    fn sample_into_buf(&mut self, ctx: &SigCtx, buf: &mut Vec<S::Item>) {
        self.0.sample(ctx).clone_to_vec(buf);
    }
}

impl<S> Sig<S>
where
    S: SigT,
{
    pub fn map<T, F>(self, f: F) -> Sig<Map<S, T, F>>
    where
        T: Clone,
        F: Fn(S::Item) -> T,
    {
        Sig(Map { sig: self.0, f })
    }
}

impl<S> Sig<S>
where
    S: SigT<Item = f32>,
{
    /// Limits samples to -1..1.
    pub fn clamp_unit(self) -> Sig<impl SigT<Item = f32>> {
        self.map(|x| x.clamp(-1.0, 1.0))
    }
}

pub struct Map<S, T, F>
where
    S: SigT,
    F: Fn(S::Item) -> T,
{
    sig: S,
    f: F,
}

impl<S, T, F> SigT for Map<S, T, F>
where
    T: Clone,
    S: SigT,
    F: Fn(S::Item) -> T,
{
    type Item = T;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<T> {
        MapBuf {
            buf: self.sig.sample(ctx),
            f: &self.f,
            phantom: PhantomData,
        }
    }
}

/// A processor turning one signal into another, such as an audio filter. Use it with
/// `SigT::filter`.
pub trait Filter {
    type ItemIn;

    type Out<S>: SigT
    where
        S: SigT<Item = Self::ItemIn>;

    fn into_sig<S>(self, sig: S) -> Self::Out<S>
    where
        S: SigT<Item = Self::ItemIn>;
}

pub struct SigFn<F, T>
where
    F: FnMut(&SigCtx) -> T,
    T: Clone + Default,
{
    f: F,
    buf: Vec<T>,
}

impl<F, T> SigT for SigFn<F, T>
where
    F: FnMut(&SigCtx) -> T,
    T: Clone + Default,
{
    type Item = T;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<T> {
        self.buf.clear();
        self.buf.extend((0..ctx.num_samples).map(|_| (self.f)(ctx)));
        &self.buf
    }
}

impl<F, T> Sig<SigFn<F, T>>
where
    F: FnMut(&SigCtx) -> T,
    T: Clone + Default,
{
    /// A signal which calls `f` once per sample.
    pub fn from_fn(f: F) -> Self {
        Self(SigFn { f, buf: Vec::new() })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ctx(batch_index: u64, num_samples: usize) -> SigCtx {
        SigCtx {
            sample_rate_hz: 48_000.0,
            batch_index,
            num_samples,
        }
    }

    #[test]
    fn const_fills_batch() {
        let mut sig = Sig(0.5f32);
        let mut out = Vec::new();
        sig.sample_into_buf(&ctx(0, 4), &mut out);
        assert_eq!(out, vec![0.5; 4]);
    }

    #[test]
    fn from_fn_keeps_state_across_batches() {
        let mut count = 0;
        let mut sig = Sig::from_fn(move |_| {
            count += 1;
            count
        });
        let mut out = Vec::new();
        sig.sample_into_buf(&ctx(0, 3), &mut out);
        assert_eq!(out, vec![1, 2, 3]);
        sig.sample_into_buf(&ctx(1, 2), &mut out);
        assert_eq!(out, vec![4, 5]);
    }

    #[test]
    fn map_each_sample() {
        let mut sig = Sig::from_fn(|ctx| ctx.num_samples as f32).map(|x| x * 2.0);
        let mut out = Vec::new();
        sig.sample_into_buf(&ctx(0, 2), &mut out);
        assert_eq!(out, vec![4.0, 4.0]);
    }

    #[test]
    fn clamp_unit_limits_range() {
        let mut sig = Sig(3.0f32).clamp_unit();
        let mut out = Vec::new();
        sig.sample_into_buf(&ctx(0, 1), &mut out);
        assert_eq!(out, vec![1.0]);
        let mut sig = Sig(-3.0f32).clamp_unit();
        sig.sample_into_buf(&ctx(0, 1), &mut out);
        assert_eq!(out, vec![-1.0]);
    }

    struct Invert;

    impl Filter for Invert {
        type ItemIn = f32;

        type Out<S>
            = Map<S, f32, fn(f32) -> f32>
        where
            S: SigT<Item = f32>;

        fn into_sig<S>(self, sig: S) -> Self::Out<S>
        where
            S: SigT<Item = f32>,
        {
            Map { sig, f: |x| -x }
        }
    }

    #[test]
    fn filter_wraps_signal() {
        let mut sig = Sig(0.25f32).filter(Invert);
        let mut out = Vec::new();
        sig.sample_into_buf(&ctx(0, 3), &mut out);
        assert_eq!(out, vec![-0.25; 3]);
    }
}
