use crate::{Buf, ConstBuf, SigCtx, SigT};

/// Produces one value per batch of samples rather than one per sample. Input from the keyboard
/// arrives this way, since events are collected between batches.
pub trait FrameSigT {
    type Item: Clone;

    fn frame_sample(&mut self, ctx: &SigCtx) -> Self::Item;

    fn map<T, F>(self, f: F) -> FrameSig<Map<Self, T, F>>
    where
        T: Clone,
        Self: Sized,
        F: FnMut(Self::Item) -> T,
    {
        FrameSig(Map { sig: self, f })
    }
}

pub struct FrameSigFn<F, T>(F)
where
    F: FnMut(&SigCtx) -> T,
    T: Clone;

impl<F, T> FrameSigT for FrameSigFn<F, T>
where
    F: FnMut(&SigCtx) -> T,
    T: Clone,
{
    type Item = T;

    fn frame_sample(&mut self, ctx: &SigCtx) -> Self::Item {
        (self.0)(ctx)
    }
}

/// Wrapper type for the `FrameSigT` trait, mirroring `Sig` for sample-rate signals.
#[derive(Clone)]
pub struct FrameSig<S>(pub S)
where
    S: FrameSigT;

impl<F, T> FrameSig<FrameSigFn<F, T>>
where
    F: FnMut(&SigCtx) -> T,
    T: Clone,
{
    pub fn from_fn(f: F) -> Self {
        Self(FrameSigFn(f))
    }
}

impl<S> FrameSigT for FrameSig<S>
where
    S: FrameSigT,
{
    type Item = S::Item;

    fn frame_sample(&mut self, ctx: &SigCtx) -> S::Item {
        self.0.frame_sample(ctx)
    }
}

/// Frame signals are also signals, repeating their value for every sample in the frame.
impl<S> SigT for FrameSig<S>
where
    S: FrameSigT,
{
    type Item = <S as FrameSigT>::Item;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<S::Item> {
        ConstBuf {
            value: self.0.frame_sample(ctx),
            count: ctx.num_samples,
        }
    }
}

pub struct Map<S, T, F>
where
    S: FrameSigT,
    T: Clone,
    F: FnMut(S::Item) -> T,
{
    sig: S,
    f: F,
}

impl<S, T, F> FrameSigT for Map<S, T, F>
where
    S: FrameSigT,
    T: Clone,
    F: FnMut(S::Item) -> T,
{
    type Item = T;

    fn frame_sample(&mut self, ctx: &SigCtx) -> Self::Item {
        (self.f)(self.sig.frame_sample(ctx))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Sig, SigSampleIntoBufT};

    #[test]
    fn frame_value_repeated_across_batch() {
        let mut frame_count = 0;
        let frame_sig = FrameSig::from_fn(move |_| {
            frame_count += 1;
            frame_count as f32
        });
        let mut sig = Sig(frame_sig);
        let mut out = Vec::new();
        let ctx = SigCtx {
            sample_rate_hz: 44_100.0,
            batch_index: 0,
            num_samples: 4,
        };
        sig.sample_into_buf(&ctx, &mut out);
        assert_eq!(out, vec![1.0; 4]);
        sig.sample_into_buf(&ctx, &mut out);
        assert_eq!(out, vec![2.0; 4]);
    }

    #[test]
    fn map_applies_once_per_frame() {
        let ctx = SigCtx {
            sample_rate_hz: 44_100.0,
            batch_index: 0,
            num_samples: 64,
        };
        let mut frame_count = 0;
        let mut sig = FrameSig::from_fn(move |_| {
            frame_count += 1;
            frame_count
        })
        .map(|count| count * 10);
        assert_eq!(sig.frame_sample(&ctx), 10);
        assert_eq!(sig.frame_sample(&ctx), 20);
    }
}
