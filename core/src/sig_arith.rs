use crate::{Buf, Sig, SigCtx, SigT};
use std::ops::{Add, Mul, Sub};

macro_rules! impl_binary_op {
    ($sig_struct:ident, $trait:ident, $fn:ident) => {
        /// Signal for applying the operation pairwise to each element of a pair of signals
        pub struct $sig_struct<L, R>
        where
            L: SigT,
            R: SigT,
            L::Item: $trait<R::Item>,
        {
            lhs: L,
            rhs: R,
            buf: Vec<<L::Item as $trait<R::Item>>::Output>,
        }

        impl<L, R> SigT for $sig_struct<L, R>
        where
            L: SigT,
            R: SigT,
            L::Item: $trait<R::Item>,
            <L::Item as $trait<R::Item>>::Output: Clone,
        {
            type Item = <L::Item as $trait<R::Item>>::Output;

            fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
                let buf_lhs = self.lhs.sample(ctx);
                let buf_rhs = self.rhs.sample(ctx);
                self.buf.clear();
                self.buf.extend(
                    buf_lhs
                        .iter()
                        .zip(buf_rhs.iter())
                        .map(|(lhs, rhs)| lhs.$fn(rhs)),
                );
                &self.buf
            }
        }

        /// Operate on a pair of signals where at least the LHS is wrapped in the `Sig` type.
        impl<S, R> $trait<R> for Sig<S>
        where
            S: SigT,
            R: SigT,
            S::Item: $trait<R::Item>,
            <S::Item as $trait<R::Item>>::Output: Clone,
        {
            type Output = Sig<$sig_struct<S, R>>;

            fn $fn(self, rhs: R) -> Self::Output {
                Sig($sig_struct {
                    lhs: self.0,
                    rhs,
                    buf: Vec::new(),
                })
            }
        }

        /// Operate on an f32 and a signal where the RHS is wrapped in the `Sig` type.
        impl<R> $trait<Sig<R>> for f32
        where
            R: SigT,
            f32: $trait<R::Item>,
            <f32 as $trait<R::Item>>::Output: Clone,
        {
            type Output = Sig<$sig_struct<f32, R>>;

            fn $fn(self, rhs: Sig<R>) -> Self::Output {
                Sig($sig_struct {
                    lhs: self,
                    rhs: rhs.0,
                    buf: Vec::new(),
                })
            }
        }
    };
}

impl_binary_op!(SigAdd, Add, add);
impl_binary_op!(SigSub, Sub, sub);
impl_binary_op!(SigMul, Mul, mul);

#[cfg(test)]
mod test {
    use crate::{Sig, SigCtx, SigSampleIntoBufT};

    const CTX: SigCtx = SigCtx {
        sample_rate_hz: 48_000.0,
        batch_index: 0,
        num_samples: 3,
    };

    #[test]
    fn arithmetic_between_sigs_and_constants() {
        let mut sig = (Sig(2.0f32) + 1.0f32) * 0.5f32 - Sig(0.25f32);
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert_eq!(out, vec![1.25; 3]);
    }

    #[test]
    fn constant_on_the_left() {
        let mut sig = 1.0f32 - Sig(0.25f32);
        let mut out = Vec::new();
        sig.sample_into_buf(&CTX, &mut out);
        assert_eq!(out, vec![0.75; 3]);
    }
}
