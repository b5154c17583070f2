use padkeys_core::{Sig, SigT};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, OnceLock};

/// Uniformly distributed random samples in the range -1..1.
pub fn white() -> Sig<impl SigT<Item = f32>> {
    let mut rng = StdRng::from_os_rng();
    Sig::from_fn(move |_| rng.random::<f32>() * 2. - 1.)
}

/// A buffer of white noise lasting `duration_s` seconds which can be played on a loop by any
/// number of signals. The buffer is filled the first time any of them is sampled, since its
/// length depends on the sample rate. Clones share the buffer.
#[derive(Clone)]
pub struct NoiseLoop {
    duration_s: f32,
    seed: u64,
    table: Arc<OnceLock<Vec<f32>>>,
}

impl NoiseLoop {
    pub fn new(duration_s: f32) -> Self {
        Self::with_seed(StdRng::from_os_rng().random(), duration_s)
    }

    pub fn with_seed(seed: u64, duration_s: f32) -> Self {
        Self {
            duration_s,
            seed,
            table: Arc::new(OnceLock::new()),
        }
    }

    fn table(&self, sample_rate_hz: f32) -> &[f32] {
        self.table.get_or_init(|| {
            let len = ((self.duration_s * sample_rate_hz) as usize).max(1);
            log::debug!("Filling noise buffer with {} samples", len);
            let mut rng = StdRng::seed_from_u64(self.seed);
            (0..len).map(|_| rng.random::<f32>() * 2. - 1.).collect()
        })
    }

    /// Loops the noise starting from a position given as a fraction of its length.
    pub fn sig_from(
        &self,
        offset_01: f32,
    ) -> Sig<impl SigT<Item = f32> + use<>> {
        let noise = self.clone();
        let mut index = None;
        Sig::from_fn(move |ctx| {
            let table = noise.table(ctx.sample_rate_hz);
            let i = index.unwrap_or_else(|| {
                (offset_01.rem_euclid(1.0) * table.len() as f32) as usize
            }) % table.len();
            index = Some((i + 1) % table.len());
            table[i]
        })
    }

    /// Loops the noise starting from a random position, so signals sharing the buffer don't
    /// play identical noise.
    pub fn sig(&self) -> Sig<impl SigT<Item = f32> + use<>> {
        self.sig_from(rand::random())
    }
}

/// White noise which repeats every `duration_s` seconds.
pub fn white_looped(duration_s: f32) -> Sig<impl SigT<Item = f32>> {
    NoiseLoop::new(duration_s).sig_from(0.0)
}
