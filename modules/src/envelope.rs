use padkeys_core::{Buf, SigCtx, SigT};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Attack {
        elapsed_samples: u32,
    },
    Sustain,
    Release {
        start_level: f32,
        elapsed_samples: u32,
        num_samples: u32,
    },
    Finished,
}

/// Envelope whose level changes exponentially. It starts at `attack_floor` and rises to 1 over
/// `attack_s` seconds, then holds at 1 until `release` is called. Releasing falls from whatever
/// the level currently is to `release_floor` over `release_s` seconds, after which the envelope
/// outputs 0 and is finished. Exponential ramps can't start or end at 0 so both floors must be
/// positive.
pub struct ExpEnvelope {
    attack_s: f32,
    release_s: f32,
    attack_floor: f32,
    release_floor: f32,
    stage: Stage,
    level: f32,
    release_requested: bool,
    buf: Vec<f32>,
}

impl ExpEnvelope {
    pub fn new(attack_s: f32, release_s: f32) -> Self {
        Self {
            attack_s: attack_s.max(0.0),
            release_s: release_s.max(0.0),
            attack_floor: 1e-5,
            release_floor: 1e-4,
            stage: Stage::Attack { elapsed_samples: 0 },
            level: 1e-5,
            release_requested: false,
            buf: Vec::new(),
        }
    }

    pub fn attack_floor(mut self, attack_floor: f32) -> Self {
        self.attack_floor = attack_floor.max(f32::MIN_POSITIVE);
        self.level = self.attack_floor;
        self
    }

    pub fn release_floor(mut self, release_floor: f32) -> Self {
        self.release_floor = release_floor.max(f32::MIN_POSITIVE);
        self
    }

    /// Start fading out. The release begins on the next sample, from the current level, even if
    /// the attack is still in progress. Repeated calls have no effect.
    pub fn release(&mut self) {
        self.release_requested = true;
    }

    pub fn is_released(&self) -> bool {
        self.release_requested
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    fn begin_release(&mut self, sample_rate_hz: f32) {
        let num_samples = (self.release_s * sample_rate_hz).round() as u32;
        self.stage = if num_samples == 0 {
            self.level = 0.0;
            Stage::Finished
        } else {
            Stage::Release {
                start_level: self.level,
                elapsed_samples: 0,
                num_samples,
            }
        };
    }

    /// Returns the current level and advances the envelope by one sample.
    fn next_level(&mut self, sample_rate_hz: f32) -> f32 {
        if self.release_requested
            && matches!(self.stage, Stage::Attack { .. } | Stage::Sustain)
        {
            self.begin_release(sample_rate_hz);
        }
        let level = self.level;
        match self.stage {
            Stage::Attack { elapsed_samples } => {
                let num_samples = (self.attack_s * sample_rate_hz).round() as u32;
                let elapsed_samples = elapsed_samples + 1;
                if elapsed_samples >= num_samples {
                    self.stage = Stage::Sustain;
                    self.level = 1.0;
                    if num_samples == 0 {
                        return 1.0;
                    }
                } else {
                    self.stage = Stage::Attack { elapsed_samples };
                    let progress_01 = elapsed_samples as f32 / num_samples as f32;
                    self.level = self.attack_floor
                        * (1.0 / self.attack_floor).powf(progress_01);
                }
            }
            Stage::Sustain => (),
            Stage::Release {
                start_level,
                elapsed_samples,
                num_samples,
            } => {
                let elapsed_samples = elapsed_samples + 1;
                if elapsed_samples >= num_samples {
                    self.stage = Stage::Finished;
                    self.level = 0.0;
                } else {
                    self.stage = Stage::Release {
                        start_level,
                        elapsed_samples,
                        num_samples,
                    };
                    let progress_01 = elapsed_samples as f32 / num_samples as f32;
                    self.level = start_level
                        * (self.release_floor / start_level).powf(progress_01);
                }
            }
            Stage::Finished => return 0.0,
        }
        level
    }
}

impl SigT for ExpEnvelope {
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        self.buf.clear();
        for _ in 0..ctx.num_samples {
            let level = self.next_level(ctx.sample_rate_hz);
            self.buf.push(level);
        }
        &self.buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(env: &mut ExpEnvelope, sample_rate_hz: f32, num_samples: usize) -> Vec<f32> {
        let ctx = SigCtx {
            sample_rate_hz,
            batch_index: 0,
            num_samples,
        };
        let mut out = Vec::new();
        env.sample(&ctx).clone_to_vec(&mut out);
        out
    }

    #[test]
    fn attack_reaches_one_after_attack_time() {
        let mut env = ExpEnvelope::new(0.05, 3.0);
        let out = run(&mut env, 1000.0, 100);
        assert!((out[0] - 1e-5).abs() < 1e-9);
        // halfway through the attack the level is the geometric mean of the endpoints
        assert!((out[25] - (1e-5_f32).sqrt()).abs() < 1e-4);
        assert!(out.windows(2).all(|w| w[1] >= w[0]));
        assert!((out[49] - 1.0).abs() > 0.01);
        assert_eq!(out[50], 1.0);
        assert_eq!(out[99], 1.0);
        assert!(!env.is_finished());
    }

    #[test]
    fn release_falls_to_floor_then_finishes() {
        let mut env = ExpEnvelope::new(0.0, 1.0);
        run(&mut env, 100.0, 10);
        env.release();
        let out = run(&mut env, 100.0, 100);
        assert_eq!(out[0], 1.0);
        assert!(out.windows(2).all(|w| w[1] < w[0]));
        assert!((out[99] - 1e-4).abs() < 2e-5);
        assert!(env.is_finished());
        let out = run(&mut env, 100.0, 10);
        assert!(env.is_finished());
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut env = ExpEnvelope::new(1.0, 0.5);
        let out = run(&mut env, 100.0, 50);
        let level = env.level();
        assert!(level < 1.0 && level > out[49]);
        env.release();
        let out = run(&mut env, 100.0, 60);
        assert_eq!(out[0], level);
        assert!(out[1] < level);
        assert!(env.is_finished());
    }

    #[test]
    fn instant_release() {
        let mut env = ExpEnvelope::new(0.0, 0.0);
        env.release();
        let out = run(&mut env, 100.0, 4);
        assert_eq!(out, vec![0.0; 4]);
        assert!(env.is_finished());
    }
}
