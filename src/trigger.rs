use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Decides, once per generational collection, whether the old generation is
/// swept as well.
pub trait MajorTrigger: Send {
    fn should_collect_major(&mut self) -> bool;
}

/// Fires independently on each call with a fixed probability.
pub struct RandomTrigger {
    rng: StdRng,
    probability: f64,
}

impl RandomTrigger {
    pub fn new(probability: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), probability)
    }

    pub fn seeded(seed: u64, probability: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), probability)
    }

    fn with_rng(rng: StdRng, probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };

        Self { rng, probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl MajorTrigger for RandomTrigger {
    fn should_collect_major(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

pub struct AlwaysMajor;

impl MajorTrigger for AlwaysMajor {
    fn should_collect_major(&mut self) -> bool {
        true
    }
}

pub struct NeverMajor;

impl MajorTrigger for NeverMajor {
    fn should_collect_major(&mut self) -> bool {
        false
    }
}
