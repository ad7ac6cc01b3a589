// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Uniform source of floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::RandomSource;

    #[test]
    fn std_rng_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }
}
