use rand::rngs::OsRng;
use rand::{RngCore, TryRngCore};

/// Uniform random draws for winner selection.
///
/// The scheduler only ever talks to this trait; tests substitute a scripted
/// implementation to force a particular outcome.
pub trait Selector {
    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn random_index(&mut self, n: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn random_unit(&mut self) -> f64;
}

/// Production selector backed by the operating-system CSPRNG, falling back
/// to the userspace generator when the OS source is unavailable.
#[derive(Debug, Default)]
pub struct Entropy;

impl Entropy {
    fn next_u32(&mut self) -> u32 {
        match OsRng.try_next_u32() {
            Ok(draw) => draw,
            Err(e) => {
                log::warn!("OS entropy unavailable, using userspace fallback: {}", e);
                rand::rng().next_u32()
            }
        }
    }
}

impl Selector for Entropy {
    fn random_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        // Reject draws at or above the largest multiple of `n` that fits in
        // 32 bits, otherwise `% n` skews toward low indices whenever `n` is
        // not a power of two.
        let n = n as u64;
        let limit = ((1u64 << 32) / n) * n;
        loop {
            let draw = u64::from(self.next_u32());
            if draw < limit {
                return (draw % n) as usize;
            }
        }
    }

    fn random_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_stay_in_range() {
        let mut entropy = Entropy;
        for n in [1, 2, 3, 7, 8, 12] {
            for _ in 0..2_000 {
                assert!(entropy.random_index(n) < n);
            }
        }
    }

    #[test]
    fn zero_bound_is_degenerate() {
        assert_eq!(Entropy.random_index(0), 0);
    }

    #[test]
    fn indices_are_uniform() {
        // Chi-square goodness of fit against the uniform distribution over
        // seven bins. With 14_000 draws the statistic sits around 6 (df = 6);
        // 40 is far enough into the tail that a sound generator cannot
        // plausibly trip it.
        let mut entropy = Entropy;
        let n = 7usize;
        let draws = 14_000usize;
        let mut counts = vec![0u32; n];
        for _ in 0..draws {
            counts[entropy.random_index(n)] += 1;
        }

        let expected = draws as f64 / n as f64;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let d = f64::from(c) - expected;
                d * d / expected
            })
            .sum();
        assert!(chi_square < 40.0, "chi_square = {}", chi_square);
    }

    #[test]
    fn unit_floats_stay_in_range() {
        let mut entropy = Entropy;
        for _ in 0..10_000 {
            let x = entropy.random_unit();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
