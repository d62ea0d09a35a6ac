//! Randomized arrival clock
//!
//! Models the arrival of physics events from one source as a Poisson
//! process: inter-arrival gaps are independent exponential draws with
//! mean `1/rate`. The clock reads in session seconds and only moves
//! forward.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use evmix_core::MixResult;

use crate::spec::validate_rate;

/// Per-source Poisson arrival clock
#[derive(Clone, Debug)]
pub struct ArrivalClock {
    /// Mean events per simulated second
    rate: f64,
    /// Session time of the next physics event
    next_arrival: f64,
    /// Local RNG
    rng: StdRng,
}

impl ArrivalClock {
    /// Clock seeded from OS entropy
    pub fn new(rate: f64) -> MixResult<Self> {
        Self::with_rng(rate, StdRng::from_entropy())
    }

    /// Reproducible clock
    pub fn with_seed(rate: f64, seed: u64) -> MixResult<Self> {
        Self::with_rng(rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rate: f64, rng: StdRng) -> MixResult<Self> {
        validate_rate("arrival clock", rate)?;
        let mut clock = ArrivalClock {
            rate,
            next_arrival: 0.0,
            rng,
        };
        // First arrival of a process started at zero.
        clock.advance();
        Ok(clock)
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Session time of the next physics event
    #[inline]
    pub fn next_arrival(&self) -> f64 {
        self.next_arrival
    }

    /// Move the clock forward by one exponential draw, returning the gap
    pub fn advance(&mut self) -> f64 {
        let gap = self.sample_gap();
        self.next_arrival += gap;
        gap
    }

    /// Inverse-CDF exponential sample with mean `1/rate`
    fn sample_gap(&mut self) -> f64 {
        // u in [0, 1) so 1 - u is in (0, 1] and the log is finite.
        let u: f64 = self.rng.gen();
        -(1.0 - u).ln() / self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_rate() {
        assert!(ArrivalClock::with_seed(0.0, 1).is_err());
        assert!(ArrivalClock::with_seed(-1.0, 1).is_err());
        assert!(ArrivalClock::with_seed(f64::NAN, 1).is_err());
    }

    #[test]
    fn test_first_arrival_is_drawn() {
        let clock = ArrivalClock::with_seed(1.0, 7).unwrap();
        assert!(clock.next_arrival() >= 0.0);
    }

    #[test]
    fn test_clock_strictly_advances() {
        let mut clock = ArrivalClock::with_seed(5.0, 11).unwrap();
        let mut last = clock.next_arrival();
        for _ in 0..1000 {
            clock.advance();
            assert!(clock.next_arrival() > last);
            last = clock.next_arrival();
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ArrivalClock::with_seed(3.0, 42).unwrap();
        let mut b = ArrivalClock::with_seed(3.0, 42).unwrap();
        for _ in 0..100 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn test_gaps_are_exponential() {
        let rate = 4.0;
        let mut clock = ArrivalClock::with_seed(rate, 2024).unwrap();
        let n = 200_000;
        let gaps: Vec<f64> = (0..n).map(|_| clock.advance()).collect();

        let mean = gaps.iter().sum::<f64>() / n as f64;
        let var = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n as f64;

        // Mean 1/rate, variance 1/rate^2.
        assert!((mean - 1.0 / rate).abs() < 0.01, "mean {mean}");
        assert!((var - 1.0 / (rate * rate)).abs() < 0.01, "var {var}");

        // Memorylessness spot check: P(gap > 1/rate) = e^-1.
        let tail = gaps.iter().filter(|g| **g > 1.0 / rate).count() as f64 / n as f64;
        assert!((tail - (-1.0f64).exp()).abs() < 0.01, "tail {tail}");
    }
}
