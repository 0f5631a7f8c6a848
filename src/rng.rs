//! The single sequential PRNG stream that drives momenta, the
//! pseudofermion heatbath, and Metropolis accept/reject (spec.md §5).
//!
//! A single `StdRng` is reproducible for a fixed seed and independent
//! of any within-kernel thread-pool parallelism, since none of the
//! parallel kernels in this crate draw random numbers.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::FRAC_1_SQRT_2;

pub struct RngStream {
    rng: StdRng,
}

impl RngStream {
    pub fn new(seed: u64) -> Self {
        RngStream {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw on `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Standard normal draw, `density ~ exp(-x^2/2)`.
    pub fn gaussian_real(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Complex Gaussian draw with `E[|z|^2] = 1`, i.e. each of the real
    /// and imaginary parts independently `N(0, 1/2)`, matching
    /// spec.md §4.F's `density ~ exp(-|chi|^2)` pseudofermion heatbath.
    pub fn gaussian_complex(&mut self) -> Complex64 {
        let re: f64 = self.rng.sample(StandardNormal);
        let im: f64 = self.rng.sample(StandardNormal);
        Complex64::new(re * FRAC_1_SQRT_2, im * FRAC_1_SQRT_2)
    }

    /// Metropolis test: returns `true` (accept) when `u <= exp(-delta_h)`.
    pub fn metropolis_accept(&mut self, delta_h: f64) -> bool {
        let u: f64 = self.rng.gen();
        u <= (-delta_h).exp()
    }
}
