//! Lattice primitives: periodic 2D index arithmetic and the gauge and
//! momentum field containers (spec.md §4.A, §3).

use crate::error::{Error, Result};
use crate::rng::RngStream;
use ndarray::Array3;
use num_complex::Complex64;

/// Periodic successor index.
#[inline]
pub fn next(i: usize, size: usize) -> usize {
    if i + 1 == size {
        0
    } else {
        i + 1
    }
}

/// Periodic predecessor index.
#[inline]
pub fn prev(i: usize, size: usize) -> usize {
    if i == 0 {
        size - 1
    } else {
        i - 1
    }
}

/// Compact U(1) gauge field `U_mu(x,y) = exp(i theta_mu(x,y))`, stored
/// as a row-major flat `(LX, LY, 2)` array of unit-modulus complex
/// numbers (ndarray's default layout is contiguous C-order, so this is
/// the flat-storage-plus-index-function layout Design Notes calls for).
#[derive(Clone, Debug)]
pub struct GaugeField {
    u: Array3<Complex64>,
    lx: usize,
    ly: usize,
}

impl GaugeField {
    pub fn lx(&self) -> usize {
        self.lx
    }
    pub fn ly(&self) -> usize {
        self.ly
    }

    /// Cold start: every link set to unity. `measPlaq == 1` exactly,
    /// matching spec.md §8's free-field scenario.
    pub fn cold(lx: usize, ly: usize) -> Self {
        GaugeField {
            u: Array3::from_elem((lx, ly, 2), Complex64::new(1.0, 0.0)),
            lx,
            ly,
        }
    }

    /// Hot start with small random phases, following
    /// `original_source::gaussStart`: `theta ~ sqrt(1/beta) * U(0,1)`.
    pub fn hot(lx: usize, ly: usize, beta: f64, rng: &mut RngStream) -> Self {
        let mut u = Array3::from_elem((lx, ly, 2), Complex64::new(1.0, 0.0));
        let scale = (1.0 / beta).sqrt();
        for x in 0..lx {
            for y in 0..ly {
                for mu in 0..2 {
                    let theta = scale * rng.uniform();
                    u[[x, y, mu]] = Complex64::from_polar(1.0, theta);
                }
            }
        }
        GaugeField { u, lx, ly }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, mu: usize) -> Complex64 {
        self.u[[x, y, mu]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, mu: usize, val: Complex64) {
        self.u[[x, y, mu]] = val;
    }

    /// Applies the exponential link update `U <- exp(i*dtau*pi) * U`,
    /// which preserves unitarity exactly up to floating rounding
    /// (spec.md §4.E).
    pub fn drift(&mut self, mom: &MomentumField, dtau: f64) {
        for x in 0..self.lx {
            for y in 0..self.ly {
                for mu in 0..2 {
                    let phase = mom.get(x, y, mu) * dtau;
                    self.u[[x, y, mu]] *= Complex64::from_polar(1.0, phase);
                }
            }
        }
    }

    pub fn copy_from(&mut self, other: &GaugeField) {
        self.u.assign(&other.u);
    }

    /// The plaquette at site `(x,y)`: `U_0(x,y) U_1(x+1,y) U_0(x,y+1)^* U_1(x,y)^*`.
    #[inline]
    pub fn plaquette(&self, x: usize, y: usize) -> Complex64 {
        let xp1 = next(x, self.lx);
        let yp1 = next(y, self.ly);
        self.get(x, y, 0) * self.get(xp1, y, 1) * self.get(x, yp1, 0).conj() * self.get(x, y, 1).conj()
    }

    /// Unitarity invariant: `max |U| - 1| < tol` (spec.md §8).
    pub fn check_unitarity(&self, tol: f64) -> Result<()> {
        for v in self.u.iter() {
            if (v.norm() - 1.0).abs() >= tol {
                return Err(Error::InvariantViolation(format!(
                    "non-unit link: |U| = {}",
                    v.norm()
                )));
            }
        }
        Ok(())
    }
}

/// Real momentum field conjugate to the gauge phase, `(LX, LY, 2)`.
#[derive(Clone, Debug)]
pub struct MomentumField {
    pi: Array3<f64>,
    lx: usize,
    ly: usize,
}

impl MomentumField {
    pub fn zeros(lx: usize, ly: usize) -> Self {
        MomentumField {
            pi: Array3::zeros((lx, ly, 2)),
            lx,
            ly,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, mu: usize) -> f64 {
        self.pi[[x, y, mu]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, mu: usize, val: f64) {
        self.pi[[x, y, mu]] = val;
    }

    pub fn zero(&mut self) {
        self.pi.fill(0.0);
    }

    pub fn negate(&mut self) {
        self.pi.mapv_inplace(|v| -v);
    }

    /// Heatbath: each component drawn independently from a unit-variance
    /// real Gaussian (spec.md §4.F step 2).
    pub fn heatbath(&mut self, rng: &mut RngStream) {
        for x in 0..self.lx {
            for y in 0..self.ly {
                for mu in 0..2 {
                    self.pi[[x, y, mu]] = rng.gaussian_real();
                }
            }
        }
    }

    /// `pi += a * force` elementwise (used by the leapfrog kick step).
    pub fn axpy(&mut self, a: f64, force: &RealField) {
        for x in 0..self.lx {
            for y in 0..self.ly {
                for mu in 0..2 {
                    self.pi[[x, y, mu]] += a * force.get(x, y, mu);
                }
            }
        }
    }

    /// `1/2 sum pi^2`, the kinetic contribution to the Hamiltonian.
    pub fn kinetic_energy(&self) -> f64 {
        self.pi.iter().map(|v| 0.5 * v * v).sum()
    }
}

/// Real-scalar field over links, `(LX, LY, 2)`, used for forces.
#[derive(Clone, Debug)]
pub struct RealField {
    f: Array3<f64>,
    lx: usize,
    ly: usize,
}

impl RealField {
    pub fn zeros(lx: usize, ly: usize) -> Self {
        RealField {
            f: Array3::zeros((lx, ly, 2)),
            lx,
            ly,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, mu: usize) -> f64 {
        self.f[[x, y, mu]]
    }

    #[inline]
    pub fn add(&mut self, x: usize, y: usize, mu: usize, val: f64) {
        self.f[[x, y, mu]] += val;
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, mu: usize, val: f64) {
        self.f[[x, y, mu]] = val;
    }

    pub fn zero(&mut self) {
        self.f.fill(0.0);
    }

    pub fn lx(&self) -> usize {
        self.lx
    }
    pub fn ly(&self) -> usize {
        self.ly
    }
}
