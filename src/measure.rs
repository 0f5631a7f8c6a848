//! Measurement collaborators (spec.md §4.H): functions of the gauge
//! field alone, called at the driver's `skip` cadence. Grounded in
//! `original_source/wilson/2D/main.cpp`'s inline measurement call
//! sites; the dedicated `measurementHelpers.h` was not retained in
//! `original_source`, so `pion_correlator` is stubbed rather than
//! guessed.

use crate::error::{Error, Result};
use crate::lattice::GaugeField;
use num_complex::Complex64;
use std::f64::consts::PI;

/// `(1 / LX*LY) sum_x Re(U_P(x))`.
pub fn mean_plaquette(u: &GaugeField) -> f64 {
    let mut s = 0.0;
    for x in 0..u.lx() {
        for y in 0..u.ly() {
            s += u.plaquette(x, y).re;
        }
    }
    s / (u.lx() * u.ly()) as f64
}

/// Winding-number estimator: `sum_x arg(U_P(x)) / 2*pi`, matching
/// `main.cpp`'s `round(top)` bookkeeping convention at the caller.
pub fn topological_charge(u: &GaugeField) -> f64 {
    let mut s = 0.0;
    for x in 0..u.lx() {
        for y in 0..u.ly() {
            s += u.plaquette(x, y).arg();
        }
    }
    s / (2.0 * PI)
}

/// Polyakov loops: the product of `U_0(x, y)` winding once around `LX`
/// at fixed `y`, averaged over `y`, for each of the `LX/2` loop sizes
/// `calcPolyakovLoops` reports.
pub fn polyakov_loops(u: &GaugeField) -> Vec<Complex64> {
    let lx = u.lx();
    let ly = u.ly();
    let mut out = Vec::with_capacity(lx / 2);
    for size in 1..=(lx / 2).max(1) {
        let mut total = Complex64::new(0.0, 0.0);
        for y in 0..ly {
            let mut loop_val = Complex64::new(1.0, 0.0);
            for dx in 0..size {
                loop_val *= u.get(dx % lx, y, 0);
            }
            total += loop_val;
        }
        out.push(total / ly as f64);
    }
    out
}

/// Rectangular Wilson loops `W(r, t)` for `r, t` in `1..=LX/2` and
/// `1..=LY/2`, matching `calcWilsonLoops`'s sizing.
pub fn wilson_loops(u: &GaugeField) -> ndarray::Array2<Complex64> {
    let lx = u.lx();
    let ly = u.ly();
    let rmax = (lx / 2).max(1);
    let tmax = (ly / 2).max(1);
    let mut out = ndarray::Array2::<Complex64>::zeros((rmax, tmax));
    for r in 1..=rmax {
        for t in 1..=tmax {
            let mut total = Complex64::new(0.0, 0.0);
            for x0 in 0..lx {
                for y0 in 0..ly {
                    let mut w = Complex64::new(1.0, 0.0);
                    for dx in 0..r {
                        w *= u.get((x0 + dx) % lx, y0, 0);
                    }
                    for dy in 0..t {
                        w *= u.get((x0 + r) % lx, (y0 + dy) % ly, 1);
                    }
                    for dx in (0..r).rev() {
                        w *= u.get((x0 + dx) % lx, (y0 + t) % ly, 0).conj();
                    }
                    for dy in (0..t).rev() {
                        w *= u.get(x0, (y0 + dy) % ly, 1).conj();
                    }
                    total += w;
                }
            }
            out[[r - 1, t - 1]] = total / (lx * ly) as f64;
        }
    }
    out
}

/// Creutz ratio `chi(r, t) = -ln( W(r,t) W(r-1,t-1) / (W(r-1,t) W(r,t-1)) )`,
/// the discrete string-tension estimator `sigma[size]` builds from
/// `calcWilsonLoops`'s table.
pub fn creutz_ratio(loops: &ndarray::Array2<Complex64>, r: usize, t: usize) -> Option<f64> {
    if r == 0 || t == 0 || r > loops.nrows() || t > loops.ncols() {
        return None;
    }
    let w = |ri: usize, ti: usize| -> Option<f64> {
        if ri == 0 || ti == 0 {
            Some(1.0)
        } else {
            loops.get((ri - 1, ti - 1)).map(|c| c.re)
        }
    };
    let (wrt, wrm1tm1, wrm1t, wrtm1) = (w(r, t)?, w(r - 1, t - 1)?, w(r - 1, t)?, w(r, t - 1)?);
    let ratio = (wrt * wrm1tm1) / (wrm1t * wrtm1);
    if ratio <= 0.0 {
        None
    } else {
        Some(-ratio.ln())
    }
}

/// Out of scope: a pion correlator needs a point-to-all propagator
/// solve that `original_source`'s kept files never expose a body for.
pub fn pion_correlator(_u: &GaugeField) -> Result<Vec<f64>> {
    Err(Error::Unsupported(
        "pion correlator requires a point-to-all propagator solve not present in the retained source",
    ))
}
