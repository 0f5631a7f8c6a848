//! The Wilson Dirac operator and its Hermitian/adjoint/normal variants
//! (spec.md §4.B).
//!
//! Wilson parameter `r = 1` throughout, matching the hardcoded `r`
//! in `original_source/wilson/2D/main.cpp::forceD`. The forward/backward
//! projectors are `P±_mu = (r ∓ sigma_mu) / 2` with `sigma_0` the
//! off-diagonal swap and `sigma_1` the Pauli-Y-like off-diagonal `±i`
//! matrix, matching spec.md §4.B's explicit forward forms (the
//! backward forms follow by flipping the sign of the `sigma_mu` term).

use crate::lattice::{next, prev, GaugeField};
use crate::spinor::SpinorField;
use num_complex::Complex64;
use rayon::prelude::*;

const WILSON_R: f64 = 1.0;

/// Below this many sites, `apply_d` runs sequentially: thread-pool
/// dispatch overhead would dominate on small test lattices (mirrors
/// `spinor::PARALLEL_THRESHOLD`).
const PARALLEL_THRESHOLD: usize = 2048;

/// `P+_0 = (r - sigma_x)/2`, also used directly by the fermion force
/// (spec.md §4.D, "same 2x2 projectors used by the Dirac operator").
#[inline]
pub(crate) fn proj_plus_x(a: Complex64, b: Complex64) -> (Complex64, Complex64) {
    (
        (WILSON_R * a - b) * 0.5,
        (-a + WILSON_R * b) * 0.5,
    )
}

#[inline]
pub(crate) fn proj_minus_x(a: Complex64, b: Complex64) -> (Complex64, Complex64) {
    (
        (WILSON_R * a + b) * 0.5,
        (a + WILSON_R * b) * 0.5,
    )
}

#[inline]
pub(crate) fn proj_plus_y(a: Complex64, b: Complex64) -> (Complex64, Complex64) {
    let i = Complex64::new(0.0, 1.0);
    (
        (WILSON_R * a + i * b) * 0.5,
        (-i * a + WILSON_R * b) * 0.5,
    )
}

#[inline]
pub(crate) fn proj_minus_y(a: Complex64, b: Complex64) -> (Complex64, Complex64) {
    let i = Complex64::new(0.0, 1.0);
    (
        (WILSON_R * a - i * b) * 0.5,
        (i * a + WILSON_R * b) * 0.5,
    )
}

/// Per-site contribution to `D psi`, shared by `apply_d`'s sequential
/// and rayon-parallel branches.
#[inline]
fn apply_d_site(psi: &SpinorField, u: &GaugeField, m: f64, x: usize, y: usize, lx: usize, ly: usize) -> (Complex64, Complex64) {
    let xp1 = next(x, lx);
    let xm1 = prev(x, lx);
    let yp1 = next(y, ly);
    let ym1 = prev(y, ly);

    let u0 = u.get(x, y, 0);
    let (fa, fb) = (psi.get(xp1, y, 0), psi.get(xp1, y, 1));
    let (p0a, p0b) = proj_plus_x(u0 * fa, u0 * fb);

    let u0m = u.get(xm1, y, 0).conj();
    let (ba, bb) = (psi.get(xm1, y, 0), psi.get(xm1, y, 1));
    let (m0a, m0b) = proj_minus_x(u0m * ba, u0m * bb);

    let u1 = u.get(x, y, 1);
    let (fc, fd) = (psi.get(x, yp1, 0), psi.get(x, yp1, 1));
    let (p1a, p1b) = proj_plus_y(u1 * fc, u1 * fd);

    let u1m = u.get(x, ym1, 1).conj();
    let (bc, bd) = (psi.get(x, ym1, 0), psi.get(x, ym1, 1));
    let (m1a, m1b) = proj_minus_y(u1m * bc, u1m * bd);

    let diag = m + 2.0;
    (
        diag * psi.get(x, y, 0) - (p0a + m0a + p1a + m1a),
        diag * psi.get(x, y, 1) - (p0b + m0b + p1b + m1b),
    )
}

/// `out <- D(in)` with Wilson mass `m`, gauge field `u`:
///
/// `(D psi)(x) = (m+2) psi(x) - sum_mu [ P+_mu(U_mu(x) psi(x+muhat))
///                                     + P-_mu(U_mu(x-muhat)^dagger psi(x-muhat)) ]`
pub fn apply_d(out: &mut SpinorField, psi: &SpinorField, u: &GaugeField, m: f64) {
    let lx = u.lx();
    let ly = u.ly();

    if lx * ly >= PARALLEL_THRESHOLD {
        let out_slice = out.as_slice_mut();
        out_slice
            .par_chunks_mut(2)
            .enumerate()
            .for_each(|(i, chunk)| {
                let x = i / ly;
                let y = i % ly;
                let (v0, v1) = apply_d_site(psi, u, m, x, y, lx, ly);
                chunk[0] = v0;
                chunk[1] = v1;
            });
    } else {
        for x in 0..lx {
            for y in 0..ly {
                let (v0, v1) = apply_d_site(psi, u, m, x, y, lx, ly);
                out.set(x, y, 0, v0);
                out.set(x, y, 1, v1);
            }
        }
    }
}

/// Applies `gamma_3 = diag(1, -1)` in place.
fn apply_g3(field: &mut SpinorField, lx: usize, ly: usize) {
    for x in 0..lx {
        for y in 0..ly {
            let v = field.get(x, y, 1);
            field.set(x, y, 1, -v);
        }
    }
}

/// `out <- gamma_3 D(in)`, the Hermitian operator used to build the
/// pseudofermion.
pub fn apply_g3d(out: &mut SpinorField, psi: &SpinorField, u: &GaugeField, m: f64) {
    apply_d(out, psi, u, m);
    apply_g3(out, u.lx(), u.ly());
}

/// `out <- D^dagger(in)`, implemented as `gamma_3 D gamma_3` (spec.md §4.B).
pub fn apply_ddag(out: &mut SpinorField, psi: &SpinorField, u: &GaugeField, m: f64, scratch: &mut SpinorField) {
    crate::spinor::copy(scratch, psi);
    apply_g3(scratch, u.lx(), u.ly());
    apply_d(out, scratch, u, m);
    apply_g3(out, u.lx(), u.ly());
}

/// `out <- D^dagger D (in)`, the positive-definite normal operator the
/// CG solver needs.
pub fn apply_ddag_d(
    out: &mut SpinorField,
    psi: &SpinorField,
    u: &GaugeField,
    m: f64,
    tmp: &mut SpinorField,
    scratch: &mut SpinorField,
) {
    apply_d(tmp, psi, u, m);
    apply_ddag(out, tmp, u, m, scratch);
}
