//! Conjugate-gradient inversion of `D^dagger D` (spec.md §4.C).

use crate::context::Context;
use crate::dirac::apply_ddag_d;
use crate::error::{Error, Result};
use crate::lattice::GaugeField;
use crate::spinor::{axpy, caxpby, dot, norm2, xpaypbz, SpinorField};
use num_complex::Complex64;

/// Solves `(D^dagger D) x = b` in place, starting from `x` (which may
/// already hold a warm-start guess, including all zeros). Returns the
/// iteration count on success; `Error::NonConvergence` once
/// `params.max_iter_cg` is exhausted without reaching `params.eps`
/// relative to the initial residual norm.
pub fn solve(ctx: &mut Context, u: &GaugeField, b: &SpinorField, x: &mut SpinorField) -> Result<usize> {
    let m = ctx.params.m;
    let eps = ctx.params.eps;
    let max_iter = ctx.params.max_iter_cg;

    let mut tmp = ctx.pool.acquire_spinor();
    let mut scratch = ctx.pool.acquire_spinor();
    let mut r = ctx.pool.acquire_spinor();
    let mut p = ctx.pool.acquire_spinor();
    let mut p_next = ctx.pool.acquire_spinor();
    let mut ap = ctx.pool.acquire_spinor();

    // r <- b - A x
    apply_ddag_d(&mut ap, x, u, m, &mut tmp, &mut scratch);
    caxpby(Complex64::new(1.0, 0.0), b, Complex64::new(-1.0, 0.0), &ap, &mut r);
    crate::spinor::copy(&mut p, &r);

    let b_norm2 = norm2(b).max(f64::MIN_POSITIVE);
    let mut r_norm2 = norm2(&r);

    if (r_norm2 / b_norm2).sqrt() < eps {
        return Ok(0);
    }

    for iter in 1..=max_iter {
        apply_ddag_d(&mut ap, &p, u, m, &mut tmp, &mut scratch);
        let p_ap = dot(&p, &ap).re;
        let alpha = r_norm2 / p_ap;

        axpy(Complex64::new(alpha, 0.0), &p, x);
        axpy(Complex64::new(-alpha, 0.0), &ap, &mut r);

        let r_norm2_new = norm2(&r);
        let residual = (r_norm2_new / b_norm2).sqrt();
        if residual < eps {
            return Ok(iter);
        }

        let beta = r_norm2_new / r_norm2;
        // p <- r + beta * p, via the fused kernel: p and r/p alias, so the
        // update lands in a second buffer (`b = 0` discards its stale
        // contents) and is copied back rather than written in place.
        xpaypbz(&r, beta, &p, 0.0, &mut p_next);
        crate::spinor::copy(&mut p, &p_next);
        r_norm2 = r_norm2_new;
    }

    Err(Error::NonConvergence {
        iters: max_iter,
        residual: (r_norm2 / b_norm2).sqrt(),
    })
}
