//! Gauge and fermion forces driving the leapfrog update (spec.md §4.D).

use crate::context::Context;
use crate::dirac::{apply_g3d, proj_minus_x, proj_minus_y, proj_plus_x, proj_plus_y};
use crate::lattice::{next, prev, GaugeField, RealField};
use crate::spinor::SpinorField;
use num_complex::Complex64;

/// `force[x,y,mu] <- beta * Im(plaquette)`, summed over the two
/// plaquettes touching that link. Both terms reduce to differences of
/// `GaugeField::plaquette` thanks to commutativity of the link products.
pub fn gauge_force(force: &mut RealField, u: &GaugeField, beta: f64) {
    let lx = u.lx();
    let ly = u.ly();
    for x in 0..lx {
        let xm1 = prev(x, lx);
        for y in 0..ly {
            let ym1 = prev(y, ly);
            let plaq_xy = u.plaquette(x, y).im;
            let plaq_x_ym1 = u.plaquette(x, ym1).im;
            let plaq_xm1_y = u.plaquette(xm1, y).im;

            force.set(x, y, 0, beta * (plaq_xy - plaq_x_ym1));
            force.set(x, y, 1, beta * (plaq_xm1_y - plaq_xy));
        }
    }
}

/// `sum_s conj(a_s) * b_s` for the 2-component spinor pieces used in
/// the force contraction.
#[inline]
fn spinor_dot2(a0: Complex64, a1: Complex64, b0: Complex64, b1: Complex64) -> Complex64 {
    a0.conj() * b0 + a1.conj() * b1
}

/// Fermion force from pseudofermion `phi`: inverts `D^dagger D`, forms
/// `chi = gamma_3 D psi`, and contracts against the Dirac projectors.
/// Zero (and CG skipped) when `dynamic = false`.
pub fn fermion_force(
    ctx: &mut Context,
    u: &GaugeField,
    phi: &SpinorField,
    force: &mut RealField,
) -> crate::error::Result<usize> {
    if !ctx.params.dynamic {
        force.zero();
        return Ok(0);
    }

    let mut psi = ctx.pool.acquire_spinor();
    let iters = crate::cg::solve(ctx, u, phi, &mut psi)?;

    let mut chi = ctx.pool.acquire_spinor();
    apply_g3d(&mut chi, &psi, u, ctx.params.m);

    let lx = u.lx();
    let ly = u.ly();
    for x in 0..lx {
        let xp1 = next(x, lx);
        for y in 0..ly {
            let yp1 = next(y, ly);

            // mu = 0
            let chi_x = (chi.get(x, y, 0), chi.get(x, y, 1));
            let (p0, p1) = proj_plus_x(chi_x.0, chi_x.1);
            let term1 = spinor_dot2(psi.get(xp1, y, 0), psi.get(xp1, y, 1), p0, p1);

            let chi_xp1 = (chi.get(xp1, y, 0), chi.get(xp1, y, 1));
            let (q0, q1) = proj_minus_x(chi_xp1.0, chi_xp1.1);
            let term2 = spinor_dot2(psi.get(x, y, 0), psi.get(x, y, 1), q0, q1);

            let u0 = u.get(x, y, 0);
            let i = Complex64::new(0.0, 1.0);
            let val0 = i * (u0.conj() * term1 - u0 * term2);
            force.set(x, y, 0, val0.re);

            // mu = 1
            let chi_x = (chi.get(x, y, 0), chi.get(x, y, 1));
            let (p0, p1) = proj_plus_y(chi_x.0, chi_x.1);
            let term1 = spinor_dot2(psi.get(x, yp1, 0), psi.get(x, yp1, 1), p0, p1);

            let chi_yp1 = (chi.get(x, yp1, 0), chi.get(x, yp1, 1));
            let (q0, q1) = proj_minus_y(chi_yp1.0, chi_yp1.1);
            let term2 = spinor_dot2(psi.get(x, y, 0), psi.get(x, y, 1), q0, q1);

            let u1 = u.get(x, y, 1);
            let val1 = i * (u1.conj() * term1 - u1 * term2);
            force.set(x, y, 1, val1.re);
        }
    }

    Ok(iters)
}
