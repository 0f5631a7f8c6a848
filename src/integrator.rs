//! Leapfrog molecular-dynamics integrator (spec.md §4.E). Forces are
//! recomputed from scratch at every step; nothing is cached between
//! steps.

use crate::context::Context;
use crate::error::Result;
use crate::force::{fermion_force, gauge_force};
use crate::lattice::{GaugeField, MomentumField};
use crate::spinor::SpinorField;

/// `out <- f_U(u) - f_D(ctx, u, phi)`. Returns the CG iteration count
/// (0 when `dynamic = false`).
fn total_force(
    ctx: &mut Context,
    u: &GaugeField,
    phi: &SpinorField,
    out: &mut crate::lattice::RealField,
) -> Result<usize> {
    let mut fu = ctx.pool.acquire_real();
    let mut fd = ctx.pool.acquire_real();
    gauge_force(&mut fu, u, ctx.params.beta);
    let iters = fermion_force(ctx, u, phi, &mut fd)?;

    for x in 0..u.lx() {
        for y in 0..u.ly() {
            for mu in 0..2 {
                out.set(x, y, mu, fu.get(x, y, mu) - fd.get(x, y, mu));
            }
        }
    }
    Ok(iters)
}

/// Runs one trajectory of length `tau` in `nstep` leapfrog steps,
/// mutating `u` and `mom` in place. Returns the total CG iteration
/// count spent on force evaluations, for diagnostics.
pub fn trajectory(
    ctx: &mut Context,
    u: &mut GaugeField,
    mom: &mut MomentumField,
    phi: &SpinorField,
) -> Result<usize> {
    let dtau = ctx.params.dtau();
    let nstep = ctx.params.nstep;
    let mut total_cg_iters = 0usize;

    let mut diff = ctx.pool.acquire_real();

    total_cg_iters += total_force(ctx, u, phi, &mut diff)?;
    mom.axpy(-0.5 * dtau, &diff);

    for _ in 0..nstep.saturating_sub(1) {
        u.drift(mom, dtau);
        total_cg_iters += total_force(ctx, u, phi, &mut diff)?;
        mom.axpy(-dtau, &diff);
    }

    u.drift(mom, dtau);
    total_cg_iters += total_force(ctx, u, phi, &mut diff)?;
    mom.axpy(-0.5 * dtau, &diff);

    Ok(total_cg_iters)
}
