//! Hybrid Monte Carlo driver (spec.md §4.F): momentum and pseudofermion
//! heatbath, leapfrog trajectory, Metropolis accept/reject.

use crate::action::{gauge_action, kinetic_energy};
use crate::context::Context;
use crate::dirac::apply_g3d;
use crate::error::Result;
use crate::integrator::trajectory;
use crate::lattice::{GaugeField, MomentumField};
use crate::spinor::{dot, norm2, SpinorField};

/// Outcome of one HMC iteration, for the driver's running diagnostics.
pub struct IterationResult {
    pub accepted: bool,
    /// `H_new - H_old`, only meaningful once `iter >= therm`.
    pub delta_h: f64,
    pub cg_iters: usize,
}

/// Runs one HMC iteration in place on `u`. `iter` is the 0-indexed
/// trajectory counter, used to gate thermalization (spec.md §4.F).
pub fn run_iteration(ctx: &mut Context, u: &mut GaugeField, iter: usize) -> Result<IterationResult> {
    let lx = u.lx();
    let ly = u.ly();
    let beta = ctx.params.beta;
    let therm = ctx.params.therm;
    let dynamic = ctx.params.dynamic;

    let u_old = u.clone();
    let mut mom = MomentumField::zeros(lx, ly);
    mom.heatbath(&mut ctx.rng);

    let mut chi = SpinorField::zeros(lx, ly);
    let mut phi = SpinorField::zeros(lx, ly);
    if dynamic {
        for x in 0..lx {
            for y in 0..ly {
                for s in 0..2 {
                    chi.set(x, y, s, ctx.rng.gaussian_complex());
                }
            }
        }
        apply_g3d(&mut phi, &chi, u, ctx.params.m);
    }

    let track_energy = iter >= therm;
    let h_old = if track_energy {
        let fermion = if dynamic { norm2(&chi) } else { 0.0 };
        kinetic_energy(&mom) + gauge_action(u, beta) + fermion
    } else {
        0.0
    };

    let cg_iters = trajectory(ctx, u, &mut mom, &phi)?;

    if !track_energy {
        // Thermalization: always accept, no energy bookkeeping.
        return Ok(IterationResult {
            accepted: true,
            delta_h: 0.0,
            cg_iters,
        });
    }

    let fermion_new = if dynamic {
        let mut psi = ctx.pool.acquire_spinor();
        crate::cg::solve(ctx, u, &phi, &mut psi)?;
        dot(&phi, &psi).re
    } else {
        0.0
    };
    let h_new = kinetic_energy(&mom) + gauge_action(u, beta) + fermion_new;
    let delta_h = h_new - h_old;

    let accepted = ctx.rng.metropolis_accept(delta_h);
    if !accepted {
        u.copy_from(&u_old);
    }

    Ok(IterationResult {
        accepted,
        delta_h,
        cg_iters,
    })
}
