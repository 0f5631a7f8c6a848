use approx::assert_relative_eq;
use schwinger_hmc::integrator::trajectory;
use schwinger_hmc::spinor::SpinorField;
use schwinger_hmc::{Context, GaugeField, MomentumField, Params};

#[test]
fn leapfrog_is_approximately_reversible_quenched() {
    let lx = 4;
    let ly = 4;
    let mut params = Params::default();
    params.lx = lx;
    params.ly = ly;
    params.dynamic = false;
    params.beta = 5.0;
    params.nstep = 20;
    params.tau = 1.0;
    let mut ctx = Context::new(params);

    let mut u = GaugeField::hot(lx, ly, 5.0, &mut ctx.rng);
    let mut mom = MomentumField::zeros(lx, ly);
    mom.heatbath(&mut ctx.rng);

    let u0 = u.clone();
    let mom0 = mom.clone();

    let phi = SpinorField::zeros(lx, ly);
    trajectory(&mut ctx, &mut u, &mut mom, &phi).unwrap();
    mom.negate();
    trajectory(&mut ctx, &mut u, &mut mom, &phi).unwrap();

    let mut max_du = 0.0f64;
    for x in 0..lx {
        for y in 0..ly {
            for mu in 0..2 {
                let d = (u.get(x, y, mu) - u0.get(x, y, mu)).norm();
                max_du = max_du.max(d);
            }
        }
    }
    assert!(max_du < 1e-6, "round-trip drift too large: {max_du}");

    let mut max_dpi = 0.0f64;
    for x in 0..lx {
        for y in 0..ly {
            for mu in 0..2 {
                let d = (mom.get(x, y, mu) + mom0.get(x, y, mu)).abs();
                max_dpi = max_dpi.max(d);
            }
        }
    }
    assert!(max_dpi < 1e-6, "round-trip momentum drift too large: {max_dpi}");
}

#[test]
fn quenched_hmc_keeps_links_unitary() {
    use schwinger_hmc::hmc::run_iteration;

    let lx = 4;
    let ly = 4;
    let mut params = Params::default();
    params.lx = lx;
    params.ly = ly;
    params.dynamic = false;
    params.beta = 3.0;
    params.nstep = 8;
    params.tau = 1.0;
    params.therm = 2;
    let mut ctx = Context::new(params.clone());

    let mut u = GaugeField::hot(lx, ly, params.beta, &mut ctx.rng);
    for iter in 0..5 {
        run_iteration(&mut ctx, &mut u, iter).unwrap();
        u.check_unitarity(1e-9).unwrap();
    }
}

#[test]
fn metropolis_accept_is_deterministic_for_fixed_seed() {
    let mut ctx_a = Context::new(Params::default());
    let mut ctx_b = Context::new(Params::default());
    for dh in [-1.0, 0.0, 0.5, 2.0] {
        assert_relative_eq!(
            ctx_a.rng.metropolis_accept(dh) as u8 as f64,
            ctx_b.rng.metropolis_accept(dh) as u8 as f64,
            epsilon = 0.0
        );
    }
}
