use approx::assert_relative_eq;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schwinger_hmc::dirac::apply_ddag_d;
use schwinger_hmc::spinor::{caxpby, norm2, SpinorField};
use schwinger_hmc::{Context, GaugeField, Params};

fn random_gauge(lx: usize, ly: usize, seed: u64) -> GaugeField {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut u = GaugeField::cold(lx, ly);
    for x in 0..lx {
        for y in 0..ly {
            for mu in 0..2 {
                let theta = rng.gen::<f64>() * std::f64::consts::TAU;
                u.set(x, y, mu, Complex64::from_polar(1.0, theta));
            }
        }
    }
    u
}

fn random_spinor(lx: usize, ly: usize, seed: u64) -> SpinorField {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut f = SpinorField::zeros(lx, ly);
    for x in 0..lx {
        for y in 0..ly {
            for s in 0..2 {
                f.set(x, y, s, Complex64::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5));
            }
        }
    }
    f
}

#[test]
fn cg_inverts_ddag_d() {
    let lx = 4;
    let ly = 4;
    let u = random_gauge(lx, ly, 42);
    let b = random_spinor(lx, ly, 43);

    let mut params = Params::default();
    params.lx = lx;
    params.ly = ly;
    params.m = 0.2;
    params.eps = 1e-10;
    params.max_iter_cg = 500;
    let mut ctx = Context::new(params);

    let mut x = SpinorField::zeros(lx, ly);
    let iters = schwinger_hmc::cg::solve(&mut ctx, &u, &b, &mut x).expect("cg should converge");
    assert!(iters > 0);

    let mut tmp = SpinorField::zeros(lx, ly);
    let mut scratch = SpinorField::zeros(lx, ly);
    let mut ax = SpinorField::zeros(lx, ly);
    apply_ddag_d(&mut ax, &x, &u, 0.2, &mut tmp, &mut scratch);

    let mut residual = SpinorField::zeros(lx, ly);
    caxpby(Complex64::new(1.0, 0.0), &b, Complex64::new(-1.0, 0.0), &ax, &mut residual);

    let relerr = (norm2(&residual) / norm2(&b)).sqrt();
    assert_relative_eq!(relerr, 0.0, epsilon = 1e-8);
}

#[test]
fn cg_tolerates_zero_initial_guess() {
    let lx = 3;
    let ly = 3;
    let u = GaugeField::cold(lx, ly);
    let b = random_spinor(lx, ly, 99);

    let mut params = Params::default();
    params.lx = lx;
    params.ly = ly;
    let mut ctx = Context::new(params);

    let mut x = SpinorField::zeros(lx, ly);
    let result = schwinger_hmc::cg::solve(&mut ctx, &u, &b, &mut x);
    assert!(result.is_ok());
}
