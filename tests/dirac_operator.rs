use approx::assert_relative_eq;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schwinger_hmc::dirac::{apply_d, apply_ddag, apply_g3d};
use schwinger_hmc::spinor::{dot, SpinorField};
use schwinger_hmc::GaugeField;

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
fn dirac_adjoint_identity() {
    let u = random_gauge(6, 6, 11);
    let psi = random_spinor(6, 6, 12);
    let phi = random_spinor(6, 6, 13);
    let m = 0.05;

    let mut d_psi = SpinorField::zeros(6, 6);
    apply_d(&mut d_psi, &psi, &u, m);

    let mut scratch = SpinorField::zeros(6, 6);
    let mut ddag_phi = SpinorField::zeros(6, 6);
    apply_ddag(&mut ddag_phi, &phi, &u, m, &mut scratch);

    let lhs = dot(&d_psi, &phi);
    let rhs = dot(&psi, &ddag_phi);
    assert_relative_eq!(lhs.re, rhs.re, epsilon = 1e-10);
    assert_relative_eq!(lhs.im, rhs.im, epsilon = 1e-10);
}

#[test]
fn gamma3_d_is_hermitian() {
    let u = random_gauge(6, 4, 21);
    let psi = random_spinor(6, 4, 22);
    let phi = random_spinor(6, 4, 23);
    let m = 0.1;

    let mut g3d_psi = SpinorField::zeros(6, 4);
    apply_g3d(&mut g3d_psi, &psi, &u, m);
    let mut g3d_phi = SpinorField::zeros(6, 4);
    apply_g3d(&mut g3d_phi, &phi, &u, m);

    let lhs = dot(&psi, &g3d_phi);
    let rhs = dot(&phi, &g3d_psi).conj();
    assert_relative_eq!(lhs.re, rhs.re, epsilon = 1e-10);
    assert_relative_eq!(lhs.im, rhs.im, epsilon = 1e-10);
}

#[test]
fn free_field_dirac_is_diagonal_plus_mass() {
    let u = GaugeField::cold(4, 4);
    let m = 0.3;
    let mut psi = SpinorField::zeros(4, 4);
    psi.set(0, 0, 0, Complex64::new(1.0, 0.0));

    let mut out = SpinorField::zeros(4, 4);
    apply_d(&mut out, &psi, &u, m);

    // (m+2) on the source site minus the four unit-weight neighbor hops.
    assert_relative_eq!(out.get(0, 0, 0).re, m + 2.0, epsilon = 1e-12);
}
