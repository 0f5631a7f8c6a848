use approx::assert_relative_eq;
use schwinger_hmc::action::gauge_action;
use schwinger_hmc::force::gauge_force;
use schwinger_hmc::measure::mean_plaquette;
use schwinger_hmc::{GaugeField, RealField};

#[test]
fn cold_start_plaquette_is_exactly_one() {
    let u = GaugeField::cold(6, 6);
    assert_relative_eq!(mean_plaquette(&u), 1.0, epsilon = 1e-15);
    assert_relative_eq!(gauge_action(&u, 5.0), 0.0, epsilon = 1e-12);
}

#[test]
fn cold_start_gauge_force_is_zero() {
    let u = GaugeField::cold(4, 4);
    let mut force = RealField::zeros(4, 4);
    gauge_force(&mut force, &u, 4.0);

    for x in 0..4 {
        for y in 0..4 {
            for mu in 0..2 {
                assert_relative_eq!(force.get(x, y, mu), 0.0, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn unitarity_holds_after_a_drift() {
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use schwinger_hmc::MomentumField;

    let mut rng = StdRng::seed_from_u64(7);
    let mut u = GaugeField::cold(4, 4);
    for x in 0..4 {
        for y in 0..4 {
            for mu in 0..2 {
                u.set(x, y, mu, Complex64::from_polar(1.0, rng.gen::<f64>()));
            }
        }
    }

    let mut mom = MomentumField::zeros(4, 4);
    for x in 0..4 {
        for y in 0..4 {
            for mu in 0..2 {
                mom.set(x, y, mu, rng.gen::<f64>() - 0.5);
            }
        }
    }

    u.drift(&mom, 0.1);
    u.check_unitarity(1e-9).expect("drift must preserve unit-modulus links");
}
