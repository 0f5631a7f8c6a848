use approx::assert_relative_eq;
use num_complex::Complex64;
use schwinger_hmc::spinor::{axpy, caxpby, dot, norm2, scale, SpinorField};

fn random_spinor(lx: usize, ly: usize, seed: u64) -> SpinorField {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
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
fn dot_is_sesquilinear_in_first_argument() {
    let a = random_spinor(4, 4, 1);
    let b = random_spinor(4, 4, 2);
    let lambda = Complex64::new(2.0, -1.0);

    let mut scaled = a.clone();
    scale_complex(&mut scaled, lambda);

    let lhs = dot(&scaled, &b);
    let rhs = lambda.conj() * dot(&a, &b);
    assert_relative_eq!(lhs.re, rhs.re, epsilon = 1e-12);
    assert_relative_eq!(lhs.im, rhs.im, epsilon = 1e-12);
}

fn scale_complex(f: &mut SpinorField, lambda: Complex64) {
    for x in 0..f.lx() {
        for y in 0..f.ly() {
            for s in 0..2 {
                let v = f.get(x, y, s);
                f.set(x, y, s, v * lambda);
            }
        }
    }
}

#[test]
fn norm2_matches_dot_with_self() {
    let a = random_spinor(6, 5, 3);
    assert_relative_eq!(norm2(&a), dot(&a, &a).re, epsilon = 1e-10);
}

#[test]
fn axpy_matches_reference_loop() {
    let x = random_spinor(3, 3, 4);
    let mut y = random_spinor(3, 3, 5);
    let expected: Vec<Complex64> = (0..x.lx())
        .flat_map(|xi| (0..x.ly()).flat_map(move |yi| (0..2).map(move |s| (xi, yi, s))))
        .map(|(xi, yi, s)| y.get(xi, yi, s) + Complex64::new(2.0, 0.5) * x.get(xi, yi, s))
        .collect();

    axpy(Complex64::new(2.0, 0.5), &x, &mut y);

    let mut i = 0;
    for xi in 0..y.lx() {
        for yi in 0..y.ly() {
            for s in 0..2 {
                assert_relative_eq!(y.get(xi, yi, s).re, expected[i].re, epsilon = 1e-12);
                assert_relative_eq!(y.get(xi, yi, s).im, expected[i].im, epsilon = 1e-12);
                i += 1;
            }
        }
    }
}

#[test]
fn caxpby_combines_both_fields() {
    let x = random_spinor(2, 2, 6);
    let y = random_spinor(2, 2, 7);
    let mut result = SpinorField::zeros(2, 2);
    let (a, b) = (Complex64::new(1.5, 0.0), Complex64::new(0.0, -1.0));
    caxpby(a, &x, b, &y, &mut result);

    for xi in 0..2 {
        for yi in 0..2 {
            for s in 0..2 {
                let expect = a * x.get(xi, yi, s) + b * y.get(xi, yi, s);
                assert_relative_eq!(result.get(xi, yi, s).re, expect.re, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn scale_is_linear() {
    let mut x = random_spinor(3, 2, 8);
    let before = norm2(&x);
    scale(2.0, &mut x);
    assert_relative_eq!(norm2(&x), 4.0 * before, epsilon = 1e-9);
}
