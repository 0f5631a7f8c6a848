//! Explicit replacement for the source's global singleton (Design
//! Notes): owns the parameters, the single PRNG stream, and the
//! scratch-buffer pool, and is threaded down to every component by
//! reference instead of living in process-wide mutable state.

use crate::buffer_pool::BufferPool;
use crate::params::Params;
use crate::rng::RngStream;

/// Scratch buffers concurrently live within one trajectory: CG's
/// `r, p, Ap, x` plus the force routine's `phip, g3Dphi, guess` and a
/// couple of transients, rounded up with headroom.
const SPINOR_POOL_SIZE: usize = 16;
const REAL_POOL_SIZE: usize = 8;

pub struct Context {
    pub params: Params,
    pub rng: RngStream,
    pub pool: BufferPool,
}

impl Context {
    pub fn new(params: Params) -> Self {
        let pool = BufferPool::new(params.lx, params.ly, SPINOR_POOL_SIZE, REAL_POOL_SIZE);
        let rng = RngStream::new(params.seed);
        Context { params, rng, pool }
    }
}
