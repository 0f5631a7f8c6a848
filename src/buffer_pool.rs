//! Scratch-buffer arena (Design Notes): replaces the source's named
//! bank of preallocated arrays with a small typed pool offering
//! `acquire_spinor()`/`acquire_real()` handles that return their
//! buffer on drop. Not `Sync`: the single HMC control thread is the
//! only consumer (spec.md §5).

use crate::lattice::RealField;
use crate::spinor::SpinorField;
use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

pub struct BufferPool {
    lx: usize,
    ly: usize,
    spinors: Rc<RefCell<Vec<SpinorField>>>,
    reals: Rc<RefCell<Vec<RealField>>>,
}

impl BufferPool {
    /// Pre-allocates `n_spinor`/`n_real` scratch buffers so steady-state
    /// trajectories never allocate.
    pub fn new(lx: usize, ly: usize, n_spinor: usize, n_real: usize) -> Self {
        let spinors = (0..n_spinor).map(|_| SpinorField::zeros(lx, ly)).collect();
        let reals = (0..n_real).map(|_| RealField::zeros(lx, ly)).collect();
        BufferPool {
            lx,
            ly,
            spinors: Rc::new(RefCell::new(spinors)),
            reals: Rc::new(RefCell::new(reals)),
        }
    }

    pub fn acquire_spinor(&self) -> SpinorHandle {
        let mut buf = self
            .spinors
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| SpinorField::zeros(self.lx, self.ly));
        buf.zero();
        SpinorHandle {
            buf: Some(buf),
            pool: Rc::clone(&self.spinors),
        }
    }

    pub fn acquire_real(&self) -> RealHandle {
        let mut buf = self
            .reals
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| RealField::zeros(self.lx, self.ly));
        buf.zero();
        RealHandle {
            buf: Some(buf),
            pool: Rc::clone(&self.reals),
        }
    }
}

pub struct SpinorHandle {
    buf: Option<SpinorField>,
    pool: Rc<RefCell<Vec<SpinorField>>>,
}

impl Deref for SpinorHandle {
    type Target = SpinorField;
    fn deref(&self) -> &SpinorField {
        self.buf.as_ref().expect("handle buffer taken before drop")
    }
}

impl DerefMut for SpinorHandle {
    fn deref_mut(&mut self) -> &mut SpinorField {
        self.buf.as_mut().expect("handle buffer taken before drop")
    }
}

impl Drop for SpinorHandle {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.borrow_mut().push(buf);
        }
    }
}

pub struct RealHandle {
    buf: Option<RealField>,
    pool: Rc<RefCell<Vec<RealField>>>,
}

impl Deref for RealHandle {
    type Target = RealField;
    fn deref(&self) -> &RealField {
        self.buf.as_ref().expect("handle buffer taken before drop")
    }
}

impl DerefMut for RealHandle {
    fn deref_mut(&mut self) -> &mut RealField {
        self.buf.as_mut().expect("handle buffer taken before drop")
    }
}

impl Drop for RealHandle {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.borrow_mut().push(buf);
        }
    }
}
