//! Hybrid Monte Carlo engine for two-dimensional compact U(1) lattice
//! gauge theory with two-flavor dynamical Wilson fermions.

pub mod action;
pub mod buffer_pool;
pub mod cg;
pub mod context;
pub mod dirac;
pub mod error;
pub mod force;
pub mod hmc;
pub mod integrator;
pub mod io;
pub mod lattice;
pub mod measure;
pub mod params;
pub mod rng;
pub mod spinor;

pub use context::Context;
pub use error::{Error, Result};
pub use lattice::{GaugeField, MomentumField, RealField};
pub use params::Params;
pub use spinor::SpinorField;
