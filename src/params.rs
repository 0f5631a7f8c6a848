use crate::error::{Error, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Simulation parameters, following spec.md §3's "Simulation parameters"
/// list. Produced once at startup and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub lx: usize,
    pub ly: usize,

    pub beta: f64,
    pub iter_hmc: usize,
    pub therm: usize,
    pub skip: usize,
    pub chkpt: usize,
    pub checkpoint_start: usize,
    pub nstep: usize,
    pub tau: f64,

    pub smear_iter: usize,
    pub alpha: f64,

    pub seed: u64,
    pub dynamic: bool,
    pub m: f64,
    pub max_iter_cg: usize,
    pub eps: f64,

    // ARPACK-era fields kept for CLI/file-format compatibility; unused by
    // the core (deflation is out of scope, spec.md §1 Non-goals).
    pub arpack_tol: f64,
    pub arpack_maxiter: usize,
    pub poly_acc: usize,
    pub amax: f64,
    pub amin: f64,
    pub n_poly: usize,

    pub meas_pl: bool,
    pub meas_wl: bool,
    pub meas_pc: bool,
    pub meas_vt: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            lx: 8,
            ly: 8,
            beta: 4.0,
            iter_hmc: 1000,
            therm: 50,
            skip: 25,
            chkpt: 100,
            checkpoint_start: 0,
            nstep: 25,
            tau: 1.0,
            smear_iter: 1,
            alpha: 0.5,
            seed: 1,
            dynamic: true,
            m: 0.1,
            max_iter_cg: 1000,
            eps: 1e-6,
            arpack_tol: 1e-6,
            arpack_maxiter: 10000,
            poly_acc: 0,
            amax: 10.0,
            amin: 0.1,
            n_poly: 100,
            meas_pl: false,
            meas_wl: false,
            meas_pc: false,
            meas_vt: false,
        }
    }
}

impl Params {
    /// Semantic validation beyond what clap's type parsing already
    /// enforces. Maps to spec.md §7's Configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.lx == 0 || self.ly == 0 {
            return Err(Error::Config("lattice size must be nonzero".into()));
        }
        if self.nstep == 0 {
            return Err(Error::Config("nstep must be >= 1".into()));
        }
        if self.tau <= 0.0 {
            return Err(Error::Config("tau must be > 0".into()));
        }
        if self.eps <= 0.0 {
            return Err(Error::Config("eps must be > 0".into()));
        }
        if self.max_iter_cg == 0 {
            return Err(Error::Config("maxIterCG must be >= 1".into()));
        }
        if self.skip == 0 || self.chkpt == 0 {
            return Err(Error::Config("skip and chkpt must be >= 1".into()));
        }
        Ok(())
    }

    pub fn dtau(&self) -> f64 {
        self.tau / self.nstep as f64
    }

    /// Builds a filename stem the way `original_source::constructName`
    /// does, for checkpoint and measurement file naming.
    pub fn name_stem(&self, prefix: &str) -> String {
        let mut name = format!(
            "{prefix}_LX{}_LY{}_B{}",
            self.lx, self.ly, self.beta
        );
        if self.dynamic {
            name += &format!("_M{}", self.m);
        }
        name += &format!("_tau{}_nHMCstep{}", self.tau, self.nstep);
        name
    }
}

/// CLI front-end: positional arguments in the exact order of spec.md §6.
/// `--config` optionally loads a TOML file of the same fields to seed
/// defaults, which the positional arguments then override.
#[derive(Parser, Debug)]
#[command(name = "schwinger-hmc", about = "2D Wilson HMC engine")]
pub struct Cli {
    /// Optional TOML file providing defaults for any field below.
    #[arg(long)]
    pub config: Option<String>,

    /// Gauge coupling.
    pub beta: f64,
    /// Number of post-thermalization trajectories.
    pub iter_hmc: usize,
    /// Thermalization sweep count.
    pub therm: usize,
    /// Measurement cadence (in trajectories).
    pub skip: usize,
    /// Checkpoint cadence (in trajectories).
    pub chkpt: usize,
    /// Trajectory index to resume from (0 = fresh start).
    pub checkpoint_start: usize,
    /// Leapfrog steps per trajectory.
    pub nstep: usize,
    /// Trajectory length.
    pub tau: f64,
    /// APE smearing iterations (link smearing, used by measurement collaborators).
    pub smear_iter: usize,
    /// APE smearing weight.
    pub alpha: f64,
    /// PRNG seed.
    pub seed: u64,
    /// 0 = quenched, nonzero = dynamical fermions.
    pub dynamic: u8,
    /// Wilson fermion mass.
    pub m: f64,
    /// CG iteration cap.
    pub max_iter_cg: usize,
    /// CG relative-residual tolerance.
    pub eps: f64,
    /// ARPACK tolerance (accepted for CLI compatibility; unused).
    pub arpack_tol: f64,
    /// ARPACK iteration cap (accepted for CLI compatibility; unused).
    pub arpack_maxiter: usize,
    /// Polynomial-acceleration flag (accepted for CLI compatibility; unused).
    pub poly_acc: usize,
    pub amax: f64,
    pub amin: f64,
    pub n_poly: usize,
    /// Measure Polyakov loops.
    pub meas_pl: u8,
    /// Measure Wilson loops / Creutz ratios.
    pub meas_wl: u8,
    /// Measure pion correlators.
    pub meas_pc: u8,
    /// Measure vacuum trace.
    pub meas_vt: u8,

    /// Lattice extent in x (not part of the original positional list;
    /// defaults to 8 when omitted via config file).
    #[arg(long, default_value_t = 8)]
    pub lx: usize,
    /// Lattice extent in y.
    #[arg(long, default_value_t = 8)]
    pub ly: usize,
}

impl Cli {
    /// Merges an optional TOML config file with the CLI's positional
    /// arguments (CLI wins) and validates the result.
    pub fn into_params(self) -> Result<Params> {
        let mut params = if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)?;
            toml::from_str(&text)
                .map_err(|e| Error::Config(format!("invalid config file {path}: {e}")))?
        } else {
            Params::default()
        };

        params.beta = self.beta;
        params.iter_hmc = self.iter_hmc;
        params.therm = self.therm;
        params.skip = self.skip;
        params.chkpt = self.chkpt;
        params.checkpoint_start = self.checkpoint_start;
        params.nstep = self.nstep;
        params.tau = self.tau;
        params.smear_iter = self.smear_iter;
        params.alpha = self.alpha;
        params.seed = self.seed;
        params.dynamic = self.dynamic != 0;
        params.m = self.m;
        params.max_iter_cg = self.max_iter_cg;
        params.eps = self.eps;
        params.arpack_tol = self.arpack_tol;
        params.arpack_maxiter = self.arpack_maxiter;
        params.poly_acc = self.poly_acc;
        params.amax = self.amax;
        params.amin = self.amin;
        params.n_poly = self.n_poly;
        params.meas_pl = self.meas_pl != 0;
        params.meas_wl = self.meas_wl != 0;
        params.meas_pc = self.meas_pc != 0;
        params.meas_vt = self.meas_vt != 0;
        params.lx = self.lx;
        params.ly = self.ly;

        params.validate()?;
        Ok(params)
    }
}
