use clap::Parser;
use log::{debug, info, warn};
use schwinger_hmc::params::Cli;
use schwinger_hmc::{hmc, io, measure};
use schwinger_hmc::{Context, Error, GaugeField};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &Error) -> ExitCode {
    let code = match err {
        Error::Config(_) => 1,
        Error::NonConvergence { .. } => 3,
        Error::InvariantViolation(_) => 4,
        Error::CheckpointMismatch { .. } => 5,
        Error::Io(_) => 6,
        Error::Unsupported(_) => 7,
    };
    ExitCode::from(code)
}

fn run(cli: Cli) -> schwinger_hmc::Result<()> {
    let params = cli.into_params()?;
    let total_iters = 2 * params.therm + params.iter_hmc;
    let mut ctx = Context::new(params.clone());

    let mut u = if params.checkpoint_start > 0 {
        let path = format!("{}.chkpt{}", params.name_stem("cfg"), params.checkpoint_start);
        info!("resuming from checkpoint {path}");
        io::read_gauge(&path, params.lx, params.ly)?
    } else {
        info!("starting from a hot gauge configuration");
        GaugeField::hot(params.lx, params.ly, params.beta, &mut ctx.rng)
    };

    let mut accepted_stats = 0usize;
    let mut total_stats = 0usize;
    let mut exp_neg_dh_sum = 0.0f64;
    let mut plaq_sum = 0.0f64;

    // Topological-charge bookkeeping, matching
    // `main_template.cpp`'s `top_old`/`top_stuck`/`histQ`: a histogram
    // over +/-20 units of charge, centered at index (HIST_LEN-1)/2.
    const HIST_LEN: usize = 41;
    let mut top_old: i64 = 0;
    let mut top_initialized = false;
    let mut top_int: i64 = 0;
    let mut top_stuck = 0u64;
    let mut hist_q = vec![0u64; HIST_LEN];

    for iter in params.checkpoint_start..total_iters {
        let result = hmc::run_iteration(&mut ctx, &mut u, iter)?;
        u.check_unitarity(1e-9)?;

        debug!(
            "iter {iter}: accepted={} delta_h={:.6} cg_iters={}",
            result.accepted, result.delta_h, result.cg_iters
        );

        if iter >= 2 * params.therm {
            total_stats += 1;
            if result.accepted {
                accepted_stats += 1;
            }
            exp_neg_dh_sum += (-result.delta_h).exp();

            let plaq = measure::mean_plaquette(&u);
            plaq_sum += plaq;

            if !top_initialized {
                // Measure top charge on the mother ensemble, matching
                // `main_template.cpp`'s initialization right before its
                // thermalized-trajectory loop.
                top_old = measure::topological_charge(&u).round() as i64;
                top_initialized = true;
            }
            if result.accepted {
                top_int = measure::topological_charge(&u).round() as i64;
                let index = top_int + (HIST_LEN as i64 - 1) / 2;
                if index >= 0 && (index as usize) < HIST_LEN {
                    hist_q[index as usize] += 1;
                } else {
                    warn!("topological charge {top_int} outside histogram range, dropping bin update");
                }
                if top_old == top_int {
                    top_stuck += 1;
                }
                top_old = top_int;
            }

            if (iter - 2 * params.therm) % params.skip == 0 {
                info!(
                    "iter {iter}: plaquette={:.6} running_accept={:.3} running_exp(-dH)={:.3} top_charge={} P(stuck)={:.3}",
                    plaq,
                    accepted_stats as f64 / total_stats as f64,
                    exp_neg_dh_sum / total_stats as f64,
                    top_int,
                    top_stuck as f64 / accepted_stats.max(1) as f64
                );
                debug!("topological charge histogram: {hist_q:?}");

                if params.meas_pl {
                    let pl = measure::polyakov_loops(&u);
                    debug!("polyakov loops: {pl:?}");
                }
                if params.meas_wl {
                    let wl = measure::wilson_loops(&u);
                    let (rmax, tmax) = wl.dim();
                    let sigma: Vec<(usize, usize, f64)> = (1..=rmax)
                        .flat_map(|r| (1..=tmax).map(move |t| (r, t)))
                        .filter_map(|(r, t)| measure::creutz_ratio(&wl, r, t).map(|chi| (r, t, chi)))
                        .collect();
                    debug!("wilson loops shape: {:?}, creutz ratios (string tension): {sigma:?}", wl.dim());
                }
                if params.meas_pc {
                    match measure::pion_correlator(&u) {
                        Ok(pc) => debug!("pion correlator: {pc:?}"),
                        Err(e) => warn!("pion correlator measurement skipped: {e}"),
                    }
                }
            }
        } else {
            info!("iter {iter}: thermalizing, accepted={}", result.accepted);
        }

        if (iter + 1) % params.chkpt == 0 {
            let path = format!("{}.chkpt{}", params.name_stem("cfg"), iter + 1);
            if let Err(e) = io::write_gauge(&path, &u) {
                warn!("checkpoint write failed at iter {iter}: {e}");
            } else {
                info!("wrote checkpoint {path}");
            }
        }
    }

    if total_stats > 0 {
        info!(
            "final: mean plaquette={:.6} acceptance={:.3} <exp(-dH)>={:.3}",
            plaq_sum / total_stats as f64,
            accepted_stats as f64 / total_stats as f64,
            exp_neg_dh_sum / total_stats as f64
        );
    }

    Ok(())
}
