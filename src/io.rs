//! Gauge configuration checkpoint I/O (spec.md §4.I, §6): a plain text
//! format mirroring `original_source::writeGaugeLattice`/
//! `readGaugeLattice` line for line.

use crate::error::{Error, Result};
use crate::lattice::GaugeField;
use crate::measure::mean_plaquette;
use num_complex::Complex64;
use std::fmt::Write as _;
use std::io::{BufRead, BufReader, Write};

const CHECKPOINT_RELERR_TOL: f64 = 1e-12;

/// Writes `u` to `path`: a 20-digit fixed plaquette header followed by
/// `LX*LY*2` 12-digit fixed phase angles in (x outer, y middle, mu
/// inner) order.
pub fn write_gauge(path: &str, u: &GaugeField) -> Result<()> {
    let mut text = String::new();
    let plaq = mean_plaquette(u);
    writeln!(text, "{:.20}", plaq).expect("formatting into a String never fails");

    for x in 0..u.lx() {
        for y in 0..u.ly() {
            for mu in 0..2 {
                let theta = u.get(x, y, mu).arg();
                writeln!(text, "{:.12}", theta).expect("formatting into a String never fails");
            }
        }
    }

    let mut f = std::fs::File::create(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Reads a gauge field written by [`write_gauge`], recomputing the
/// plaquette and rejecting the file if it disagrees with the header by
/// more than `1e-12` relative error.
pub fn read_gauge(path: &str, lx: usize, ly: usize) -> Result<GaugeField> {
    let f = std::fs::File::open(path)?;
    let mut lines = BufReader::new(f).lines();

    let header_line = lines
        .next()
        .ok_or_else(|| Error::Config(format!("{path}: empty checkpoint file")))??;
    let header_plaq: f64 = header_line
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{path}: malformed plaquette header")))?;

    let mut u = GaugeField::cold(lx, ly);
    for x in 0..lx {
        for y in 0..ly {
            for mu in 0..2 {
                let line = lines
                    .next()
                    .ok_or_else(|| Error::Config(format!("{path}: truncated checkpoint file")))??;
                let theta: f64 = line
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("{path}: malformed phase angle")))?;
                u.set(x, y, mu, Complex64::from_polar(1.0, theta));
            }
        }
    }

    let recomputed = mean_plaquette(&u);
    let relerr = if header_plaq.abs() > f64::MIN_POSITIVE {
        ((recomputed - header_plaq) / header_plaq).abs()
    } else {
        (recomputed - header_plaq).abs()
    };
    if relerr > CHECKPOINT_RELERR_TOL {
        return Err(Error::CheckpointMismatch { relerr });
    }

    Ok(u)
}
