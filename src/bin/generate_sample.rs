//! Writes a synthetic exoplanet CSV with the same headers as the Kaggle
//! dataset, so the explorer can run without network access.
//!
//! Usage: `generate_sample [OUTPUT]` (default `data/exoplanets.csv`).

use std::path::PathBuf;

use anyhow::{Context, Result};

const HEADERS: [&str; 10] = [
    "No.",
    "Planet Name",
    "Planet Host",
    "Discovery Method",
    "Discovery Year",
    "Orbital Period Days",
    "Mass",
    "Equilibrium Temperature",
    "Stellar Radius",
    "Distance",
];

/// (method, share of discoveries, first year in use)
const METHODS: [(&str, f64, u32); 5] = [
    ("Transit", 0.70, 2002),
    ("Radial Velocity", 0.22, 1995),
    ("Microlensing", 0.04, 2004),
    ("Imaging", 0.03, 2004),
    ("Transit Timing Variations", 0.01, 2011),
];

const ROWS: usize = 600;

/// Minimal deterministic PRNG (xorshift64*).
struct SimpleRng(u64);

impl SimpleRng {
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (bits >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Log-uniform sample in `[lo, hi]`.
    fn log_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (lo.ln() + (hi.ln() - lo.ln()) * self.next_f64()).exp()
    }

    fn pick_method(&mut self) -> (&'static str, u32) {
        let mut u = self.next_f64();
        for &(name, share, since) in &METHODS {
            if u < share {
                return (name, since);
            }
            u -= share;
        }
        (METHODS[0].0, METHODS[0].2)
    }
}

/// Empty cell with probability `p`, otherwise the formatted value.
fn maybe(rng: &mut SimpleRng, p: f64, value: f64, decimals: usize) -> String {
    if rng.next_f64() < p {
        String::new()
    } else {
        format!("{value:.decimals$}")
    }
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data").join("exoplanets.csv"));

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng(0x9E37_79B9_7F4A_7C15);
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    writer.write_record(HEADERS)?;

    let mut host_no = 0;
    let mut planet_letter = b'b';
    for no in 1..=ROWS {
        // Roughly one host in three has a second planet.
        if no == 1 || rng.next_f64() > 0.35 || planet_letter == b'h' {
            host_no += 1;
            planet_letter = b'b';
        } else {
            planet_letter += 1;
        }
        let host = format!("SYN-{host_no:04}");
        let (method, since) = rng.pick_method();
        let year = since + (rng.next_f64() * (2021 - since) as f64) as u32;

        let period = rng.log_uniform(0.3, 20_000.0);
        let mass = rng.log_uniform(0.003, 30.0);
        // Hotter planets sit on shorter orbits.
        let temperature = 2500.0 * period.powf(-0.25) + rng.next_f64() * 150.0;
        let stellar_radius = rng.log_uniform(0.1, 20.0);
        let distance = rng.log_uniform(1.3, 8000.0);

        writer.write_record([
            no.to_string(),
            format!("{host} {}", planet_letter as char),
            host,
            method.to_string(),
            year.to_string(),
            maybe(&mut rng, 0.03, period, 4),
            maybe(&mut rng, 0.10, mass, 4),
            maybe(&mut rng, 0.40, temperature, 0),
            maybe(&mut rng, 0.05, stellar_radius, 3),
            maybe(&mut rng, 0.02, distance, 2),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} synthetic exoplanets to {}", output.display());
    Ok(())
}
