//! Writes a synthetic GISS-style temperature anomaly CSV.
//!
//! ```text
//! generate_sample [OUTPUT] [--sections]
//! ```

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

const DEFAULT_OUTPUT: &str = "data/sample_GLB.Ts+dSST.csv";
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const SUMMARY_COLUMNS: [&str; 6] = ["J-D", "D-N", "DJF", "MAM", "JJA", "SON"];

/// Write a synthetic GISS-style temperature anomaly CSV
#[derive(Parser, Debug)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Destination file
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Write a combined file with AIRS v6, AIRS v7 and GHCNv4/ERSSTv5 blocks
    #[arg(long)]
    sections: bool,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Anomaly baseline for `year`: flat until 1910, slow warming to 1970, then
/// about 0.19 °C per decade.
fn baseline(year: i32) -> f64 {
    let y = year as f64;
    if year < 1910 {
        -0.25
    } else if year < 1970 {
        -0.25 + (y - 1910.0) * 0.004
    } else {
        -0.01 + (y - 1970.0) * 0.019
    }
}

/// Monthly anomalies for `first..=last`; the final year stops after
/// `last_month` months like a download taken mid-year.
fn simulate(first: i32, last: i32, last_month: usize, offset: f64, rng: &mut SimpleRng) -> Vec<(i32, [Option<f64>; 12])> {
    let mut enso = 0.0;
    (first..=last)
        .map(|year| {
            let mut months = [None; 12];
            for (m, slot) in months.iter_mut().enumerate() {
                if year == last && m >= last_month {
                    break;
                }
                enso = 0.85 * enso + rng.gauss(0.0, 0.05);
                let seasonal = 0.04 * (m as f64 / 12.0 * std::f64::consts::TAU).cos();
                *slot = Some(baseline(year) + offset + enso + seasonal + rng.gauss(0.0, 0.06));
            }
            (year, months)
        })
        .collect()
}

fn cell(v: Option<f64>) -> String {
    v.map_or_else(|| "***".to_string(), |v| format!("{v:.2}"))
}

fn mean_of(values: &[Option<f64>]) -> Option<f64> {
    let valid: Option<Vec<f64>> = values.iter().copied().collect();
    valid.map(|v| v.iter().sum::<f64>() / v.len() as f64)
}

fn write_table<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[(i32, [Option<f64>; 12])],
) -> Result<()> {
    let mut header = vec!["Year"];
    header.extend(MONTHS);
    header.extend(SUMMARY_COLUMNS);
    writer.write_record(&header)?;

    let mut previous_dec: Option<f64> = None;
    for (year, months) in rows {
        let m = |i: usize| months[i];
        let summaries = [
            mean_of(months),
            mean_of(&[previous_dec, m(0), m(1), m(2), m(3), m(4), m(5), m(6), m(7), m(8), m(9), m(10)]),
            mean_of(&[previous_dec, m(0), m(1)]),
            mean_of(&[m(2), m(3), m(4)]),
            mean_of(&[m(5), m(6), m(7)]),
            mean_of(&[m(8), m(9), m(10)]),
        ];
        let mut record = vec![year.to_string()];
        record.extend(months.iter().map(|v| cell(*v)));
        record.extend(summaries.iter().map(|v| cell(*v)));
        writer.write_record(&record)?;
        previous_dec = months[11];
    }
    Ok(())
}

fn main() -> Result<()> {
    let Args { output, sections } = Args::parse();

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

    let mut rng = SimpleRng::new(42);
    let mut years = 0;
    if sections {
        for (marker, first, offset) in [("AIRS v6", 2002, 0.05), ("AIRS v7", 2002, 0.03), ("GHCNv4/ERSSTv5", 1880, 0.0)] {
            let rows = simulate(first, 2024, 9, offset, &mut rng);
            writer.write_record([marker])?;
            write_table(&mut writer, &rows)?;
            years += rows.len();
        }
    } else {
        let rows = simulate(1880, 2024, 9, 0.0, &mut rng);
        writer.write_record(["Land-Ocean: Global Means"])?;
        write_table(&mut writer, &rows)?;
        years = rows.len();
    }
    writer.flush()?;

    println!("Wrote {years} years of monthly anomalies to {}", output.display());
    println!("Try: rusty-climate --data {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn output_defaults_to_sample_path() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(!args.sections);

        let args = Args::try_parse_from(["generate_sample", "--sections", "out.csv"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.csv"));
        assert!(args.sections);
    }

    #[test]
    fn flags_are_not_taken_as_output_path() {
        let err = Args::try_parse_from(["generate_sample", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let err = Args::try_parse_from(["generate_sample", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn sections_layout_loads_every_block() {
        let mut rng = SimpleRng::new(7);
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for marker in ["AIRS v6", "GHCNv4/ERSSTv5"] {
            writer.write_record([marker]).unwrap();
            write_table(&mut writer, &simulate(2000, 2010, 9, 0.0, &mut rng)).unwrap();
        }
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let datasets = rusty_climate::data::loader::parse_str(&text).unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[1].year_range(), Some((2000, 2010)));
    }
}
