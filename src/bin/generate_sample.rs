//! Write synthetic historical and recent resale datasets for local use.
//!
//! Usage: `generate_sample [HISTORICAL] [RECENT]`. The output format follows
//! each path's extension (`.csv` or `.parquet`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 11] = [
    "month",
    "town",
    "flat_type",
    "block",
    "street_name",
    "storey_range",
    "floor_area_sqm",
    "flat_model",
    "lease_commence_date",
    "remaining_lease",
    "resale_price",
];

const TOWNS: [(&str, &str); 8] = [
    ("ANG MO KIO", "ANG MO KIO AVE 3"),
    ("BEDOK", "BEDOK NTH RD"),
    ("BUKIT MERAH", "JLN BUKIT MERAH"),
    ("JURONG WEST", "JURONG WEST ST 42"),
    ("PUNGGOL", "PUNGGOL FIELD"),
    ("SENGKANG", "COMPASSVALE RD"),
    ("TAMPINES", "TAMPINES ST 21"),
    ("YISHUN", "YISHUN RING RD"),
];

/// (flat type, floor area, base price)
const FLAT_TYPES: [(&str, f64, f64); 5] = [
    ("2 ROOM", 45.0, 250_000.0),
    ("3 ROOM", 68.0, 350_000.0),
    ("4 ROOM", 92.0, 480_000.0),
    ("5 ROOM", 112.0, 590_000.0),
    ("EXECUTIVE", 140.0, 720_000.0),
];

const FLAT_MODELS: [&str; 4] = ["Improved", "New Generation", "Model A", "Premium Apartment"];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic transaction as cell texts in [`COLUMNS`] order.
fn generate_row(rng: &mut SimpleRng, year: i32, month: u32) -> Vec<String> {
    let (town, street) = TOWNS[rng.below(TOWNS.len())];
    let (flat_type, area, base_price) = FLAT_TYPES[rng.below(FLAT_TYPES.len())];
    let flat_model = FLAT_MODELS[rng.below(FLAT_MODELS.len())];

    let storey_start = rng.below(17) * 3 + 1;
    let lease_commence = 1970 + rng.below((year - 1969) as usize) as i32;
    let remaining_years = (99 - (year - lease_commence)).max(1);
    let remaining_months = rng.below(12);

    // Newer leases, higher floors and later months sell for more.
    let lease_factor = 0.6 + 0.4 * remaining_years as f64 / 99.0;
    let floor_factor = 1.0 + storey_start as f64 * 0.004;
    let drift = 1.0 + (year - 2017) as f64 * 0.03;
    let price = (base_price * lease_factor * floor_factor * drift * rng.gauss(1.0, 0.08))
        .max(150_000.0)
        .round();

    vec![
        format!("{year}-{month:02}"),
        town.to_string(),
        flat_type.to_string(),
        format!("{}", 100 + rng.below(800)),
        street.to_string(),
        format!("{:02} TO {:02}", storey_start, storey_start + 2),
        format!("{area:.1}"),
        flat_model.to_string(),
        lease_commence.to_string(),
        format!("{remaining_years} years {remaining_months:02} months"),
        format!("{price:.1}"),
    ]
}

fn generate(
    rng: &mut SimpleRng,
    years: std::ops::RangeInclusive<i32>,
    last_month: u32,
    per_month: usize,
) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for year in years {
        for month in 1..=12 {
            if year >= 2025 && month > last_month {
                break;
            }
            for _ in 0..per_month {
                rows.push(generate_row(rng, year, month));
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let price_idx = COLUMNS.len() - 1;
    let fields: Vec<Field> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let dtype = if i == price_idx { DataType::Float64 } else { DataType::Utf8 };
            Field::new(*name, dtype, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|i| -> ArrayRef {
            if i == price_idx {
                Arc::new(Float64Array::from_iter(
                    rows.iter().map(|r| r[i].parse::<f64>().ok()),
                ))
            } else {
                Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r[i].as_str())))
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, rows)?,
        Some("parquet") | Some("pq") => write_parquet(path, rows)?,
        _ => bail!("unsupported output extension: {}", path.display()),
    }
    println!("Wrote {} records to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let historical = args
        .next()
        .unwrap_or_else(|| PathBuf::from("resale_flat_2017_2024.csv"));
    let recent = args
        .next()
        .unwrap_or_else(|| PathBuf::from("dynamic_2025_data.csv"));

    let mut rng = SimpleRng::new(42);
    write_rows(&historical, &generate(&mut rng, 2017..=2024, 12, 40))?;
    write_rows(&recent, &generate(&mut rng, 2025..=2025, 6, 60))?;
    Ok(())
}
