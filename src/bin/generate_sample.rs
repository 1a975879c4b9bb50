use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use route_safety_map::data::model::Category;

const CENTER: (f64, f64) = (36.3407, 139.4495);
const N_REPORTS: usize = 240;

const BLOCKS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const SCHOOLS: [&str; 4] = [
    "Ashikaga Elementary",
    "Hill Elementary",
    "River Junior High",
    "Station Elementary",
];
const REPORTERS: [&str; 3] = ["parent", "student", "teacher"];
const STATUSES: [&str; 4] = ["reported", "under review", "in progress", "fixed"];
/// One description per entry of `Category::ALL`.
const DESCRIPTIONS: [&str; Category::ALL.len()] = [
    "Sidewalk ends and children walk on the road",
    "Long wait at the crossing, kids run on red",
    "Hedge blocks the view at the corner",
    "Cars speed through as a shortcut in the morning",
    "Stop sign is faded",
    "Street light out near the park",
    "Bicycles nearly hit pupils several times a week",
    "Drain cover is loose",
];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Report {
    id: String,
    timestamp: String,
    lat: f64,
    lng: f64,
    block: String,
    school: String,
    category: String,
    severity: i64,
    description: String,
    reporter_type: String,
    status: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Report> {
    (0..N_REPORTS)
        .map(|i| {
            let cat_idx = (rng.next_u64() % Category::ALL.len() as u64) as usize;
            Report {
                id: format!("H{:04}", i + 1),
                timestamp: format!(
                    "2024-{:02}-{:02} {:02}:{:02}",
                    1 + rng.next_u64() % 12,
                    1 + rng.next_u64() % 28,
                    7 + rng.next_u64() % 11,
                    rng.next_u64() % 60
                ),
                lat: rng.gauss(CENTER.0, 0.012),
                lng: rng.gauss(CENTER.1, 0.015),
                block: rng.pick(&BLOCKS).to_string(),
                school: rng.pick(&SCHOOLS).to_string(),
                category: Category::ALL[cat_idx].code().to_string(),
                severity: 1 + (rng.next_u64() % 3) as i64,
                description: DESCRIPTIONS[cat_idx].to_string(),
                reporter_type: rng.pick(&REPORTERS).to_string(),
                status: rng.pick(&STATUSES).to_string(),
            }
        })
        .collect()
}

const HEADER: [&str; 12] = [
    "id",
    "timestamp",
    "lat",
    "lng",
    "block",
    "school",
    "category",
    "severity",
    "description",
    "photo_url",
    "reporter_type",
    "status",
];

/// CSV output also carries a few broken rows to exercise the normalizer.
fn write_csv(path: &Path, reports: &[Report]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADER)?;

    for r in reports {
        let lat = format!("{:.6}", r.lat);
        let lng = format!("{:.6}", r.lng);
        let severity = r.severity.to_string();
        writer.write_record([
            r.id.as_str(),
            r.timestamp.as_str(),
            lat.as_str(),
            lng.as_str(),
            r.block.as_str(),
            r.school.as_str(),
            r.category.as_str(),
            severity.as_str(),
            r.description.as_str(),
            "",
            r.reporter_type.as_str(),
            r.status.as_str(),
        ])?;
    }

    // Broken or unusual rows.
    writer.write_record(["", "", "abc", "139.4", "", "", "dark", "2", "", "", "", ""])?;
    writer.write_record(["", "", "36.34", "139.45", "", "", "", "2", "", "", "", ""])?;
    writer.write_record(["", "", "36.345", "139.452", "", "", "pothole", "9", "Hole in the road", "", "", ""])?;
    writer.write_record(["", "", "36.338", "139.447", "", "", "speed", "", "", "", "", ""])?;

    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, reports: &[Report]) -> Result<()> {
    let text = |f: fn(&Report) -> &str| {
        StringArray::from(reports.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("timestamp", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lng", DataType::Float64, false),
        Field::new("block", DataType::Utf8, false),
        Field::new("school", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("severity", DataType::Int64, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("reporter_type", DataType::Utf8, false),
        Field::new("status", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.id.as_str())),
            Arc::new(text(|r| r.timestamp.as_str())),
            Arc::new(Float64Array::from(reports.iter().map(|r| r.lat).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(reports.iter().map(|r| r.lng).collect::<Vec<_>>())),
            Arc::new(text(|r| r.block.as_str())),
            Arc::new(text(|r| r.school.as_str())),
            Arc::new(text(|r| r.category.as_str())),
            Arc::new(Int64Array::from(reports.iter().map(|r| r.severity).collect::<Vec<_>>())),
            Arc::new(text(|r| r.description.as_str())),
            Arc::new(text(|r| r.reporter_type.as_str())),
            Arc::new(text(|r| r.status.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let reports = generate(&mut rng);

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    let csv_path = out_dir.join("hazards.csv");
    write_csv(&csv_path, &reports)?;
    let parquet_path = out_dir.join("hazards.parquet");
    write_parquet(&parquet_path, &reports)?;

    println!(
        "Wrote {} hazard reports to {} and {}",
        reports.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_categories_are_known_codes() {
        let reports = generate(&mut SimpleRng::new(7));
        assert_eq!(reports.len(), N_REPORTS);
        for r in &reports {
            assert!(Category::from_code(&r.category).is_some(), "{}", r.category);
        }
    }
}
