use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::PointStore;
use super::normalize::{NormalizeReport, RawRow, normalize_rows};

/// Columns every input table must have.
pub const REQUIRED_COLUMNS: [&str; 3] = ["lat", "lng", "category"];

/// A loaded store plus the counters from normalization.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub store: PointStore,
    pub report: NormalizeReport,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load hazard reports from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one report per line (default)
/// * `.json`    – `[{ "lat": ..., "lng": ..., "category": ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Malformed rows are dropped; only an unreadable file is an error.
pub fn load_file(path: &Path) -> Result<LoadedDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" | "txt" => read_csv_rows(path)?,
        "json" => read_json_rows(path)?,
        "parquet" | "pq" => read_parquet_rows(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let (points, report) = normalize_rows(rows);
    log::info!(
        "Loaded {} hazard reports from {} ({} rows, {} rejected)",
        points.len(),
        path.display(),
        report.rows_read,
        report.rows_rejected
    );

    Ok(LoadedDataset {
        store: PointStore::from_points(points),
        report,
    })
}

fn check_required_columns<'a, I>(headers: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    for required in REQUIRED_COLUMNS {
        if !headers.clone().into_iter().any(|h| h == required) {
            bail!("missing required column '{required}'");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV file into header-keyed rows. Blank lines are skipped and
/// records that cannot be decoded are dropped. Records of any width are
/// kept; the normalizer decides whether they are usable.
pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_required_columns(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable CSV row {row_no}: {e}");
                continue;
            }
        };
        // Short records leave trailing columns absent; extra cells are ignored.
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "lat": 36.34, "lng": 139.45, "category": "blind", "severity": 1 },
///   ...
/// ]
/// ```
///
/// Scalars are converted to text; `null` counts as an absent field.
pub fn read_json_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::debug!("Skipping JSON row {i}: not an object");
            continue;
        };
        let row: RawRow = obj
            .iter()
            .filter_map(|(key, val)| json_to_text(val).map(|v| (key.trim().to_string(), v)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field. Columns of any
/// primitive type are rendered to text; nulls count as absent fields.
pub fn read_parquet_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    check_required_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let batch_schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::new();
            for (col_idx, field) in batch_schema.fields().iter().enumerate() {
                let column = batch.column(col_idx);
                if column.is_null(row) {
                    continue;
                }
                match array_value_to_string(column, row) {
                    Ok(value) => {
                        raw.insert(field.name().clone(), value);
                    }
                    Err(e) => log::debug!("Row {row}: cannot render '{}': {e}", field.name()),
                }
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::Category;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_drops_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "hazards.csv",
            "id,lat,lng,category,severity,description,status\n\
             h1,36.34,139.45,blind,1,Hedge,open\n\
             h2,abc,139.44,speed,3,Cars,open\n\
             \n\
             h3,36.35,139.44,puddle,9,Water,\n\
             h4,36.36,139.43,,2,No category,\n",
        );

        let loaded = load_file(&path).unwrap();
        let points = loaded.store.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "h1");
        assert_eq!(points[1].id, "h3");
        assert_eq!(points[1].category, Category::Other);
        assert_eq!(points[1].severity, 3);
        assert_eq!(loaded.report.rows_read, 4);
        assert_eq!(loaded.report.rows_rejected, 2);
    }

    #[test]
    fn test_load_csv_keeps_records_of_any_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "hazards.csv",
            "id,lat,lng,category,severity,description,status\n\
             h1,36.34,139.45,dark\n\
             h2,36.35,139.44,speed,3,Cars,open\n\
             h3,36.36,139.43,blind,1,Hedge,open,extra\n\
             h4,36.37\n",
        );
        let loaded = load_file(&path).unwrap();
        let ids: Vec<&str> = loaded.store.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "h2", "h3"]);

        let short = &loaded.store.points()[0];
        assert_eq!(short.category, Category::Dark);
        assert_eq!(short.severity, 2);
        assert_eq!(short.description, "");
        assert_eq!(short.status, "");
        assert_eq!(loaded.store.points()[2].status, "open");

        // h4 has no lng and no category
        assert_eq!(loaded.report.rows_read, 4);
        assert_eq!(loaded.report.rows_rejected, 1);
    }

    #[test]
    fn test_load_csv_trims_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "h.csv", " lat , lng ,category\n36.34,139.45,dark\n");
        assert_eq!(load_file(&path).unwrap().store.len(), 1);
    }

    #[test]
    fn test_only_bad_row_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "h.csv", "lat,lng,category\nabc,139.4,dark\n");
        let loaded = load_file(&path).unwrap();
        assert!(loaded.store.is_empty());
        assert_eq!(loaded.report.rows_rejected, 1);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "h.csv", "lat,lng\n36.34,139.45\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("category"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "h.xlsx", "");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "h.json",
            r#"[
                {"lat": 36.34, "lng": 139.45, "category": "blind", "severity": 1, "status": null},
                {"lat": "36.35", "lng": 139.44, "category": "speed", "severity": "3"},
                "not an object"
            ]"#,
        );
        let loaded = load_file(&path).unwrap();
        let points = loaded.store.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].severity, 1);
        assert_eq!(points[0].status, "");
        assert_eq!(points[1].lat, 36.35);
        assert_eq!(points[1].severity, 3);
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "h.json", r#"{"lat": 1}"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("lat", DataType::Float64, true),
            Field::new("lng", DataType::Float64, false),
            Field::new("category", DataType::Utf8, false),
            Field::new("severity", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(36.34), None, Some(36.36)])),
                Arc::new(Float64Array::from(vec![139.45, 139.44, 139.43])),
                Arc::new(StringArray::from(vec!["blind", "speed", "signal"])),
                Arc::new(Int64Array::from(vec![Some(1), Some(3), None])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_file(&path).unwrap();
        let points = loaded.store.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category, Category::Blind);
        assert_eq!(points[1].category, Category::Signal);
        assert_eq!(points[1].severity, 2);
        assert_eq!(loaded.report.rows_rejected, 1);
    }
}
