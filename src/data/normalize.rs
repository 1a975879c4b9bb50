use std::collections::BTreeMap;

use uuid::Uuid;

use super::model::{Category, DEFAULT_SEVERITY, MAX_SEVERITY, MIN_SEVERITY, Point};
use crate::error::MapError;

/// One header-keyed input row, all cells as text.
pub type RawRow = BTreeMap<String, String>;

/// Counters from a batch normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_rejected: usize,
}

impl NormalizeReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_rejected
    }
}

// ---------------------------------------------------------------------------
// Single row
// ---------------------------------------------------------------------------

/// Turn one raw row into a [`Point`].
///
/// Rejects the row when `lat`/`lng` is not a finite number or `category`
/// is blank. Unknown categories become [`Category::Other`], severity is
/// clamped to `[1, 3]` (default 2) and a missing `id` is generated.
pub fn normalize_row(row: &RawRow) -> Result<Point, MapError> {
    let lat = parse_coordinate(row, "lat")?;
    let lng = parse_coordinate(row, "lng")?;

    let category = field(row, "category").trim();
    if category.is_empty() {
        return Err(MapError::rejected("empty category"));
    }
    let category = Category::from_code_or_other(category);

    let severity = parse_severity(row.get("severity").map(String::as_str));

    let id = match row.get("id") {
        Some(id) if !id.trim().is_empty() => id.clone(),
        _ => generate_id(),
    };

    Ok(Point {
        id,
        timestamp: text(row, "timestamp"),
        lat,
        lng,
        block: text(row, "block"),
        school: text(row, "school"),
        category,
        severity,
        description: text(row, "description"),
        photo_url: text(row, "photo_url"),
        reporter_type: text(row, "reporter_type"),
        status: text(row, "status"),
    })
}

/// Normalize a batch, dropping rejected rows.
pub fn normalize_rows<I>(rows: I) -> (Vec<Point>, NormalizeReport)
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = NormalizeReport::default();
    let mut points = Vec::new();

    for (row_no, row) in rows.into_iter().enumerate() {
        report.rows_read += 1;
        match normalize_row(&row) {
            Ok(point) => points.push(point),
            Err(e) => {
                report.rows_rejected += 1;
                log::debug!("Dropping row {row_no}: {e}");
            }
        }
    }

    (points, report)
}

// -- helpers --

fn field<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn text(row: &RawRow, key: &str) -> String {
    field(row, key).to_string()
}

fn parse_coordinate(row: &RawRow, key: &str) -> Result<f64, MapError> {
    let raw = field(row, key);
    match parse_float_prefix(raw) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MapError::rejected(format!("{key} '{raw}' is not a finite number"))),
    }
}

/// Longest leading decimal number of `raw` after trimming, so `36.3abc`
/// reads as `36.3`. `None` when there are no leading digits.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut n_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        n_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if n_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Leading integer of `raw` after trimming; `1e5` reads as `1` and `2.7`
/// as `2`. Values too long for `i64` saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let negative = s.starts_with('-');
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let n_digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if n_digits == 0 {
        return None;
    }

    let digits = &unsigned[..n_digits];
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Leading integer clamped to `[1, 3]`; anything without leading digits
/// falls back to the midpoint.
pub fn parse_severity(raw: Option<&str>) -> u8 {
    let value = raw
        .and_then(parse_int_prefix)
        .unwrap_or(DEFAULT_SEVERITY as i64);

    value.clamp(MIN_SEVERITY as i64, MAX_SEVERITY as i64) as u8
}

const GENERATED_ID_HEX_LEN: usize = 16;

/// Random id, `P` followed by 16 hex digits of a v4 UUID.
pub fn generate_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("P{}", &token[..GENERATED_ID_HEX_LEN])
}
