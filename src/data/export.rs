use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use super::model::Point;
use crate::error::MapError;

/// Filename offered when saving an export.
pub const EXPORT_FILENAME: &str = "tsugakuro_filtered.geojson";

// ---------------------------------------------------------------------------
// GeoJSON conversion
// ---------------------------------------------------------------------------

/// One feature per point, geometry `[lng, lat]`, the remaining fields as
/// properties.
pub fn point_feature(point: &Point) -> Result<Feature, serde_json::Error> {
    let geometry = Geometry::new(Value::Point(vec![point.lng, point.lat]));
    let properties: JsonObject = serde_json::from_value(serde_json::to_value(point)?)?;

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Wrap the given points in a FeatureCollection. An empty input gives an
/// empty collection.
pub fn feature_collection<'a, I>(points: I) -> Result<FeatureCollection, serde_json::Error>
where
    I: IntoIterator<Item = &'a Point>,
{
    Ok(FeatureCollection {
        bbox: None,
        features: points
            .into_iter()
            .map(point_feature)
            .collect::<Result<_, _>>()?,
        foreign_members: None,
    })
}

/// Pretty-printed GeoJSON text.
pub fn to_geojson_string<'a, I>(points: I) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a Point>,
{
    serde_json::to_string_pretty(&feature_collection(points)?)
}

/// Serialize and write to `path`. Returns the number of features written.
pub fn write_geojson<'a, I>(points: I, path: &Path) -> Result<usize, MapError>
where
    I: IntoIterator<Item = &'a Point>,
{
    let points: Vec<&Point> = points.into_iter().collect();
    let failed = |reason: String| MapError::ExportFailed {
        path: path.to_path_buf(),
        reason,
    };

    let text = to_geojson_string(points.iter().copied()).map_err(|e| failed(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| failed(e.to_string()))?;

    log::info!("Exported {} features to {}", points.len(), path.display());
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use geojson::JsonValue;

    use super::*;
    use crate::data::model::Category;

    fn point(lat: f64, lng: f64, category: Category, severity: u8) -> Point {
        Point {
            id: "P1".to_string(),
            timestamp: "2024-05-01".to_string(),
            lat,
            lng,
            block: "East".to_string(),
            school: "Central".to_string(),
            category,
            severity,
            description: "desc".to_string(),
            photo_url: String::new(),
            reporter_type: "student".to_string(),
            status: "open".to_string(),
        }
    }

    #[test]
    fn test_geometry_is_longitude_first() {
        let p = point(36.35, 139.44, Category::Speed, 3);
        let json: JsonValue = serde_json::from_str(&to_geojson_string([&p]).unwrap()).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        let feature = &json["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([139.44, 36.35]));
    }

    #[test]
    fn test_properties_mirror_point_fields() {
        let p = point(36.35, 139.44, Category::NearMiss, 2);
        let feature = point_feature(&p).unwrap();
        let props = feature.properties.unwrap();

        let mut keys: Vec<&str> = props.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "block",
                "category",
                "description",
                "id",
                "photo_url",
                "reporter_type",
                "school",
                "severity",
                "status",
                "timestamp",
            ]
        );
        assert_eq!(props["category"], "nearmiss");
        assert_eq!(props["severity"], 2);
        assert_eq!(props["school"], "Central");
        assert!(!props.contains_key("lat"));
        assert!(!props.contains_key("lng"));
    }

    #[test]
    fn test_empty_subset_gives_empty_collection() {
        let empty: Vec<&Point> = Vec::new();
        let json: JsonValue =
            serde_json::from_str(&to_geojson_string(empty.iter().copied()).unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"], serde_json::json!([]));
    }

    #[test]
    fn test_write_geojson_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILENAME);
        let points = vec![
            point(36.34, 139.45, Category::Blind, 1),
            point(36.35, 139.44, Category::Speed, 3),
        ];

        let written = write_geojson(&points, &path).unwrap();
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let fc: FeatureCollection = text.parse::<geojson::GeoJson>().unwrap().try_into().unwrap();
        assert_eq!(fc.features.len(), 2);
    }

    #[test]
    fn test_write_geojson_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.geojson");
        let points: Vec<Point> = Vec::new();
        assert!(matches!(
            write_geojson(&points, &path),
            Err(MapError::ExportFailed { .. })
        ));
    }
}
