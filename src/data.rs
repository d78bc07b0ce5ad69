use crate::config::{AppConfig, InputConfig, SnapshotInput};
use crate::types::{EventSite, OutageArea, OutageDataset};
use anyhow::{anyhow, bail, Context, Result};
use geo::{MultiPolygon, Point};
use geojson::{FeatureCollection, GeoJson};
use proj::{Proj, Transform};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Every input is normalized to this CRS before figure assembly.
const WGS84_EPSG: u32 = 4326;

/// Load all configured snapshots and the event file into one dataset.
///
/// Snapshots are concatenated in configuration order; the resulting row
/// index is the polygon-to-value join key used by the figure assembler.
/// Per-timestamp totals are seeded with 0 for every configured label, so a
/// zero-row snapshot still yields an aggregate (and later a frame).
pub fn load_dataset(config: &AppConfig) -> Result<OutageDataset> {
    if config.input.snapshots.is_empty() {
        bail!("No snapshot inputs configured");
    }

    println!("Loading data...");

    let mut areas = Vec::new();
    for snapshot in &config.input.snapshots {
        let rows = load_snapshot(&config.input, snapshot)?;
        println!(
            "Loaded {} areas for {} from {:?}",
            rows.len(),
            snapshot.timestamp,
            snapshot.path
        );
        areas.extend(rows);
    }

    let events = load_events(&config.input)?;
    println!("Loaded {} event sites", events.len());

    let mut timestamps: Vec<String> = config
        .input
        .snapshots
        .iter()
        .map(|s| s.timestamp.clone())
        .collect();
    timestamps.sort();
    timestamps.dedup();

    let mut totals: BTreeMap<String, u64> =
        timestamps.iter().map(|t| (t.clone(), 0)).collect();
    for area in &areas {
        *totals
            .get_mut(&area.timestamp)
            .ok_or_else(|| anyhow!("Row tagged with unknown timestamp {}", area.timestamp))? +=
            area.inhabitants;
    }

    Ok(OutageDataset {
        areas,
        events,
        timestamps,
        totals,
    })
}

fn load_snapshot(input: &InputConfig, snapshot: &SnapshotInput) -> Result<Vec<OutageArea>> {
    let extension = file_extension(&snapshot.path)?;

    match extension.as_str() {
        "json" | "geojson" => load_snapshot_geojson(input, snapshot),
        "shp" => load_snapshot_shapefile(input, snapshot),
        _ => Err(anyhow!("Unsupported geometry format: {}", extension)),
    }
}

fn load_snapshot_geojson(input: &InputConfig, snapshot: &SnapshotInput) -> Result<Vec<OutageArea>> {
    let collection = read_feature_collection(&snapshot.path)?;

    let epsg = match &snapshot.crs {
        Some(name) => parse_crs_name(name)?,
        // RFC 7946 mandates WGS 84 when no legacy crs member is present.
        None => declared_geojson_crs(&collection, &snapshot.path)?.unwrap_or(WGS84_EPSG),
    };

    let mut rows = Vec::with_capacity(collection.features.len());

    for (ordinal, feature) in collection.features.into_iter().enumerate() {
        let properties = feature
            .properties
            .as_ref()
            .ok_or_else(|| anyhow!("Feature {} of {:?} has no properties", ordinal, snapshot.path))?;

        let postcode = string_property(properties, &input.postcode_property)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;
        let inhabitants = count_property(properties, &input.inhabitants_property)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;
        let geometry = polygon_geometry(feature.geometry)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;

        rows.push(OutageArea {
            postcode,
            inhabitants,
            timestamp: snapshot.timestamp.clone(),
            geometry,
        });
    }

    if let Some(to_wgs84) = transformer_to_wgs84(epsg)? {
        for (ordinal, area) in rows.iter_mut().enumerate() {
            area.geometry.transform(&to_wgs84).with_context(|| {
                format!("Failed to reproject feature {} of {:?}", ordinal, snapshot.path)
            })?;
        }
    }

    Ok(rows)
}

fn load_snapshot_shapefile(
    input: &InputConfig,
    snapshot: &SnapshotInput,
) -> Result<Vec<OutageArea>> {
    // A Shapefile is not self-describing here; the CRS must be configured.
    let crs = snapshot.crs.as_deref().ok_or_else(|| {
        anyhow!(
            "No coordinate reference system declared for Shapefile {:?}; set `crs` on the snapshot entry",
            snapshot.path
        )
    })?;
    let epsg = parse_crs_name(crs)?;

    let mut reader = shapefile::Reader::from_path(&snapshot.path)
        .with_context(|| format!("Failed to open Shapefile: {:?}", snapshot.path))?;

    let mut rows = Vec::new();

    for (ordinal, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("Failed to read feature {} of {:?}", ordinal, snapshot.path))?;

        let postcode = dbase_string(&record, &input.postcode_property)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;
        let inhabitants = dbase_count(&record, &input.inhabitants_property)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;
        let geometry = shape_polygon(shape)
            .with_context(|| format!("Feature {} of {:?}", ordinal, snapshot.path))?;

        rows.push(OutageArea {
            postcode,
            inhabitants,
            timestamp: snapshot.timestamp.clone(),
            geometry,
        });
    }

    if let Some(to_wgs84) = transformer_to_wgs84(epsg)? {
        for (ordinal, area) in rows.iter_mut().enumerate() {
            area.geometry.transform(&to_wgs84).with_context(|| {
                format!("Failed to reproject feature {} of {:?}", ordinal, snapshot.path)
            })?;
        }
    }

    Ok(rows)
}

fn load_events(input: &InputConfig) -> Result<Vec<EventSite>> {
    let extension = file_extension(&input.events)?;

    match extension.as_str() {
        "json" | "geojson" => load_events_geojson(input),
        "shp" => load_events_shapefile(input),
        _ => Err(anyhow!("Unsupported geometry format: {}", extension)),
    }
}

fn load_events_geojson(input: &InputConfig) -> Result<Vec<EventSite>> {
    let collection = read_feature_collection(&input.events)?;

    let epsg = match &input.events_crs {
        Some(name) => parse_crs_name(name)?,
        None => declared_geojson_crs(&collection, &input.events)?.unwrap_or(WGS84_EPSG),
    };

    let mut events = Vec::with_capacity(collection.features.len());

    for (ordinal, feature) in collection.features.into_iter().enumerate() {
        let properties = feature
            .properties
            .as_ref()
            .ok_or_else(|| anyhow!("Feature {} of {:?} has no properties", ordinal, input.events))?;

        let context = format!("Feature {} of {:?}", ordinal, input.events);
        let reference =
            string_property(properties, &input.reference_property).context(context.clone())?;
        let date = string_property(properties, &input.date_property).context(context.clone())?;
        let name = string_property(properties, &input.name_property).context(context.clone())?;
        let location =
            string_property(properties, &input.location_property).context(context.clone())?;
        let point = point_geometry(feature.geometry).context(context)?;

        events.push(EventSite {
            reference,
            date,
            name,
            location,
            point,
        });
    }

    if let Some(to_wgs84) = transformer_to_wgs84(epsg)? {
        for (ordinal, event) in events.iter_mut().enumerate() {
            event.point.transform(&to_wgs84).with_context(|| {
                format!("Failed to reproject feature {} of {:?}", ordinal, input.events)
            })?;
        }
    }

    Ok(events)
}

fn load_events_shapefile(input: &InputConfig) -> Result<Vec<EventSite>> {
    let crs = input.events_crs.as_deref().ok_or_else(|| {
        anyhow!(
            "No coordinate reference system declared for Shapefile {:?}; set `events_crs`",
            input.events
        )
    })?;
    let epsg = parse_crs_name(crs)?;

    let mut reader = shapefile::Reader::from_path(&input.events)
        .with_context(|| format!("Failed to open Shapefile: {:?}", input.events))?;

    let mut events = Vec::new();

    for (ordinal, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .with_context(|| format!("Failed to read feature {} of {:?}", ordinal, input.events))?;

        let context = format!("Feature {} of {:?}", ordinal, input.events);
        let reference =
            dbase_string(&record, &input.reference_property).context(context.clone())?;
        let date = dbase_string(&record, &input.date_property).context(context.clone())?;
        let name = dbase_string(&record, &input.name_property).context(context.clone())?;
        let location =
            dbase_string(&record, &input.location_property).context(context.clone())?;
        let point = shape_point(shape).context(context)?;

        events.push(EventSite {
            reference,
            date,
            name,
            location,
            point,
        });
    }

    if let Some(to_wgs84) = transformer_to_wgs84(epsg)? {
        for (ordinal, event) in events.iter_mut().enumerate() {
            event.point.transform(&to_wgs84).with_context(|| {
                format!("Failed to reproject feature {} of {:?}", ordinal, input.events)
            })?;
        }
    }

    Ok(events)
}

fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file =
        File::open(path).with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader)
        .with_context(|| format!("Failed to parse GeoJSON in {:?}", path))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => bail!("{:?} must be a FeatureCollection", path),
    }
}

fn file_extension(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("Input geometry file has no extension: {:?}", path))
}

/// EPSG code from a CRS name such as "EPSG:28992",
/// "urn:ogc:def:crs:EPSG::28992" or "urn:ogc:def:crs:OGC:1.3:CRS84".
fn parse_crs_name(name: &str) -> Result<u32> {
    let upper = name.to_uppercase();

    if upper.ends_with("CRS84") {
        return Ok(WGS84_EPSG);
    }
    if let Some(idx) = upper.rfind("EPSG") {
        let code = upper[idx + 4..].trim_start_matches(':');
        return code
            .parse::<u32>()
            .with_context(|| format!("Unsupported CRS name: {}", name));
    }

    bail!("Unsupported CRS name: {}", name)
}

/// EPSG code from the legacy GeoJSON `crs` member, if one is present.
/// A crs member that cannot be interpreted is an error, never a guess.
fn declared_geojson_crs(collection: &FeatureCollection, path: &Path) -> Result<Option<u32>> {
    let crs = match collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
    {
        Some(value) => value,
        None => return Ok(None),
    };

    let name = crs
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .ok_or_else(|| anyhow!("Unrecognized crs member in {:?}", path))?;

    parse_crs_name(name)
        .map(Some)
        .with_context(|| format!("Unsupported crs declared in {:?}", path))
}

fn transformer_to_wgs84(epsg: u32) -> Result<Option<Proj>> {
    if epsg == WGS84_EPSG {
        return Ok(None);
    }
    let proj = Proj::new_known_crs(&format!("EPSG:{}", epsg), "EPSG:4326", None)
        .with_context(|| format!("Cannot create transformation from EPSG:{} to WGS 84", epsg))?;
    Ok(Some(proj))
}

fn string_property(properties: &geojson::JsonObject, key: &str) -> Result<String> {
    match properties.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(anyhow!("Property '{}' is not a string", key)),
        None => Err(anyhow!("Property '{}' is missing", key)),
    }
}

fn count_property(properties: &geojson::JsonObject, key: &str) -> Result<u64> {
    match properties.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_u64().ok_or_else(|| {
            anyhow!("Property '{}' must be a non-negative integer, got {}", key, n)
        }),
        Some(_) => Err(anyhow!("Property '{}' is not a number", key)),
        None => Err(anyhow!("Property '{}' is missing", key)),
    }
}

fn polygon_geometry(geometry: Option<geojson::Geometry>) -> Result<MultiPolygon<f64>> {
    let geometry = geometry.ok_or_else(|| anyhow!("Missing geometry"))?;

    let geo_geometry: geo::Geometry<f64> = geometry
        .value
        .try_into()
        .map_err(|e| anyhow!("Failed to convert geometry: {:?}", e))?;

    match geo_geometry {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        _ => bail!("Expected a polygon geometry"),
    }
}

fn point_geometry(geometry: Option<geojson::Geometry>) -> Result<Point<f64>> {
    let geometry = geometry.ok_or_else(|| anyhow!("Missing geometry"))?;

    let geo_geometry: geo::Geometry<f64> = geometry
        .value
        .try_into()
        .map_err(|e| anyhow!("Failed to convert geometry: {:?}", e))?;

    match geo_geometry {
        geo::Geometry::Point(p) => Ok(p),
        _ => bail!("Expected a point geometry"),
    }
}

fn shape_polygon(shape: shapefile::Shape) -> Result<MultiPolygon<f64>> {
    match shape {
        shapefile::Shape::Polygon(p) => p
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e)),
        shapefile::Shape::PolygonM(p) => p
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e)),
        shapefile::Shape::PolygonZ(p) => p
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e)),
        _ => bail!("Expected a polygon shape"),
    }
}

fn shape_point(shape: shapefile::Shape) -> Result<Point<f64>> {
    match shape {
        shapefile::Shape::Point(p) => Ok(Point::new(p.x, p.y)),
        shapefile::Shape::PointM(p) => Ok(Point::new(p.x, p.y)),
        shapefile::Shape::PointZ(p) => Ok(Point::new(p.x, p.y)),
        _ => bail!("Expected a point shape"),
    }
}

fn dbase_string(record: &shapefile::dbase::Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(shapefile::dbase::FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        Some(shapefile::dbase::FieldValue::Numeric(Some(n))) => Ok(n.to_string()),
        Some(_) => Err(anyhow!("Field '{}' is empty or not a string", field)),
        None => Err(anyhow!("Field '{}' not found in Shapefile record", field)),
    }
}

fn dbase_count(record: &shapefile::dbase::Record, field: &str) -> Result<u64> {
    match record.get(field) {
        Some(shapefile::dbase::FieldValue::Numeric(Some(n))) => {
            if *n < 0.0 || n.fract() != 0.0 {
                bail!("Field '{}' must be a non-negative integer, got {}", field, n);
            }
            Ok(*n as u64)
        }
        Some(shapefile::dbase::FieldValue::Integer(i)) => u64::try_from(*i)
            .map_err(|_| anyhow!("Field '{}' must be non-negative, got {}", field, i)),
        Some(_) => Err(anyhow!("Field '{}' is not a number", field)),
        None => Err(anyhow!("Field '{}' not found in Shapefile record", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FigureConfig, ServerConfig, StyleConfig};
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_snapshot(dir: &Path, name: &str, rows: &[(&str, u64)]) -> PathBuf {
        let features: Vec<serde_json::Value> = rows
            .iter()
            .enumerate()
            .map(|(i, (postcode, inhabitants))| {
                let x = i as f64;
                json!({
                    "type": "Feature",
                    "properties": { "postcode": postcode, "aantalInwoners": inhabitants },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
                    }
                })
            })
            .collect();
        let collection = json!({ "type": "FeatureCollection", "features": features });
        let path = dir.join(name);
        fs::write(&path, collection.to_string()).unwrap();
        path
    }

    fn write_events(dir: &Path, name: &str) -> PathBuf {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "Referentienummer": "R-001",
                    "Datum": "2025-03-09",
                    "Naam": "Market",
                    "Lokatie": "Town square"
                },
                "geometry": { "type": "Point", "coordinates": [4.97, 51.83] }
            }]
        });
        let path = dir.join(name);
        fs::write(&path, collection.to_string()).unwrap();
        path
    }

    fn test_config(snapshots: Vec<SnapshotInput>, events: PathBuf) -> AppConfig {
        AppConfig {
            input: InputConfig {
                snapshots,
                events,
                events_crs: None,
                postcode_property: "postcode".to_string(),
                inhabitants_property: "aantalInwoners".to_string(),
                reference_property: "Referentienummer".to_string(),
                date_property: "Datum".to_string(),
                name_property: "Naam".to_string(),
                location_property: "Lokatie".to_string(),
            },
            figure: FigureConfig::default(),
            style: StyleConfig::default(),
            server: ServerConfig::default(),
        }
    }

    fn snapshot_input(path: PathBuf, timestamp: &str) -> SnapshotInput {
        SnapshotInput {
            path,
            timestamp: timestamp.to_string(),
            crs: None,
        }
    }

    #[test]
    fn test_combines_rows_and_aggregates_per_timestamp() {
        let dir = tempdir().unwrap();
        let later = write_snapshot(dir.path(), "1030.geojson", &[("4205AB", 300)]);
        let earlier =
            write_snapshot(dir.path(), "0930.geojson", &[("4201AA", 100), ("4202AB", 150)]);
        let events = write_events(dir.path(), "events.geojson");

        // Configuration order deliberately differs from label order.
        let config = test_config(
            vec![
                snapshot_input(later, "10:30"),
                snapshot_input(earlier, "09:30"),
            ],
            events,
        );
        let dataset = load_dataset(&config).unwrap();

        // No rows dropped or duplicated; configuration order preserved.
        assert_eq!(dataset.areas.len(), 3);
        assert_eq!(dataset.areas[0].postcode, "4205AB");
        assert_eq!(dataset.areas[0].timestamp, "10:30");
        assert_eq!(dataset.areas[1].postcode, "4201AA");
        assert_eq!(dataset.areas[2].postcode, "4202AB");

        // Labels are sorted regardless of configuration order.
        assert_eq!(dataset.timestamps, vec!["09:30", "10:30"]);
        assert_eq!(dataset.totals["09:30"], 250);
        assert_eq!(dataset.totals["10:30"], 300);

        assert_eq!(dataset.events.len(), 1);
        assert_eq!(dataset.events[0].reference, "R-001");
        assert_eq!(dataset.events[0].name, "Market");
    }

    #[test]
    fn test_zero_row_snapshot_still_gets_an_aggregate() {
        let dir = tempdir().unwrap();
        let full = write_snapshot(dir.path(), "0930.geojson", &[("4201AA", 500)]);
        let empty = write_snapshot(dir.path(), "1030.geojson", &[]);
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(
            vec![
                snapshot_input(full, "09:30"),
                snapshot_input(empty, "10:30"),
            ],
            events,
        );
        let dataset = load_dataset(&config).unwrap();

        assert_eq!(dataset.areas.len(), 1);
        assert_eq!(dataset.timestamps, vec!["09:30", "10:30"]);
        assert_eq!(dataset.totals["10:30"], 0);
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = tempdir().unwrap();
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "postcode": "4201AA" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }]
        });
        let path = dir.path().join("broken.geojson");
        fs::write(&path, collection.to_string()).unwrap();
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(vec![snapshot_input(path, "09:30")], events);
        let err = load_dataset(&config).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("aantalInwoners"), "unexpected error: {}", chain);
        assert!(chain.contains("broken.geojson"), "unexpected error: {}", chain);
    }

    #[test]
    fn test_negative_count_is_fatal() {
        let dir = tempdir().unwrap();
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "postcode": "4201AA", "aantalInwoners": -5 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }]
        });
        let path = dir.path().join("negative.geojson");
        fs::write(&path, collection.to_string()).unwrap();
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(vec![snapshot_input(path, "09:30")], events);
        assert!(load_dataset(&config).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(
            vec![snapshot_input(dir.path().join("missing.geojson"), "09:30")],
            events,
        );
        let err = load_dataset(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.geojson"));
    }

    #[test]
    fn test_shapefile_without_declared_crs_is_fatal() {
        let dir = tempdir().unwrap();
        let events = write_events(dir.path(), "events.geojson");

        // The CRS precondition fails before the file is ever opened.
        let config = test_config(
            vec![snapshot_input(dir.path().join("snap.shp"), "09:30")],
            events,
        );
        let err = load_dataset(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("coordinate reference system"));
    }

    #[test]
    fn test_unrecognized_crs_member_is_fatal() {
        let dir = tempdir().unwrap();
        let collection = json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:FOO::1" } },
            "features": []
        });
        let path = dir.path().join("odd_crs.geojson");
        fs::write(&path, collection.to_string()).unwrap();
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(vec![snapshot_input(path, "09:30")], events);
        let err = load_dataset(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("odd_crs.geojson"));
    }

    #[test]
    fn test_crs84_member_is_accepted_as_wgs84() {
        let dir = tempdir().unwrap();
        let collection = json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
            "features": [{
                "type": "Feature",
                "properties": { "postcode": "4201AA", "aantalInwoners": 12 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }]
        });
        let path = dir.path().join("crs84.geojson");
        fs::write(&path, collection.to_string()).unwrap();
        let events = write_events(dir.path(), "events.geojson");

        let config = test_config(vec![snapshot_input(path, "09:30")], events);
        let dataset = load_dataset(&config).unwrap();
        assert_eq!(dataset.areas[0].inhabitants, 12);
    }

    #[test]
    fn test_non_point_event_geometry_is_fatal() {
        let dir = tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "0930.geojson", &[("4201AA", 1)]);
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "Referentienummer": "R-001",
                    "Datum": "2025-03-09",
                    "Naam": "Market",
                    "Lokatie": "Town square"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }]
        });
        let events = dir.path().join("events.geojson");
        fs::write(&events, collection.to_string()).unwrap();

        let config = test_config(vec![snapshot_input(snapshot, "09:30")], events);
        let err = load_dataset(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("point"));
    }

    #[test]
    fn test_parse_crs_name_forms() {
        assert_eq!(parse_crs_name("EPSG:4326").unwrap(), 4326);
        assert_eq!(parse_crs_name("EPSG::28992").unwrap(), 28992);
        assert_eq!(parse_crs_name("urn:ogc:def:crs:EPSG::28992").unwrap(), 28992);
        assert_eq!(parse_crs_name("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(), 4326);
        assert!(parse_crs_name("LAMB93").is_err());
        assert!(parse_crs_name("EPSG:abc").is_err());
    }
}
