use std::path::Path;

use anyhow::{bail, Context, Result};
use geojson::{GeoJson, Geometry, Value};

// ---------------------------------------------------------------------------
// Region boundary – the polygon clipping every spatial query
// ---------------------------------------------------------------------------

/// Boundary bundled with the binary.
const BUILTIN_REGION: &str = include_str!("../../assets/region.geojson");

/// The polygon (or multipolygon) restricting all raster queries.
///
/// Holds both the raw GeoJSON geometry (sent to the service untouched) and
/// the flattened rings used to draw the outline on the map panel.
#[derive(Debug, Clone)]
pub struct RegionBoundary {
    name: String,
    /// GeoJSON geometry object, forwarded verbatim in service requests.
    geometry: serde_json::Value,
    /// All rings (exterior and holes) as lon/lat pairs.
    rings: Vec<Vec<[f64; 2]>>,
}

impl RegionBoundary {
    /// The boundary bundled with the binary. Validated by tests, so a parse
    /// failure here is a build defect.
    pub fn builtin() -> Self {
        Self::from_geojson(BUILTIN_REGION, "builtin region")
            .expect("embedded region boundary is valid")
    }

    /// Load a boundary from a GeoJSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading region file {}", path.display()))?;
        let fallback = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("region");
        Self::from_geojson(&text, fallback)
    }

    /// Parse a GeoJSON document (Feature, FeatureCollection, or Geometry).
    ///
    /// A FeatureCollection contributes only its first feature with a
    /// geometry; the boundary is a single region by construction.
    pub fn from_geojson(text: &str, fallback_name: &str) -> Result<Self> {
        let parsed: GeoJson = text.parse().context("parsing region GeoJSON")?;

        let (geometry, name) = match parsed {
            GeoJson::Geometry(geometry) => (geometry, None),
            GeoJson::Feature(feature) => {
                let name = feature_name(&feature);
                match feature.geometry {
                    Some(geometry) => (geometry, name),
                    None => bail!("region feature has no geometry"),
                }
            }
            GeoJson::FeatureCollection(collection) => {
                let feature = collection
                    .features
                    .into_iter()
                    .find(|f| f.geometry.is_some())
                    .context("region collection has no feature with a geometry")?;
                let name = feature_name(&feature);
                let geometry = feature
                    .geometry
                    .context("region collection feature lost its geometry")?;
                (geometry, name)
            }
        };

        let rings = flatten_rings(&geometry)?;
        if rings.iter().all(|ring| ring.len() < 3) {
            bail!("region boundary has no ring with at least 3 vertices");
        }

        let geometry =
            serde_json::to_value(&geometry).context("serializing region geometry")?;

        Ok(Self {
            name: name.unwrap_or_else(|| fallback_name.to_string()),
            geometry,
            rings,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// GeoJSON geometry for service requests.
    pub fn geometry(&self) -> &serde_json::Value {
        &self.geometry
    }

    /// Rings as lon/lat pairs for outline drawing.
    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    /// Bounding box `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for ring in &self.rings {
            for [lon, lat] in ring {
                min[0] = min[0].min(*lon);
                min[1] = min[1].min(*lat);
                max[0] = max[0].max(*lon);
                max[1] = max[1].max(*lat);
            }
        }
        (min[0], min[1], max[0], max[1])
    }
}

fn feature_name(feature: &geojson::Feature) -> Option<String> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Collect every ring of a Polygon or MultiPolygon as lon/lat pairs.
fn flatten_rings(geometry: &Geometry) -> Result<Vec<Vec<[f64; 2]>>> {
    let polygons: Vec<&Vec<Vec<Vec<f64>>>> = match &geometry.value {
        Value::Polygon(polygon) => vec![polygon],
        Value::MultiPolygon(multi) => multi.iter().collect(),
        other => bail!("region geometry must be Polygon or MultiPolygon, got {other:?}"),
    };

    let mut rings = Vec::new();
    for polygon in polygons {
        for ring in polygon {
            let points: Vec<[f64; 2]> = ring
                .iter()
                .filter(|position| position.len() >= 2)
                .map(|position| [position[0], position[1]])
                .collect();
            rings.push(points);
        }
    }
    Ok(rings)
}
