use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Area records – one aggregated row per (year, class)
// ---------------------------------------------------------------------------

/// Ground edge of one raster cell, meters.
pub const PIXEL_EDGE_M: f64 = 30.0;

/// Ground area of one raster cell, square meters.
pub const PIXEL_AREA_M2: f64 = PIXEL_EDGE_M * PIXEL_EDGE_M;

/// Square meters per square kilometer.
pub const M2_PER_KM2: f64 = 1e6;

/// Convert a pixel count into square kilometers.
pub fn pixels_to_km2(count: f64) -> f64 {
    count * PIXEL_AREA_M2 / M2_PER_KM2
}

/// One aggregated measurement: how much of the region one class covered in
/// one year.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRecord {
    pub year: i32,
    pub code: u16,
    pub class_name: String,
    pub area_km2: f64,
}

/// Group records into per-class series for plotting, keyed by class code.
///
/// Within each series the points keep the records' year order.
pub fn series_by_class(records: &[AreaRecord]) -> BTreeMap<u16, Vec<&AreaRecord>> {
    let mut series: BTreeMap<u16, Vec<&AreaRecord>> = BTreeMap::new();
    for record in records {
        series.entry(record.code).or_default().push(record);
    }
    series
}

/// Sum of all record areas for one year.
pub fn total_for_year(records: &[AreaRecord], year: i32) -> f64 {
    records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.area_km2)
        .sum()
}
