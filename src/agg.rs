use std::collections::{BTreeMap, HashMap};

use crate::data::catalog::ClassCatalog;
use crate::data::model::{pixels_to_km2, AreaRecord, M2_PER_KM2};
use crate::data::region::RegionBoundary;
use crate::service::{RasterService, ServiceError};

// ---------------------------------------------------------------------------
// Area aggregation
// ---------------------------------------------------------------------------

/// Band holding one year's classification.
pub fn band_name(year: i32) -> String {
    format!("classification_{year}")
}

/// Aggregates remote reductions into [`AreaRecord`]s.
///
/// Results are memoized per exact argument tuple for the lifetime of the
/// session; [`AreaAggregator::clear_cache`] is the only invalidation (used
/// when the region boundary changes).
pub struct AreaAggregator {
    service: Box<dyn RasterService>,
    /// (year, code) → km², fed by the per-class path.
    area_cache: HashMap<(i32, u16), f64>,
    /// year → histogram, fed by the all-classes path.
    histogram_cache: HashMap<i32, BTreeMap<u16, f64>>,
}

impl AreaAggregator {
    pub fn new(service: Box<dyn RasterService>) -> Self {
        Self {
            service,
            area_cache: HashMap::new(),
            histogram_cache: HashMap::new(),
        }
    }

    /// Forget every memoized reduction.
    pub fn clear_cache(&mut self) {
        self.area_cache.clear();
        self.histogram_cache.clear();
    }

    /// One masked-area reduction per (year, class) pair.
    ///
    /// Output order is iteration order: years, then classes. The fan-out is
    /// O(|years| × |classes|) remote calls minus whatever the cache absorbs;
    /// the year cap is the caller's job, not enforced here.
    pub fn area_by_class(
        &mut self,
        years: &[i32],
        codes: &[u16],
        catalog: &ClassCatalog,
        region: &RegionBoundary,
    ) -> Result<Vec<AreaRecord>, ServiceError> {
        let mut records = Vec::with_capacity(years.len() * codes.len());
        for &year in years {
            let band = band_name(year);
            for &code in codes {
                let area_km2 = match self.area_cache.get(&(year, code)).copied() {
                    Some(cached) => cached,
                    None => {
                        let area_m2 = self.service.masked_area_m2(&band, code, region)?;
                        let area_km2 = area_m2 / M2_PER_KM2;
                        self.area_cache.insert((year, code), area_km2);
                        area_km2
                    }
                };
                records.push(AreaRecord {
                    year,
                    code,
                    class_name: catalog.name_or_unknown(code),
                    area_km2,
                });
            }
        }
        Ok(records)
    }

    /// One histogram reduction per year, expanded into per-class records.
    ///
    /// Codes outside the catalog keep their count under the "Unknown" label.
    pub fn area_all_classes(
        &mut self,
        years: &[i32],
        catalog: &ClassCatalog,
        region: &RegionBoundary,
    ) -> Result<Vec<AreaRecord>, ServiceError> {
        let mut records = Vec::new();
        for &year in years {
            if !self.histogram_cache.contains_key(&year) {
                let histogram = self.service.class_histogram(&band_name(year), region)?;
                self.histogram_cache.insert(year, histogram);
            }
            let histogram = &self.histogram_cache[&year];
            for (&code, &count) in histogram {
                records.push(AreaRecord {
                    year,
                    code,
                    class_name: catalog.name_or_unknown(code),
                    area_km2: pixels_to_km2(count),
                });
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::data::catalog::UNKNOWN_LABEL;
    use crate::service::testing::MockRaster;

    fn fixture() -> (Rc<MockRaster>, AreaAggregator, ClassCatalog, RegionBoundary) {
        // 2023: urban 1500 px, forest 90_000 px, unknown code 7: 10 px
        // 1985: urban 400 px, forest 110_000 px
        let mock = Rc::new(
            MockRaster::new()
                .with_band(
                    "classification_2023",
                    &[(24, 1_500.0), (3, 90_000.0), (7, 10.0)],
                )
                .with_band("classification_1985", &[(24, 400.0), (3, 110_000.0)]),
        );
        let aggregator = AreaAggregator::new(Box::new(mock.clone()));
        (mock, aggregator, ClassCatalog::builtin(), RegionBoundary::builtin())
    }

    #[test]
    fn produces_one_record_per_pair_in_order() {
        let (mock, mut aggregator, catalog, region) = fixture();
        let records = aggregator
            .area_by_class(&[1985, 2023], &[3, 24], &catalog, &region)
            .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(*mock.area_calls.borrow(), 4);
        let order: Vec<(i32, u16)> = records.iter().map(|r| (r.year, r.code)).collect();
        assert_eq!(order, vec![(1985, 3), (1985, 24), (2023, 3), (2023, 24)]);
        assert!(records.iter().all(|r| r.area_km2 >= 0.0));
        // 1500 px × 900 m² = 1.35 km²
        assert!((records[3].area_km2 - 1.35).abs() < 1e-9);
        assert_eq!(records[3].class_name, "Urban Area");
    }

    #[test]
    fn repeated_pairs_hit_the_cache() {
        let (mock, mut aggregator, catalog, region) = fixture();
        aggregator
            .area_by_class(&[2023], &[24, 3], &catalog, &region)
            .unwrap();
        assert_eq!(*mock.area_calls.borrow(), 2);

        // same request again: no new remote calls, same records
        let records = aggregator
            .area_by_class(&[2023], &[24, 3], &catalog, &region)
            .unwrap();
        assert_eq!(*mock.area_calls.borrow(), 2);
        assert_eq!(records.len(), 2);

        aggregator.clear_cache();
        aggregator
            .area_by_class(&[2023], &[24], &catalog, &region)
            .unwrap();
        assert_eq!(*mock.area_calls.borrow(), 3);
    }

    #[test]
    fn histogram_path_is_one_call_per_year() {
        let (mock, mut aggregator, catalog, region) = fixture();
        let records = aggregator
            .area_all_classes(&[1985, 2023], &catalog, &region)
            .unwrap();

        assert_eq!(*mock.histogram_calls.borrow(), 2);
        assert_eq!(*mock.area_calls.borrow(), 0);
        // 2 classes in 1985, 3 values in 2023
        assert_eq!(records.len(), 5);

        // second year again: cached
        aggregator
            .area_all_classes(&[2023], &catalog, &region)
            .unwrap();
        assert_eq!(*mock.histogram_calls.borrow(), 2);
    }

    #[test]
    fn unknown_histogram_codes_get_the_placeholder() {
        let (_mock, mut aggregator, catalog, region) = fixture();
        let records = aggregator
            .area_all_classes(&[2023], &catalog, &region)
            .unwrap();
        let unknown: Vec<_> = records.iter().filter(|r| r.code == 7).collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].class_name, UNKNOWN_LABEL);
        // 10 px × 900 m² = 0.009 km²
        assert!((unknown[0].area_km2 - 0.009).abs() < 1e-12);
    }

    #[test]
    fn histogram_and_per_class_totals_agree() {
        let (_mock, mut aggregator, catalog, region) = fixture();
        let codes = vec![3, 24];

        let per_class = aggregator
            .area_by_class(&[2023], &codes, &catalog, &region)
            .unwrap();
        let per_class_total: f64 = per_class.iter().map(|r| r.area_km2).sum();

        let histogram = aggregator
            .area_all_classes(&[2023], &catalog, &region)
            .unwrap();
        let histogram_total: f64 = histogram
            .iter()
            .filter(|r| codes.contains(&r.code))
            .map(|r| r.area_km2)
            .sum();

        assert!((per_class_total - histogram_total).abs() < 1e-9);
    }

    #[test]
    fn service_failures_propagate() {
        let mock = Rc::new(MockRaster::failing());
        let mut aggregator = AreaAggregator::new(Box::new(mock));
        let catalog = ClassCatalog::builtin();
        let region = RegionBoundary::builtin();
        assert!(aggregator
            .area_by_class(&[2023], &[24], &catalog, &region)
            .is_err());
        assert!(aggregator.area_all_classes(&[2023], &catalog, &region).is_err());
    }
}
