/// Remote raster statistics service.
///
/// The dashboard never touches pixels itself: every reduction runs on the
/// service side, clipped to the region boundary, and only scalar sums or
/// value histograms come back.

pub mod client;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::data::region::RegionBoundary;

pub use client::RasterClient;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed statistics: {0}")]
    Decode(String),
}

/// Blocking seam to the raster statistics backend.
///
/// Both operations block the caller until the service answers; timeouts are
/// whatever the underlying client enforces.
pub trait RasterService {
    /// Sum of pixel areas (m²) where `band == code`, clipped to the region.
    ///
    /// A statistics response without the expected key means zero area, not an
    /// error.
    fn masked_area_m2(
        &self,
        band: &str,
        code: u16,
        region: &RegionBoundary,
    ) -> Result<f64, ServiceError>;

    /// Frequency histogram of band values within the region: code → pixel
    /// count. Counts are fractional because edge pixels contribute partially.
    fn class_histogram(
        &self,
        band: &str,
        region: &RegionBoundary,
    ) -> Result<BTreeMap<u16, f64>, ServiceError>;
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use super::{RasterService, ServiceError};
    use crate::data::model::PIXEL_AREA_M2;
    use crate::data::region::RegionBoundary;

    /// In-memory service: per-band histograms, area sums derived from them,
    /// every call counted.
    pub struct MockRaster {
        /// band → (code → pixel count)
        histograms: BTreeMap<String, BTreeMap<u16, f64>>,
        pub area_calls: RefCell<usize>,
        pub histogram_calls: RefCell<usize>,
        pub fail: bool,
    }

    impl MockRaster {
        pub fn new() -> Self {
            Self {
                histograms: BTreeMap::new(),
                area_calls: RefCell::new(0),
                histogram_calls: RefCell::new(0),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        pub fn with_band(mut self, band: &str, counts: &[(u16, f64)]) -> Self {
            self.histograms
                .insert(band.to_string(), counts.iter().copied().collect());
            self
        }

        pub fn total_calls(&self) -> usize {
            *self.area_calls.borrow() + *self.histogram_calls.borrow()
        }
    }

    // Tests keep a second handle on the mock to read its call counters after
    // handing ownership to the aggregator.
    impl RasterService for std::rc::Rc<MockRaster> {
        fn masked_area_m2(
            &self,
            band: &str,
            code: u16,
            region: &RegionBoundary,
        ) -> Result<f64, ServiceError> {
            (**self).masked_area_m2(band, code, region)
        }

        fn class_histogram(
            &self,
            band: &str,
            region: &RegionBoundary,
        ) -> Result<BTreeMap<u16, f64>, ServiceError> {
            (**self).class_histogram(band, region)
        }
    }

    impl RasterService for MockRaster {
        fn masked_area_m2(
            &self,
            band: &str,
            code: u16,
            _region: &RegionBoundary,
        ) -> Result<f64, ServiceError> {
            *self.area_calls.borrow_mut() += 1;
            if self.fail {
                return Err(ServiceError::Status {
                    status: 500,
                    body: "mock failure".to_string(),
                });
            }
            // Missing band or code behaves like the real service's missing
            // statistic: zero area.
            let count = self
                .histograms
                .get(band)
                .and_then(|h| h.get(&code))
                .copied()
                .unwrap_or(0.0);
            Ok(count * PIXEL_AREA_M2)
        }

        fn class_histogram(
            &self,
            band: &str,
            _region: &RegionBoundary,
        ) -> Result<BTreeMap<u16, f64>, ServiceError> {
            *self.histogram_calls.borrow_mut() += 1;
            if self.fail {
                return Err(ServiceError::Status {
                    status: 500,
                    body: "mock failure".to_string(),
                });
            }
            Ok(self.histograms.get(band).cloned().unwrap_or_default())
        }
    }
}
