use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RasterService, ServiceError};
use crate::config::ServiceConfig;
use crate::data::region::RegionBoundary;

// ---------------------------------------------------------------------------
// HTTP client for the raster statistics endpoint
// ---------------------------------------------------------------------------

const SUM_REDUCER: &str = "sum";
const HISTOGRAM_REDUCER: &str = "frequencyHistogram";

/// Blocking HTTP client for the reduce endpoint.
pub struct RasterClient {
    base_url: String,
    asset: String,
    scale_m: f64,
    max_pixels: u64,
    http: reqwest::blocking::Client,
}

impl RasterClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            asset: config.asset.clone(),
            scale_m: config.scale_m,
            max_pixels: config.max_pixels,
            http,
        })
    }

    fn reduce(
        &self,
        band: &str,
        reducer: &str,
        class_code: Option<u16>,
        region: &RegionBoundary,
    ) -> Result<ReduceResponse, ServiceError> {
        let url = format!("{}/v1/reduce", self.base_url);
        let body = ReduceRequest {
            asset: &self.asset,
            band,
            reducer,
            class_code,
            geometry: region.geometry(),
            scale: self.scale_m,
            max_pixels: self.max_pixels,
        };

        let response = self.http.post(&url).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ReduceResponse>()?)
    }
}

/// Request body for `/v1/reduce`.
#[derive(Serialize)]
struct ReduceRequest<'a> {
    asset: &'a str,
    band: &'a str,
    reducer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_code: Option<u16>,
    geometry: &'a serde_json::Value,
    scale: f64,
    max_pixels: u64,
}

/// Response body: statistics keyed by band name.
#[derive(Deserialize)]
struct ReduceResponse {
    #[serde(default)]
    statistics: BTreeMap<String, serde_json::Value>,
}

impl RasterService for RasterClient {
    fn masked_area_m2(
        &self,
        band: &str,
        code: u16,
        region: &RegionBoundary,
    ) -> Result<f64, ServiceError> {
        let response = self.reduce(band, SUM_REDUCER, Some(code), region)?;

        match response.statistics.get(band) {
            Some(value) => value.as_f64().ok_or_else(|| {
                ServiceError::Decode(format!("area sum for {band} is not numeric: {value}"))
            }),
            None => {
                // The backend omits the key when the mask is empty; treat it
                // as zero area rather than failing the whole refresh.
                log::debug!("no '{band}' statistic for class {code}, assuming 0 m²");
                Ok(0.0)
            }
        }
    }

    fn class_histogram(
        &self,
        band: &str,
        region: &RegionBoundary,
    ) -> Result<BTreeMap<u16, f64>, ServiceError> {
        let response = self.reduce(band, HISTOGRAM_REDUCER, None, region)?;

        let Some(value) = response.statistics.get(band) else {
            log::debug!("no '{band}' histogram, assuming empty region");
            return Ok(BTreeMap::new());
        };
        let object = value.as_object().ok_or_else(|| {
            ServiceError::Decode(format!("histogram for {band} is not an object"))
        })?;

        let mut histogram = BTreeMap::new();
        for (key, count) in object {
            let Ok(code) = key.parse::<u16>() else {
                log::warn!("skipping non-numeric histogram key '{key}' in {band}");
                continue;
            };
            let count = count.as_f64().ok_or_else(|| {
                ServiceError::Decode(format!("count for class {code} is not numeric: {count}"))
            })?;
            histogram.insert(code, count);
        }
        Ok(histogram)
    }
}
