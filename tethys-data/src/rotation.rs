//! Plate-rotation service client
//!
//! The rotation model itself is opaque to the pipeline; the only contract is
//! `reconstruct(points, age) -> paleo points`. The production implementation
//! talks to a GPlates-style web service; tests substitute a deterministic
//! rotator through the same trait.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Sentinel the reconstruction service returns for points it cannot place
/// at the requested age (e.g. the age predates the model's plate coverage).
const UNRESOLVED_SENTINEL: f64 = 999.99;

/// Seam for coordinate reconstruction.
///
/// One call covers many points sharing a single age. Output is aligned with
/// input; `None` marks a point the model could not resolve at that age.
pub trait PaleoRotator {
    fn reconstruct(&self, points: &[(f64, f64)], age_ma: f64) -> Result<Vec<Option<(f64, f64)>>>;

    /// Model identifier, for provenance and logging
    fn model(&self) -> &str;
}

/// HTTP client for a GPlates web service
pub struct GwsClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct MultiPointResponse {
    #[serde(rename = "type")]
    geometry_type: String,
    coordinates: Vec<Vec<f64>>,
}

impl GwsClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tethys/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// Request URL for one batch
    fn reconstruct_url(&self, points: &[(f64, f64)], age_ma: f64) -> String {
        let coords = points
            .iter()
            .map(|(lng, lat)| format!("{},{}", lng, lat))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/reconstruct/reconstruct_points/?points={}&time={}&model={}",
            self.base_url, coords, age_ma, self.model
        )
    }

    /// Translate the GeoJSON response into aligned optional points
    fn parse_response(body: &str, expected: usize) -> Result<Vec<Option<(f64, f64)>>> {
        let response: MultiPointResponse =
            serde_json::from_str(body).context("malformed reconstruction response")?;
        if response.geometry_type != "MultiPoint" {
            bail!(
                "unexpected reconstruction geometry: {}",
                response.geometry_type
            );
        }
        if response.coordinates.len() != expected {
            bail!(
                "reconstruction returned {} points, expected {}",
                response.coordinates.len(),
                expected
            );
        }

        Ok(response
            .coordinates
            .iter()
            .map(|pair| match pair.as_slice() {
                [lng, lat]
                    if *lng != UNRESOLVED_SENTINEL
                        && *lat != UNRESOLVED_SENTINEL
                        && lng.abs() <= 180.0
                        && lat.abs() <= 90.0 =>
                {
                    Some((*lng, *lat))
                }
                _ => None,
            })
            .collect())
    }
}

impl PaleoRotator for GwsClient {
    fn reconstruct(&self, points: &[(f64, f64)], age_ma: f64) -> Result<Vec<Option<(f64, f64)>>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.reconstruct_url(points, age_ma);
        debug!(age_ma, points = points.len(), "requesting reconstruction");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reconstruct points at {} Ma", age_ma))?;

        if !response.status().is_success() {
            bail!(
                "reconstruction service returned status {} at {} Ma",
                response.status(),
                age_ma
            );
        }

        let body = response.text()?;
        Self::parse_response(&body, points.len())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
