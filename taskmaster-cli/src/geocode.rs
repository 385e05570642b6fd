//! Address lookups against the Nominatim service
//!
//! Best-effort only: forward lookup resolves an address to coordinates (or
//! nothing), reverse lookup resolves coordinates to a display address and
//! degrades to a fixed sentinel when the service fails or has no answer.

use serde::Deserialize;

use crate::error::{CliError, Result};

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

/// Sentinel returned when a reverse lookup cannot produce an address
pub const UNKNOWN_ADDRESS: &str = "Unknown address";

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
}

/// Nominatim client
pub struct Geocoder {
    client: reqwest::Client,
}

impl Geocoder {
    pub fn new() -> Result<Self> {
        // Nominatim's usage policy requires an identifying user agent
        let client = reqwest::Client::builder()
            .user_agent(concat!("taskmaster/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Resolve an address to coordinates; `None` when the service has no match
    pub async fn forward(&self, address: &str) -> Result<Option<(f64, f64)>> {
        let res = self
            .client
            .get(format!("{}/search", NOMINATIM_BASE))
            .query(&[("format", "json"), ("q", address), ("limit", "1")])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(CliError::network(format!(
                "Address search failed with status {}",
                res.status()
            )));
        }

        let results: Vec<SearchResult> = res.json().await?;
        let Some(first) = results.first() else {
            return Ok(None);
        };

        let lat = first
            .lat
            .parse::<f64>()
            .map_err(|e| CliError::parse_with_source("Invalid latitude in lookup result", e))?;
        let lon = first
            .lon
            .parse::<f64>()
            .map_err(|e| CliError::parse_with_source("Invalid longitude in lookup result", e))?;

        log::debug!("Resolved '{}' to ({}, {})", address, lat, lon);
        Ok(Some((lat, lon)))
    }

    /// Resolve coordinates to a display address
    ///
    /// Never fails: any service error yields the unknown-address sentinel.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> String {
        match self.try_reverse(latitude, longitude).await {
            Ok(Some(address)) => address,
            Ok(None) => UNKNOWN_ADDRESS.to_string(),
            Err(err) => {
                log::warn!(
                    "Reverse lookup for ({}, {}) failed: {}",
                    latitude,
                    longitude,
                    err
                );
                UNKNOWN_ADDRESS.to_string()
            }
        }
    }

    async fn try_reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let res = self
            .client
            .get(format!("{}/reverse", NOMINATIM_BASE))
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(CliError::network(format!(
                "Reverse lookup failed with status {}",
                res.status()
            )));
        }

        let result: ReverseResult = res.json().await?;
        Ok(result.display_name)
    }
}
