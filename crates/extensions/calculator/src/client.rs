//! HTTP client for the team-calculator page.

use std::time::Duration;

use f1sync_core::{compute_optimal, CalculatorData, OptimalTeam};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::CalculatorError;
use crate::payload::{extract_json_object, extract_next_payload};
use crate::prices::{price_maps, PriceMaps};

pub const DEFAULT_CALCULATOR_URL: &str = "https://f1fantasytools.com/team-calculator";

/// The page serves its data only to browser-looking clients.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// Optimal team together with the prices it was computed from.
#[derive(Debug, Clone)]
pub struct CalculatorResult {
    pub optimal: OptimalTeam,
    pub prices: PriceMaps,
}

/// Client for one calculator page URL.
pub struct CalculatorClient {
    client: Client,
    url: Url,
}

impl CalculatorClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CalculatorError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: Url::parse(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the raw page HTML.
    pub async fn fetch(&self) -> Result<String, CalculatorError> {
        debug!("Fetching calculator page {}", self.url);
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalculatorError::Status {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch and decode the embedded calculator data.
    pub async fn load_data(&self) -> Result<CalculatorData, CalculatorError> {
        let html = self.fetch().await?;
        let payload = extract_next_payload(&html)?;
        let object = extract_json_object(&payload)?;
        let data: CalculatorData = serde_json::from_value(object)?;

        debug!(
            drivers = data.drivers.len(),
            constructors = data.constructors.len(),
            sims = data.analyst_sims.len(),
            "Decoded calculator data"
        );
        Ok(data)
    }

    /// Optimal team under `max_budget` plus the listed prices.
    pub async fn load_optimal(&self, max_budget: f64) -> Result<CalculatorResult, CalculatorError> {
        let data = self.load_data().await?;
        let prices = price_maps(&data);
        let optimal = compute_optimal(max_budget, &data)?;

        info!(
            "Optimal team under {}M: {} + {}, boost {}, {} points for {}M",
            max_budget,
            optimal.drivers.join("/"),
            optimal.constructors.join("/"),
            optimal.boost.as_deref().unwrap_or("-"),
            optimal.expected_points,
            optimal.total_cost
        );
        Ok(CalculatorResult { optimal, prices })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
