use crate::domain::model::{RawStatisticsResponse, NATIONWIDE_REGION_CODE};
use crate::domain::ports::StatisticsSource;
use crate::utils::error::{FleetError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_STATISTICS_ENDPOINT: &str = "https://servicodados.ibge.gov.br";

/// Vehicle fleet indicator.
pub const DEFAULT_FLEET_INDICATOR: &str = "28122";

/// Percent-encoded `|` separating the region keys in the results path.
const REGION_SEPARATOR: &str = "%7C";

/// Client for the statistical-indicator service.
#[derive(Debug, Clone)]
pub struct IbgeClient {
    client: Client,
    base_url: String,
    indicator: String,
}

impl IbgeClient {
    pub fn new(base_url: impl Into<String>, indicator: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, indicator)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        indicator: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            indicator: indicator.into(),
        }
    }

    /// Results URL comparing the municipality against the nationwide aggregate.
    pub fn results_url(&self, municipal_id: &str) -> String {
        format!(
            "{}/api/v1/pesquisas/indicadores/{}/resultados/{}{}{}",
            self.base_url, self.indicator, NATIONWIDE_REGION_CODE, REGION_SEPARATOR, municipal_id
        )
    }
}

impl Default for IbgeClient {
    fn default() -> Self {
        Self::new(DEFAULT_STATISTICS_ENDPOINT, DEFAULT_FLEET_INDICATOR)
    }
}

#[async_trait]
impl StatisticsSource for IbgeClient {
    async fn fetch(&self, municipal_id: &str) -> Result<RawStatisticsResponse> {
        if municipal_id.is_empty() {
            return Err(FleetError::InvalidInputError {
                message: "adapted municipal identifier is empty".to_string(),
            });
        }

        let url = self.results_url(municipal_id);
        tracing::debug!("Making statistics request to: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FleetError::LookupError {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!("Statistics response status: {}", status);
        if !status.is_success() {
            return Err(FleetError::RequestError {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FleetError::LookupError {
                url: url.clone(),
                source,
            })?;
        let body: RawStatisticsResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!("Statistics response has {} top-level entries", body.len());

        Ok(body)
    }
}
