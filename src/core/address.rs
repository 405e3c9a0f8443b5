use crate::domain::model::{AddressRecord, PostalCode};
use crate::domain::ports::AddressLookup;
use crate::utils::error::{FleetError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_ADDRESS_ENDPOINT: &str = "https://viacep.com.br";

/// Address record key holding the municipality name.
pub const MUNICIPALITY_NAME_FIELD: &str = "localidade";
/// Address record key holding the municipal identifier (with check digit).
pub const MUNICIPAL_ID_FIELD: &str = "ibge";
/// Address record key holding the state abbreviation.
pub const STATE_FIELD: &str = "uf";

/// Client for the postal-code lookup service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn lookup_url(&self, postal_code: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, postal_code)
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_ENDPOINT)
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<AddressRecord> {
        let url = self.lookup_url(postal_code);
        tracing::debug!("Making address request to: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FleetError::LookupError {
                url: url.clone(),
                source,
            })?;

        tracing::debug!("Address response status: {}", response.status());
        if !response.status().is_success() {
            return Err(FleetError::NotFoundError {
                postal_code: postal_code.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FleetError::LookupError {
                url: url.clone(),
                source,
            })?;
        let body: Value = serde_json::from_slice(&bytes)?;

        record_from_body(postal_code, body)
    }
}

/// Turns a decoded body into an address record, treating the in-body error
/// flag the same way as a non-success status.
pub fn record_from_body(postal_code: &PostalCode, body: Value) -> Result<AddressRecord> {
    let fields = match body {
        Value::Object(fields) => fields,
        _ => {
            return Err(FleetError::NotFoundError {
                postal_code: postal_code.to_string(),
            })
        }
    };

    if fields.get("erro").is_some_and(is_truthy) {
        tracing::warn!("Address service flagged postal code {} as unknown", postal_code);
        return Err(FleetError::NotFoundError {
            postal_code: postal_code.to_string(),
        });
    }

    Ok(AddressRecord::new(fields))
}

// The service has sent both `true` and `"true"` over time.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Returns the string at `key`, or `MissingFieldError` if it is absent.
///
/// Numbers are rendered as their decimal text so a numeric identifier still
/// works as a query key.
pub fn extract_field(record: &AddressRecord, key: &str) -> Result<String> {
    match record.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(FleetError::MissingFieldError {
            field: key.to_string(),
        }),
    }
}
