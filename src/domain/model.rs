use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Region code the statistics service uses for the whole country.
pub const NATIONWIDE_REGION_CODE: &str = "0";

/// Normalized 8-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Callers must pass exactly eight ASCII digits; see `core::normalize`.
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()));
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field mapping returned by the address service, accessed by key only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRecord {
    fields: Map<String, Value>,
}

impl AddressRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Raw statistics body: the top-level JSON array, untouched.
pub type RawStatisticsResponse = Vec<Value>;

/// One (region, year, value) observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRow {
    #[serde(rename = "Localidade")]
    pub region_code: String,
    #[serde(rename = "Ano")]
    pub year: i32,
    #[serde(rename = "Valor")]
    pub value: i64,
}

impl FleetRow {
    pub fn new(region_code: impl Into<String>, year: i32, value: i64) -> Self {
        Self {
            region_code: region_code.into(),
            year,
            value,
        }
    }
}

/// Rows in the order the statistics service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetSeries {
    rows: Vec<FleetRow>,
}

impl FleetSeries {
    pub fn new(rows: Vec<FleetRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FleetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn for_region<'a>(&'a self, region_code: &'a str) -> impl Iterator<Item = &'a FleetRow> {
        self.rows.iter().filter(move |row| row.region_code == region_code)
    }
}

impl FromIterator<FleetRow> for FleetSeries {
    fn from_iter<T: IntoIterator<Item = FleetRow>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
