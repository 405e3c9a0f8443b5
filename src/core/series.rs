use crate::domain::model::{FleetRow, FleetSeries, RawStatisticsResponse, NATIONWIDE_REGION_CODE};
use crate::utils::error::{FleetError, Result};
use serde_json::{Map, Value};

const RESULTS_KEY: &str = "res";
const REGION_KEY: &str = "localidade";

/// Flattens a statistics response into (region, year, value) rows.
///
/// Only the first top-level entry is read. The nationwide aggregate block is
/// skipped. Rows follow the response's own per-region, per-year order and are
/// not sorted here. Any missing key or non-integer year/value fails the whole
/// build.
pub fn build_series(response: &RawStatisticsResponse) -> Result<FleetSeries> {
    let first = response.first().ok_or(FleetError::EmptyResponseError)?;
    let regions = require(first, RESULTS_KEY)?
        .as_array()
        .ok_or_else(|| missing(RESULTS_KEY))?;

    let mut rows = Vec::new();
    for region in regions {
        let region_code = require_str(region, REGION_KEY)?;
        if region_code == NATIONWIDE_REGION_CODE {
            tracing::debug!("Skipping nationwide aggregate block");
            continue;
        }

        let by_year: &Map<String, Value> = require(region, RESULTS_KEY)?
            .as_object()
            .ok_or_else(|| missing(RESULTS_KEY))?;

        for (year, value) in by_year {
            rows.push(FleetRow {
                region_code: region_code.to_string(),
                year: parse_int("year", year)?,
                value: parse_int("value", value_text(value))?,
            });
        }
    }

    tracing::info!("Built fleet series with {} rows", rows.len());
    Ok(FleetSeries::new(rows))
}

fn missing(key: &str) -> FleetError {
    FleetError::MissingKeyError {
        key: key.to_string(),
    }
}

fn require<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value.get(key).ok_or_else(|| missing(key))
}

fn require_str<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
    require(value, key)?.as_str().ok_or_else(|| missing(key))
}

fn value_text(value: &Value) -> &str {
    match value {
        Value::String(text) => text,
        // a null or nested value can never parse, so report it as empty text
        _ => "",
    }
}

fn parse_int<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    field: &str,
    text: &str,
) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|source| FleetError::ConversionError {
            field: field.to_string(),
            value: text.to_string(),
            source,
        })
}
