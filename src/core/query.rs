use crate::core::address::{extract_field, MUNICIPALITY_NAME_FIELD, MUNICIPAL_ID_FIELD, STATE_FIELD};
use crate::core::identifier::adapt_identifier;
use crate::core::normalize::normalize;
use crate::core::present::{self, Chart};
use crate::core::series::build_series;
use crate::domain::model::{FleetSeries, PostalCode};
use crate::domain::ports::{AddressLookup, ConfigProvider, StatisticsSource, Storage};
use crate::utils::error::{FleetError, Result};

/// Everything a successful query produced.
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub region_name: String,
    pub state: Option<String>,
    pub region_code: String,
    pub series: FleetSeries,
    pub chart: Option<Chart>,
    pub saved_path: Option<String>,
    /// Set when the export failed after the chart was rendered.
    pub export_warning: Option<String>,
}

#[derive(Debug, Clone)]
pub enum QueryState {
    AwaitingInput,
    Querying,
    Success(QueryReport),
    Failed(String),
}

impl QueryState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Drives one postal code at a time through lookup, fetch, build and present.
pub struct QueryEngine<A, S, St, C>
where
    A: AddressLookup,
    S: StatisticsSource,
    St: Storage,
    C: ConfigProvider,
{
    addresses: A,
    statistics: S,
    storage: St,
    config: C,
    state: QueryState,
}

impl<A, S, St, C> QueryEngine<A, S, St, C>
where
    A: AddressLookup,
    S: StatisticsSource,
    St: Storage,
    C: ConfigProvider,
{
    pub fn new(addresses: A, statistics: S, storage: St, config: C) -> Self {
        Self {
            addresses,
            statistics,
            storage,
            config,
            state: QueryState::AwaitingInput,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Back to `AwaitingInput`, dropping the previous outcome.
    pub fn reset(&mut self) {
        self.state = QueryState::AwaitingInput;
    }

    /// Runs a full query for raw user input. Malformed input fails without
    /// touching the network; any later failure stops the remaining steps.
    pub async fn submit(&mut self, raw: &str) -> &QueryState {
        let Some(postal_code) = normalize(Some(raw)) else {
            let err = FleetError::ValidationError {
                input: raw.trim().to_string(),
            };
            tracing::warn!("❌ {}", err);
            self.state = QueryState::Failed(err.user_friendly_message());
            return &self.state;
        };

        self.state = QueryState::Querying;
        tracing::info!("Querying postal code {}", postal_code);

        self.state = match self.run(&postal_code).await {
            Ok(report) => {
                tracing::info!(
                    "✅ Query for {} finished with {} rows",
                    postal_code,
                    report.series.len()
                );
                QueryState::Success(report)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Query for {} failed: {} (kind: {:?})",
                    postal_code,
                    e,
                    e.kind()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                QueryState::Failed(e.user_friendly_message())
            }
        };
        &self.state
    }

    async fn run(&self, postal_code: &PostalCode) -> Result<QueryReport> {
        let record = self.addresses.resolve(postal_code).await?;
        let region_name = extract_field(&record, MUNICIPALITY_NAME_FIELD)?;
        let raw_id = extract_field(&record, MUNICIPAL_ID_FIELD)?;
        let state = extract_field(&record, STATE_FIELD).ok();
        tracing::info!("Resolved {} to {} ({})", postal_code, region_name, raw_id);

        let region_code = adapt_identifier(&raw_id)?;
        let response = self.statistics.fetch(&region_code).await?;
        let series = build_series(&response)?;

        let chart = if self.config.render_chart() {
            let mut chart = present::render(&series, &region_code, &region_name)?;
            if let Some(uf) = &state {
                chart.title = format!("{}/{}", chart.title, uf);
            }
            Some(chart)
        } else {
            None
        };

        let mut saved_path = None;
        let mut export_warning = None;
        if self.config.export_enabled() {
            match present::save(
                &self.storage,
                &series,
                &region_name,
                self.config.export_format(),
            )
            .await
            {
                Ok(path) => saved_path = Some(path),
                Err(e) if e.is_export_failure() && chart.is_some() => {
                    tracing::error!("❌ Export for {} failed: {}", region_name, e);
                    export_warning = Some(e.user_friendly_message());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(QueryReport {
            region_name,
            state,
            region_code,
            series,
            chart,
            saved_path,
            export_warning,
        })
    }
}
