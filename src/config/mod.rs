pub mod cli;
pub mod toml_config;

use crate::core::address::DEFAULT_ADDRESS_ENDPOINT;
use crate::core::statistics::{DEFAULT_FLEET_INDICATOR, DEFAULT_STATISTICS_ENDPOINT};
use crate::domain::ports::{ConfigProvider, ExportFormat};
use crate::utils::error::{FleetError, Result};
use crate::utils::logger::{LogFormat, LoggerConfig};
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Resolved settings the query pipeline runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub address_endpoint: String,
    pub statistics_endpoint: String,
    pub indicator: String,
    pub output_path: String,
    pub export_format: ExportFormat,
    pub render_chart: bool,
    pub export_enabled: bool,
    pub logging: LoggerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address_endpoint: DEFAULT_ADDRESS_ENDPOINT.to_string(),
            statistics_endpoint: DEFAULT_STATISTICS_ENDPOINT.to_string(),
            indicator: DEFAULT_FLEET_INDICATOR.to_string(),
            output_path: DEFAULT_OUTPUT_DIR.to_string(),
            export_format: ExportFormat::Xlsx,
            render_chart: true,
            export_enabled: true,
            logging: LoggerConfig::default(),
        }
    }
}

impl Settings {
    /// Values present in the file replace the current ones.
    pub fn apply_file(&mut self, file: &TomlConfig) -> Result<()> {
        if let Some(services) = &file.services {
            if let Some(endpoint) = &services.address_endpoint {
                self.address_endpoint = endpoint.clone();
            }
            if let Some(endpoint) = &services.statistics_endpoint {
                self.statistics_endpoint = endpoint.clone();
            }
            if let Some(indicator) = &services.indicator {
                self.indicator = indicator.clone();
            }
        }

        if let Some(output) = &file.output {
            if let Some(dir) = &output.dir {
                self.output_path = dir.clone();
            }
            if let Some(format) = &output.format {
                self.export_format = parse_format("output.format", format)?;
            }
            if let Some(chart) = output.chart {
                self.render_chart = chart;
            }
        }

        if let Some(logging) = &file.logging {
            if let Some(dir) = &logging.dir {
                self.logging.log_dir = dir.clone();
            }
            if let Some(format) = &logging.format {
                self.logging.format = format.parse::<LogFormat>().map_err(|reason| {
                    FleetError::InvalidConfigValueError {
                        field: "logging.format".to_string(),
                        value: format.clone(),
                        reason,
                    }
                })?;
            }
            if let Some(level) = &logging.level {
                self.logging.filter = Some(level.clone());
            }
        }

        Ok(())
    }
}

fn parse_format(field: &str, value: &str) -> Result<ExportFormat> {
    value
        .parse::<ExportFormat>()
        .map_err(|reason| FleetError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason,
        })
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("address_endpoint", &self.address_endpoint)?;
        validation::validate_url("statistics_endpoint", &self.statistics_endpoint)?;
        validation::validate_numeric("indicator", &self.indicator)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("log_dir", &self.logging.log_dir)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    fn render_chart(&self) -> bool {
        self.render_chart
    }

    fn export_enabled(&self) -> bool {
        self.export_enabled
    }
}

#[cfg(feature = "cli")]
mod args {
    use super::*;
    use clap::Parser;

    /// Command-line options. Unset options fall back to the `--config` file,
    /// then to the built-in defaults.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "cep-fleet")]
    #[command(about = "Vehicle fleet history for the municipality of a postal code")]
    pub struct CliConfig {
        #[arg(long, help = "Postal code to query once; prompts in a loop when omitted")]
        pub cep: Option<String>,

        #[arg(long, help = format!("Address service base URL [default: {}]", DEFAULT_ADDRESS_ENDPOINT))]
        pub address_endpoint: Option<String>,

        #[arg(long, help = format!("Statistics service base URL [default: {}]", DEFAULT_STATISTICS_ENDPOINT))]
        pub statistics_endpoint: Option<String>,

        #[arg(long, help = format!("Statistics indicator [default: {}]", DEFAULT_FLEET_INDICATOR))]
        pub indicator: Option<String>,

        #[arg(long, help = format!("Export directory [default: {}]", DEFAULT_OUTPUT_DIR))]
        pub output_dir: Option<String>,

        #[arg(long, help = format!("Log directory [default: {}]", DEFAULT_LOG_DIR))]
        pub log_dir: Option<String>,

        #[arg(long, value_parser = ["xlsx", "csv"], help = "Export format [default: xlsx]")]
        pub format: Option<String>,

        #[arg(long, value_parser = ["text", "json"], help = "Log file format [default: text]")]
        pub log_format: Option<String>,

        #[arg(long, help = "Skip the terminal chart")]
        pub no_chart: bool,

        #[arg(long, help = "Skip the spreadsheet export")]
        pub no_export: bool,

        #[arg(long, help = "TOML file with defaults; explicit options still win")]
        pub config: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// Built-in defaults, then the `--config` file, then explicit options.
        pub fn settings(&self) -> Result<Settings> {
            let mut settings = Settings::default();

            if let Some(path) = &self.config {
                let file = TomlConfig::from_file(path)?;
                settings.apply_file(&file)?;
            }

            if let Some(endpoint) = &self.address_endpoint {
                settings.address_endpoint = endpoint.clone();
            }
            if let Some(endpoint) = &self.statistics_endpoint {
                settings.statistics_endpoint = endpoint.clone();
            }
            if let Some(indicator) = &self.indicator {
                settings.indicator = indicator.clone();
            }
            if let Some(dir) = &self.output_dir {
                settings.output_path = dir.clone();
            }
            if let Some(format) = &self.format {
                settings.export_format = parse_format("format", format)?;
            }
            if self.no_chart {
                settings.render_chart = false;
            }
            if self.no_export {
                settings.export_enabled = false;
            }

            if let Some(dir) = &self.log_dir {
                settings.logging.log_dir = dir.clone();
            }
            if let Some(format) = &self.log_format {
                settings.logging.format = if format == "json" {
                    LogFormat::Json
                } else {
                    LogFormat::Text
                };
            }
            settings.logging.verbose |= self.verbose;

            Ok(settings)
        }
    }
}

#[cfg(feature = "cli")]
pub use args::CliConfig;
