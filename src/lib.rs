pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, Settings};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::address::{extract_field, ViaCepClient};
pub use crate::core::identifier::adapt_identifier;
pub use crate::core::normalize::normalize;
pub use crate::core::present::{render, save, Chart};
pub use crate::core::query::{QueryEngine, QueryReport, QueryState};
pub use crate::core::series::build_series;
pub use crate::core::statistics::IbgeClient;
pub use utils::error::{ErrorKind, FleetError, Result};
