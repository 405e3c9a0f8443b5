pub mod address;
pub mod identifier;
pub mod normalize;
pub mod present;
pub mod query;
pub mod series;
pub mod statistics;

pub use crate::domain::model::{AddressRecord, FleetRow, FleetSeries, PostalCode};
pub use crate::domain::ports::{AddressLookup, ConfigProvider, StatisticsSource, Storage};
pub use crate::utils::error::Result;
