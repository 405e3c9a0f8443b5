use crate::domain::model::{AddressRecord, PostalCode, RawStatisticsResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// The switches a query run consults; endpoints and paths are consumed when
/// the clients and storage are built.
pub trait ConfigProvider: Send + Sync {
    fn export_format(&self) -> ExportFormat;
    fn render_chart(&self) -> bool;
    fn export_enabled(&self) -> bool;
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<AddressRecord>;
}

#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn fetch(&self, municipal_id: &str) -> Result<RawStatisticsResponse>;
}
