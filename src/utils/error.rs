use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Invalid postal code: {input:?}")]
    ValidationError { input: String },

    #[error("Request to {url} failed: {source}")]
    LookupError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Postal code {postal_code} not found")]
    NotFoundError { postal_code: String },

    #[error("Field '{field}' missing from address record")]
    MissingFieldError { field: String },

    #[error("Key '{key}' missing from statistics response")]
    MissingKeyError { key: String },

    #[error("Request to {url} returned status {status}")]
    RequestError { url: String, status: u16 },

    #[error("Statistics response is empty")]
    EmptyResponseError,

    #[error("Cannot convert {field} value {value:?} to an integer: {source}")]
    ConversionError {
        field: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("No data for region {region_code}")]
    NoDataError { region_code: String },

    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet export failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV export failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Failure kinds as seen by the user-facing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Lookup,
    NotFound,
    MissingField,
    MissingKey,
    Request,
    EmptyResponse,
    Conversion,
    NoData,
    InvalidInput,
    Io,
    Config,
}

impl FleetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError { .. } => ErrorKind::Validation,
            Self::LookupError { .. } => ErrorKind::Lookup,
            Self::NotFoundError { .. } => ErrorKind::NotFound,
            Self::MissingFieldError { .. } => ErrorKind::MissingField,
            Self::MissingKeyError { .. } => ErrorKind::MissingKey,
            Self::RequestError { .. } => ErrorKind::Request,
            Self::EmptyResponseError => ErrorKind::EmptyResponse,
            // an undecodable body is the same contract drift as a missing key
            Self::SerializationError(_) => ErrorKind::MissingKey,
            Self::ConversionError { .. } => ErrorKind::Conversion,
            Self::NoDataError { .. } => ErrorKind::NoData,
            Self::InvalidInputError { .. } => ErrorKind::InvalidInput,
            Self::IoError(_) | Self::XlsxError(_) | Self::CsvError(_) => ErrorKind::Io,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorKind::Config,
        }
    }

    /// Export failures are reported but do not invalidate an already rendered chart.
    pub fn is_export_failure(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { .. } => {
                "Invalid postal code. Use 8 digits, e.g. 01001000 or 01001-000.".to_string()
            }
            Self::LookupError { url, .. } => {
                format!("Could not reach {}. Check your network connection.", host_of(url))
            }
            Self::NotFoundError { postal_code } => {
                format!("Postal code {} was not found.", postal_code)
            }
            Self::MissingFieldError { field } => {
                format!("The address service did not return the '{}' field.", field)
            }
            Self::MissingKeyError { key } => {
                format!("The statistics service response has no '{}' entry.", key)
            }
            Self::RequestError { url, status } => {
                format!("{} answered with HTTP {}.", host_of(url), status)
            }
            Self::EmptyResponseError => "The statistics service returned no data.".to_string(),
            Self::ConversionError { field, value, .. } => {
                format!("The statistics service returned a non-numeric {}: {:?}.", field, value)
            }
            Self::NoDataError { region_code } => {
                format!("There is no fleet data for region {}.", region_code)
            }
            Self::SerializationError(_) => {
                "An upstream service returned an unreadable response.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "Type the postal code again using digits only",
            ErrorKind::Lookup => "Check connectivity and submit the postal code again",
            ErrorKind::NotFound => "Verify the postal code and try another one",
            ErrorKind::MissingField | ErrorKind::MissingKey | ErrorKind::Conversion => {
                "The upstream service format may have changed; check the logs"
            }
            ErrorKind::Request | ErrorKind::EmptyResponse => {
                "The upstream service may be unavailable; try again later"
            }
            ErrorKind::NoData => "Try a postal code from another municipality",
            ErrorKind::InvalidInput => "The municipal identifier returned upstream is unusable",
            ErrorKind::Io => "Check that the output directory is writable",
            ErrorKind::Config => "Fix the configuration value and run again",
        }
    }
}

fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

pub type Result<T> = std::result::Result<T, FleetError>;
