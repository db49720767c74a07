use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProKvartiruError {
    #[error("Geocoding error: {0}")]
    GeocodingError(#[from] crate::geocoding::GeocodingError),
    #[error("Address book error: {0}")]
    AddressBookError(#[from] crate::addresses::AddressBookError),
    #[error("Provider error: {0}")]
    Provider(#[from] prokvartiru_providers::ProviderError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ProKvartiruError>;
