//! Provider layer for the ProKvartiru location autocomplete.
//!
//! Two third-party geocoding services back the address fields: `GeoNames` answers
//! city lookups and Nominatim answers street lookups. Their response shapes have
//! nothing in common, so each one is decoded into its own wire type, wrapped in
//! [`ProviderResult`], and normalized into a [`LocationSuggestion`] through a single
//! adapter per provider.
use once_cell::sync::Lazy;

pub mod fetch;
pub mod geonames;
pub mod nominatim;
mod suggestion;
#[cfg(any(test, feature = "test_data"))]
pub mod test_data;

pub use error::{ProviderError, Result};
pub use fetch::{search_geonames, search_nominatim};
pub use geonames::{GeoNamesEndpoint, GeoNamesPlace, GeoNamesQuery, GeoNamesResponse};
pub use nominatim::{NominatimAddress, NominatimEndpoint, NominatimPlace, NominatimQuery};
pub use suggestion::{Address, LocationSuggestion, Provider, ProviderResult};

pub const GEONAMES_URL_DEFAULT: &str = "http://api.geonames.org";
pub const GEONAMES_USERNAME_DEFAULT: &str = "demo";
pub const NOMINATIM_URL_DEFAULT: &str = "https://nominatim.openstreetmap.org";
pub const USER_AGENT_DEFAULT: &str = concat!("prokvartiru/", env!("CARGO_PKG_VERSION"));

/// `GeoNames` base URL, `GEONAMES_URL` overrides the public endpoint.
pub static GEONAMES_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("GEONAMES_URL").unwrap_or_else(|_| GEONAMES_URL_DEFAULT.to_string())
});

/// `GeoNames` account name, read from `GEONAMES_USERNAME`.
pub static GEONAMES_USERNAME: Lazy<String> = Lazy::new(|| {
    std::env::var("GEONAMES_USERNAME").unwrap_or_else(|_| {
        tracing::warn!("GEONAMES_USERNAME not set, falling back to the shared demo account");
        GEONAMES_USERNAME_DEFAULT.to_string()
    })
});

/// Nominatim base URL, `NOMINATIM_URL` overrides the public endpoint.
pub static NOMINATIM_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("NOMINATIM_URL").unwrap_or_else(|_| NOMINATIM_URL_DEFAULT.to_string())
});

/// Join a base URL and a path without doubling the slash.
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

mod error {
    use thiserror::Error;

    pub type Result<T> = std::result::Result<T, ProviderError>;

    #[derive(Error, Debug)]
    pub enum ProviderError {
        #[error("HTTP error: {0}")]
        Network(#[source] reqwest::Error),
        #[error("Request timed out: {0}")]
        Timeout(#[source] reqwest::Error),
        #[error("Upstream responded with status {status}")]
        Upstream { status: u16 },
        #[error("{provider} rejected the request: {message}")]
        Rejected {
            provider: &'static str,
            message: String,
        },
        #[error("Malformed response body: {0}")]
        Decode(#[from] serde_json::Error),
    }

    impl From<reqwest::Error> for ProviderError {
        fn from(err: reqwest::Error) -> Self {
            if err.is_timeout() {
                Self::Timeout(err)
            } else if let Some(status) = err.status() {
                Self::Upstream {
                    status: status.as_u16(),
                }
            } else {
                Self::Network(err)
            }
        }
    }
}

/// Lenient decoding for fields that arrive either as JSON numbers or as strings
/// (`"43.25"`, `"1526384"`), for use with `#[serde(deserialize_with = ...)]`.
pub mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("coordinate out of range: {n}"))),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid coordinate: {s:?}"))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}
