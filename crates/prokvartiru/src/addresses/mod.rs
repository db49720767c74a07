//! Client for the backend's remembered-address endpoints.
//!
//! Remembered addresses are owned by the ProKvartiru backend. This client reads them
//! through `GET /addresses/{popular,remembered,search}` and saves new ones through
//! `POST /addresses/remembered`. Reads are memoized in an injected cache which is
//! dropped wholesale after a successful save.

use std::sync::Arc;

use prokvartiru_providers::lenient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{cache::TtlCache, config::AutocompleteConfig};

pub use error::AddressBookError;
use error::Result;

pub type AddressCache = TtlCache<Vec<RememberedAddress>>;

/// An address some user entered before, as persisted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberedAddress {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential_complex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u32>,
}

/// Body of `POST /addresses/remembered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub city: String,
    pub street: String,
    pub building: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residential_complex: Option<String>,
}

impl NewAddress {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        building: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            building: building.into(),
            residential_complex: None,
        }
    }

    pub fn residential_complex(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.residential_complex = (!name.trim().is_empty()).then_some(name);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(AddressBookError::InvalidAddress("city"));
        }
        if self.street.trim().is_empty() {
            return Err(AddressBookError::InvalidAddress("street"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AddressesBody {
    #[serde(default)]
    addresses: Vec<RememberedAddress>,
}

pub struct AddressBook {
    http: reqwest::Client,
    api_url: String,
    cache: Arc<AddressCache>,
}

impl AddressBook {
    pub fn new(
        config: &AutocompleteConfig,
        cache: Arc<AddressCache>,
    ) -> crate::error::Result<Self> {
        Ok(Self::with_http_client(
            config.http_client()?,
            config.endpoints.api_url.clone(),
            cache,
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        api_url: impl Into<String>,
        cache: Arc<AddressCache>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Most used addresses across all users.
    #[instrument(name = "Popular addresses", skip(self), level = "debug")]
    pub async fn popular(&self, limit: usize) -> Result<Vec<RememberedAddress>> {
        self.fetch(
            format!("popular:{limit}"),
            "addresses/popular",
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Addresses remembered within one city.
    #[instrument(name = "Remembered addresses", skip(self), level = "debug")]
    pub async fn remembered(&self, city: &str, limit: usize) -> Result<Vec<RememberedAddress>> {
        self.fetch(
            format!("remembered:{city}:{limit}"),
            "addresses/remembered",
            &[("city", city.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Backend-side free-text search over remembered addresses.
    #[instrument(name = "Search addresses", skip(self), level = "debug")]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<RememberedAddress>> {
        self.fetch(
            format!("search:{query}:{limit}"),
            "addresses/search",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Persist an address so later lookups can offer it.
    #[instrument(
        name = "Remember address",
        skip(self),
        fields(city = %address.city, street = %address.street),
        level = "debug"
    )]
    pub async fn remember(&self, address: &NewAddress) -> Result<()> {
        address.validate()?;

        let endpoint = "addresses/remembered";
        let response = self
            .http
            .post(self.url(endpoint))
            .json(address)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint, "Backend refused to remember address");
            return Err(AddressBookError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        // Cached reads may no longer match the backend.
        self.cache.clear();
        info!("Address remembered");
        Ok(())
    }

    async fn fetch(
        &self,
        cache_key: String,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<Vec<RememberedAddress>> {
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(endpoint, count = cached.len(), "Serving addresses from cache");
            return Ok(cached);
        }

        let response = self
            .http
            .get(self.url(endpoint))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint, "Backend answered with an error status");
            return Err(AddressBookError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body: AddressesBody = serde_json::from_str(&response.text().await?)?;
        debug!(endpoint, count = body.addresses.len(), "Fetched addresses");
        self.cache.insert(cache_key, body.addresses.clone());
        Ok(body.addresses)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.api_url)
    }
}

mod error {
    use thiserror::Error;

    pub type Result<T> = std::result::Result<T, AddressBookError>;

    #[derive(Error, Debug)]
    pub enum AddressBookError {
        #[error("HTTP error: {0}")]
        Network(#[source] reqwest::Error),
        #[error("Request timed out: {0}")]
        Timeout(#[source] reqwest::Error),
        #[error("{endpoint} responded with status {status}")]
        Status { status: u16, endpoint: &'static str },
        #[error("Malformed addresses body: {0}")]
        Decode(#[from] serde_json::Error),
        #[error("Address is missing a {0}")]
        InvalidAddress(&'static str),
    }

    impl From<reqwest::Error> for AddressBookError {
        fn from(err: reqwest::Error) -> Self {
            if err.is_timeout() {
                Self::Timeout(err)
            } else {
                Self::Network(err)
            }
        }
    }
}
