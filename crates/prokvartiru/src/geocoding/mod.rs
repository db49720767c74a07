//! City and street geocoding on top of `GeoNames` and Nominatim.
//!
//! [`GeocodingClient::search_cities`] and [`GeocodingClient::search_streets`] never
//! fail: transport errors, timeouts and error statuses are logged and turned into a
//! [`SuggestionResponse`] with no suggestions and a human-readable message. The
//! `try_*` variants expose the typed [`GeocodingError`] for callers that want it.

use std::sync::Arc;

use prokvartiru_providers::{
    GeoNamesEndpoint, GeoNamesQuery, LocationSuggestion, NominatimEndpoint, NominatimQuery,
    ProviderError, ProviderResult, search_geonames, search_nominatim,
};
use tracing::{debug, instrument, warn};

use crate::{cache::TtlCache, config::AutocompleteConfig};

pub use error::GeocodingError;

pub type SuggestionCache = TtlCache<Vec<LocationSuggestion>>;

pub const CITIES_FAILED: &str = "Failed to search cities";
pub const STREETS_FAILED: &str = "Failed to search streets";

/// What a lookup ended in, so that "nothing matched" and "the request failed"
/// can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    NoResults,
    Failed(String),
}

/// Infallible lookup result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionResponse {
    pub suggestions: Vec<LocationSuggestion>,
    pub error: Option<String>,
}

impl SuggestionResponse {
    pub const fn found(suggestions: Vec<LocationSuggestion>) -> Self {
        Self {
            suggestions,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn status(&self) -> SearchStatus {
        match (&self.error, self.suggestions.is_empty()) {
            (Some(message), _) => SearchStatus::Failed(message.clone()),
            (None, true) => SearchStatus::NoResults,
            (None, false) => SearchStatus::Found,
        }
    }
}

pub struct GeocodingClient {
    http: reqwest::Client,
    geonames: GeoNamesEndpoint,
    nominatim: NominatimEndpoint,
    cache: Arc<SuggestionCache>,
}

impl GeocodingClient {
    /// Build a client from configuration. The cache is supplied by the caller so it
    /// can be shared with, or isolated from, other clients.
    pub fn new(
        config: &AutocompleteConfig,
        cache: Arc<SuggestionCache>,
    ) -> crate::error::Result<Self> {
        Ok(Self::with_http_client(
            config.http_client()?,
            config.endpoints.geonames.clone(),
            config.endpoints.nominatim.clone(),
            cache,
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        geonames: GeoNamesEndpoint,
        nominatim: NominatimEndpoint,
        cache: Arc<SuggestionCache>,
    ) -> Self {
        Self {
            http,
            geonames,
            nominatim,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<SuggestionCache> {
        &self.cache
    }

    /// `"city:<query>:<limit>"`
    pub fn city_cache_key(query: &str, limit: usize) -> String {
        format!("city:{query}:{limit}")
    }

    /// `"street:<query>:<city>:<limit>"`, an absent city is written as empty.
    pub fn street_cache_key(query: &str, city: Option<&str>, limit: usize) -> String {
        format!("street:{query}:{}:{limit}", city.unwrap_or_default())
    }

    #[instrument(name = "Search cities", skip(self), level = "debug")]
    pub async fn try_search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<LocationSuggestion>, GeocodingError> {
        let key = Self::city_cache_key(query, limit);
        if let Some(cached) = self.cache.get(&key) {
            debug!(count = cached.len(), "Serving cities from cache");
            return Ok(cached);
        }

        let results = search_geonames(
            &self.http,
            &self.geonames,
            GeoNamesQuery::new(query, limit),
        )
        .await
        .map_err(GeocodingError::Cities)?;

        let suggestions = normalize(results);
        self.cache.insert(key, suggestions.clone());
        Ok(suggestions)
    }

    #[instrument(name = "Search streets", skip(self), level = "debug")]
    pub async fn try_search_streets(
        &self,
        query: &str,
        city: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LocationSuggestion>, GeocodingError> {
        let key = Self::street_cache_key(query, city, limit);
        if let Some(cached) = self.cache.get(&key) {
            debug!(count = cached.len(), "Serving streets from cache");
            return Ok(cached);
        }

        let results = search_nominatim(
            &self.http,
            &self.nominatim,
            NominatimQuery::new(query, city, limit),
        )
        .await
        .map_err(GeocodingError::Streets)?;

        let suggestions = normalize(results);
        self.cache.insert(key, suggestions.clone());
        Ok(suggestions)
    }

    pub async fn search_cities(&self, query: &str, limit: usize) -> SuggestionResponse {
        match self.try_search_cities(query, limit).await {
            Ok(suggestions) => SuggestionResponse::found(suggestions),
            Err(err) => {
                warn!(query, error = %err, "City search failed");
                SuggestionResponse::failed(err.user_message())
            }
        }
    }

    pub async fn search_streets(
        &self,
        query: &str,
        city: Option<&str>,
        limit: usize,
    ) -> SuggestionResponse {
        match self.try_search_streets(query, city, limit).await {
            Ok(suggestions) => SuggestionResponse::found(suggestions),
            Err(err) => {
                warn!(query, ?city, error = %err, "Street search failed");
                SuggestionResponse::failed(err.user_message())
            }
        }
    }
}

fn normalize(results: Vec<ProviderResult>) -> Vec<LocationSuggestion> {
    results
        .into_iter()
        .map(ProviderResult::into_suggestion)
        .collect()
}

mod error {
    use super::{CITIES_FAILED, ProviderError, STREETS_FAILED};
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum GeocodingError {
        #[error("Failed to search cities: {0}")]
        Cities(#[source] ProviderError),
        #[error("Failed to search streets: {0}")]
        Streets(#[source] ProviderError),
    }

    impl GeocodingError {
        /// Short message suitable for showing next to an empty options list.
        pub const fn user_message(&self) -> &'static str {
            match self {
                Self::Cities(_) => CITIES_FAILED,
                Self::Streets(_) => STREETS_FAILED,
            }
        }

        pub const fn provider_error(&self) -> &ProviderError {
            match self {
                Self::Cities(err) | Self::Streets(err) => err,
            }
        }

        pub const fn is_timeout(&self) -> bool {
            matches!(self.provider_error(), ProviderError::Timeout(_))
        }
    }
}
