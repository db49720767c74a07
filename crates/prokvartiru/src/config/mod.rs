use std::time::Duration;

use anyhow::Context;
use once_cell::sync::Lazy;
use prokvartiru_providers::{GeoNamesEndpoint, NominatimEndpoint, USER_AGENT_DEFAULT};

use crate::error::{ProKvartiruError, Result};

pub const API_URL_DEFAULT: &str = "http://localhost:8000/api";

/// Backend base URL, `PROKVARTIRU_API_URL` overrides the local default.
pub static API_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("PROKVARTIRU_API_URL").unwrap_or_else(|_| API_URL_DEFAULT.to_string())
});

/// Where every outbound request of the autocomplete goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub geonames: GeoNamesEndpoint,
    pub nominatim: NominatimEndpoint,
    /// Base of the ProKvartiru REST API, `/addresses/*` is resolved against it.
    pub api_url: String,
    pub user_agent: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            geonames: GeoNamesEndpoint::default(),
            nominatim: NominatimEndpoint::default(),
            api_url: API_URL.clone(),
            user_agent: USER_AGENT_DEFAULT.to_string(),
        }
    }
}

/// Configuration for the location autocomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteConfig {
    /// Quiet period before typed input is committed as a query.
    pub debounce: Duration,
    /// Queries shorter than this (in characters, after trimming) skip geocoding.
    pub min_query_chars: usize,
    pub city_limit: usize,
    pub street_limit: usize,
    /// How many remembered addresses to request per lookup.
    pub remembered_limit: usize,
    /// Upper bound for every outbound HTTP request.
    pub request_timeout: Duration,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub endpoints: ProviderEndpoints,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: crate::debounce::DEFAULT_QUIET_PERIOD,
            min_query_chars: 2,
            city_limit: 10,
            street_limit: 10,
            remembered_limit: 5,
            request_timeout: Duration::from_secs(10),
            cache_capacity: 256,
            cache_ttl: Duration::from_secs(10 * 60),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

impl AutocompleteConfig {
    pub fn builder() -> AutocompleteConfigBuilder {
        AutocompleteConfigBuilder::new()
    }

    /// HTTP client carrying the configured timeout and user agent.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.endpoints.user_agent.clone())
            .build()?)
    }
}

/// Builder for creating autocomplete configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct AutocompleteConfigBuilder {
    config: AutocompleteConfig,
}

impl AutocompleteConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: AutocompleteConfig::default(),
        }
    }

    /// Snappier typing feedback: shorter debounce, fewer options, tighter timeout
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.debounce = Duration::from_millis(200);
        builder.config.city_limit = 5;
        builder.config.street_limit = 5;
        builder.config.remembered_limit = 3;
        builder.config.request_timeout = Duration::from_secs(5);
        builder
    }

    /// More options per lookup and a larger cache, for slower connections
    pub fn thorough() -> Self {
        let mut builder = Self::new();
        builder.config.debounce = Duration::from_millis(400);
        builder.config.city_limit = 20;
        builder.config.street_limit = 20;
        builder.config.remembered_limit = 10;
        builder.config.request_timeout = Duration::from_secs(15);
        builder.config.cache_capacity = 1024;
        builder
    }

    pub fn debounce(mut self, quiet_period: Duration) -> Self {
        self.config.debounce = quiet_period;
        self
    }

    pub fn min_query_chars(mut self, chars: usize) -> Self {
        self.config.min_query_chars = chars;
        self
    }

    /// Set both the city and the street limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.city_limit = limit;
        self.config.street_limit = limit;
        self
    }

    pub fn city_limit(mut self, limit: usize) -> Self {
        self.config.city_limit = limit;
        self
    }

    pub fn street_limit(mut self, limit: usize) -> Self {
        self.config.street_limit = limit;
        self
    }

    pub fn remembered_limit(mut self, limit: usize) -> Self {
        self.config.remembered_limit = limit;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn cache(mut self, capacity: usize, ttl: Duration) -> Self {
        self.config.cache_capacity = capacity;
        self.config.cache_ttl = ttl;
        self
    }

    pub fn endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn geonames_username(mut self, username: impl Into<String>) -> Self {
        self.config.endpoints.geonames.username = username.into();
        self
    }

    pub fn geonames_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.geonames.base_url = url.into();
        self
    }

    pub fn nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.nominatim.base_url = url.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.api_url = url.into();
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<AutocompleteConfig> {
        let config = self.config;
        let zero = [
            ("city_limit", config.city_limit),
            ("street_limit", config.street_limit),
            ("remembered_limit", config.remembered_limit),
            ("cache_capacity", config.cache_capacity),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0);

        if let Some((name, _)) = zero {
            return Err(ProKvartiruError::ConfigError(format!(
                "{name} must be greater than zero"
            )));
        }
        if config.request_timeout.is_zero() {
            return Err(ProKvartiruError::ConfigError(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        if config.cache_ttl.is_zero() {
            return Err(ProKvartiruError::ConfigError(
                "cache_ttl must be greater than zero".to_string(),
            ));
        }

        let endpoints = &config.endpoints;
        for (name, url) in [
            ("GeoNames", &endpoints.geonames.base_url),
            ("Nominatim", &endpoints.nominatim.base_url),
            ("backend", &endpoints.api_url),
        ] {
            reqwest::Url::parse(url).with_context(|| format!("Invalid {name} URL {url:?}"))?;
        }
        Ok(config)
    }
}
