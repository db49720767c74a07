//! The location autocomplete behind the city and street fields.
//!
//! [`LocationAutocomplete`] ties the pieces together: it asks the geocoding providers
//! and the backend's remembered addresses at the same time, merges both answers with
//! [`merge`](crate::ranking::merge), and reports whether the lookup found something,
//! found nothing, or failed.
//!
//! ```rust,no_run
//! use prokvartiru::{AutocompleteConfig, LocationAutocomplete, LocationKind};
//!
//! # async fn run() -> Result<(), prokvartiru::error::ProKvartiruError> {
//! let config = AutocompleteConfig::builder().geonames_username("prokvartiru").build()?;
//! let autocomplete = LocationAutocomplete::new(config)?;
//!
//! let outcome = autocomplete.suggest(LocationKind::City, "Алм", None).await;
//! for option in &outcome.options {
//!     println!("{} ({})", option.label, option.description);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    addresses::{AddressBook, AddressBookError, AddressCache, NewAddress, RememberedAddress},
    cache::TtlCache,
    config::AutocompleteConfig,
    geocoding::{GeocodingClient, SearchStatus, SuggestionCache, SuggestionResponse},
    ranking::{LocationKind, LocationOption, merge},
};

/// Result of one autocomplete lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOutcome {
    pub query: String,
    pub options: Vec<LocationOption>,
    pub status: SearchStatus,
}

impl AutocompleteOutcome {
    /// `Failed` only wins when there is nothing at all to show.
    fn new(query: &str, options: Vec<LocationOption>, geocoding_error: Option<String>) -> Self {
        let status = match (options.is_empty(), geocoding_error) {
            (false, _) => SearchStatus::Found,
            (true, Some(error)) => SearchStatus::Failed(error),
            (true, None) => SearchStatus::NoResults,
        };
        Self {
            query: query.to_string(),
            options,
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

pub struct LocationAutocomplete {
    config: AutocompleteConfig,
    geocoding: GeocodingClient,
    addresses: AddressBook,
}

impl LocationAutocomplete {
    /// Create an autocomplete with its own caches, sized from `config`.
    #[instrument(name = "Create LocationAutocomplete", skip_all, level = "info")]
    pub fn new(config: AutocompleteConfig) -> crate::error::Result<Self> {
        let suggestion_cache: Arc<SuggestionCache> =
            Arc::new(TtlCache::new(config.cache_capacity, config.cache_ttl));
        let address_cache: Arc<AddressCache> =
            Arc::new(TtlCache::new(config.cache_capacity, config.cache_ttl));

        let geocoding = GeocodingClient::new(&config, suggestion_cache)?;
        let addresses = AddressBook::new(&config, address_cache)?;
        Ok(Self::from_parts(config, geocoding, addresses))
    }

    /// Assemble from clients built elsewhere, e.g. sharing caches between fields.
    pub fn from_parts(
        config: AutocompleteConfig,
        geocoding: GeocodingClient,
        addresses: AddressBook,
    ) -> Self {
        Self {
            config,
            geocoding,
            addresses,
        }
    }

    pub const fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    pub const fn geocoding(&self) -> &GeocodingClient {
        &self.geocoding
    }

    pub const fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// Options for `query` typed into a city or street field.
    ///
    /// `city` narrows street lookups and is ignored for city lookups. Queries shorter
    /// than the configured minimum never reach the geocoding providers; they are
    /// answered from remembered addresses alone.
    #[instrument(name = "Suggest locations", skip(self), level = "debug")]
    pub async fn suggest(
        &self,
        kind: LocationKind,
        query: &str,
        city: Option<&str>,
    ) -> AutocompleteOutcome {
        let query = query.trim();
        let city = city.map(str::trim).filter(|city| !city.is_empty());

        if query.chars().count() < self.config.min_query_chars {
            debug!("Query below minimum length, using remembered addresses only");
            let remembered = self.remembered_without_query(kind, city).await;
            return AutocompleteOutcome::new(query, merge(&[], &remembered, kind), None);
        }

        let (geocoded, remembered) = futures::join!(
            self.geocode(kind, query, city),
            self.remembered_matching(kind, query, city),
        );

        let options = merge(&geocoded.suggestions, &remembered, kind);
        debug!(
            options = options.len(),
            remembered = remembered.len(),
            geocoded = geocoded.suggestions.len(),
            "Merged options"
        );
        AutocompleteOutcome::new(query, options, geocoded.error)
    }

    /// Save an address the user confirmed, so it is offered next time.
    pub async fn remember(&self, address: &NewAddress) -> Result<(), AddressBookError> {
        self.addresses.remember(address).await
    }

    async fn geocode(
        &self,
        kind: LocationKind,
        query: &str,
        city: Option<&str>,
    ) -> SuggestionResponse {
        match kind {
            LocationKind::City => {
                self.geocoding
                    .search_cities(query, self.config.city_limit)
                    .await
            }
            LocationKind::Street => {
                self.geocoding
                    .search_streets(query, city, self.config.street_limit)
                    .await
            }
        }
    }

    async fn remembered_matching(
        &self,
        kind: LocationKind,
        query: &str,
        city: Option<&str>,
    ) -> Vec<RememberedAddress> {
        let limit = self.config.remembered_limit;
        let lookup = match (kind, city) {
            (LocationKind::Street, Some(city)) => self.addresses.remembered(city, limit).await,
            _ => self.addresses.search(query, limit).await,
        };

        let needle = query.to_lowercase();
        or_empty(lookup)
            .into_iter()
            .filter(|address| label_of(address, kind).to_lowercase().contains(&needle))
            .collect()
    }

    async fn remembered_without_query(
        &self,
        kind: LocationKind,
        city: Option<&str>,
    ) -> Vec<RememberedAddress> {
        let limit = self.config.remembered_limit;
        let lookup = match (kind, city) {
            (LocationKind::Street, Some(city)) => self.addresses.remembered(city, limit).await,
            _ => self.addresses.popular(limit).await,
        };
        or_empty(lookup)
    }
}

fn label_of(address: &RememberedAddress, kind: LocationKind) -> &str {
    match kind {
        LocationKind::City => &address.city,
        LocationKind::Street => &address.street,
    }
}

/// A failed remembered-address lookup is logged and treated as empty.
fn or_empty(lookup: Result<Vec<RememberedAddress>, AddressBookError>) -> Vec<RememberedAddress> {
    lookup.unwrap_or_else(|err| {
        warn!(error = %err, "Remembered address lookup failed");
        Vec::new()
    })
}
