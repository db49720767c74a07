use serde::{Deserialize, Serialize};

use crate::{geonames::GeoNamesPlace, nominatim::NominatimPlace};

/// Which upstream service produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GeoNames,
    Nominatim,
}

impl Provider {
    pub const fn name(self) -> &'static str {
        match self {
            Self::GeoNames => "GeoNames",
            Self::Nominatim => "Nominatim",
        }
    }
}

/// Structured address parts of a suggestion.
///
/// Providers fill different subsets: `GeoNames` gives `city`, `state` and `country`,
/// Nominatim gives `road` plus whatever settlement level applies
/// (`city`, `town` or `village`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub street: Option<String>,
    pub road: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A normalized geocoding hit, independent of the provider it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: String,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    /// Provider-specific feature type (`"city"`, `"residential"`, ...).
    pub kind: String,
    pub address: Address,
    pub provider: Provider,
}

/// Raw result from one of the providers, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    GeoNames(GeoNamesPlace),
    Nominatim(NominatimPlace),
}

impl ProviderResult {
    pub const fn provider(&self) -> Provider {
        match self {
            Self::GeoNames(_) => Provider::GeoNames,
            Self::Nominatim(_) => Provider::Nominatim,
        }
    }

    /// Normalize through the adapter of the owning provider.
    pub fn into_suggestion(self) -> LocationSuggestion {
        match self {
            Self::GeoNames(place) => place.into_suggestion(),
            Self::Nominatim(place) => place.into_suggestion(),
        }
    }
}

impl From<ProviderResult> for LocationSuggestion {
    fn from(result: ProviderResult) -> Self {
        result.into_suggestion()
    }
}

impl From<GeoNamesPlace> for ProviderResult {
    fn from(place: GeoNamesPlace) -> Self {
        Self::GeoNames(place)
    }
}

impl From<NominatimPlace> for ProviderResult {
    fn from(place: NominatimPlace) -> Self {
        Self::Nominatim(place)
    }
}
