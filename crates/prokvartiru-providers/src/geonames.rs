//! `GeoNames` `searchJSON` wire format, used for city lookups.
use itertools::Itertools;
use serde::Deserialize;

use crate::{Address, GEONAMES_URL, GEONAMES_USERNAME, LocationSuggestion, Provider, lenient};

/// Feature class `P`: populated places (cities, towns, villages).
pub const FEATURE_CLASS_POPULATED_PLACE: &str = "P";

/// Where and as whom to call `GeoNames`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoNamesEndpoint {
    pub base_url: String,
    pub username: String,
}

impl Default for GeoNamesEndpoint {
    fn default() -> Self {
        Self {
            base_url: GEONAMES_URL.clone(),
            username: GEONAMES_USERNAME.clone(),
        }
    }
}

impl GeoNamesEndpoint {
    pub fn search_url(&self) -> String {
        crate::endpoint_url(&self.base_url, "searchJSON")
    }
}

/// Prefix search over populated places.
#[derive(Debug, Clone, Copy)]
pub struct GeoNamesQuery<'a> {
    pub name_starts_with: &'a str,
    pub max_rows: usize,
}

impl<'a> GeoNamesQuery<'a> {
    pub const fn new(name_starts_with: &'a str, max_rows: usize) -> Self {
        Self {
            name_starts_with,
            max_rows,
        }
    }

    /// Query string pairs in the order `GeoNames` documents them.
    pub fn params(&self, username: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name_startsWith", self.name_starts_with.to_string()),
            ("maxRows", self.max_rows.to_string()),
            ("username", username.to_string()),
            ("featureClass", FEATURE_CLASS_POPULATED_PLACE.to_string()),
        ]
    }
}

/// Top-level `searchJSON` body.
///
/// `GeoNames` reports account and quota problems with HTTP 200 and a `status`
/// object instead of a `geonames` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoNamesResponse {
    #[serde(default)]
    pub geonames: Vec<GeoNamesPlace>,
    pub status: Option<GeoNamesStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoNamesStatus {
    pub message: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoNamesPlace {
    #[serde(deserialize_with = "lenient::string")]
    pub geoname_id: String,
    pub name: String,
    #[serde(default)]
    pub admin_name1: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub lng: f64,
    #[serde(default)]
    pub fcode_name: String,
}

impl GeoNamesPlace {
    /// `"name, adminName1, countryName"`, skipping blank parts.
    pub fn display_name(&self) -> String {
        [&self.name, &self.admin_name1, &self.country_name]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .join(", ")
    }

    pub fn into_suggestion(self) -> LocationSuggestion {
        let display_name = self.display_name();
        LocationSuggestion {
            id: self.geoname_id,
            display_name,
            lat: self.lat,
            lon: self.lng,
            kind: self.fcode_name,
            address: Address {
                city: non_empty(self.name),
                state: non_empty(self.admin_name1),
                country: non_empty(self.country_name),
                ..Address::default()
            },
            provider: Provider::GeoNames,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
