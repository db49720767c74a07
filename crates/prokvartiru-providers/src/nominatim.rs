//! Nominatim `/search` wire format, used for street lookups.
use serde::Deserialize;

use crate::{Address, LocationSuggestion, NOMINATIM_URL, Provider, lenient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimEndpoint {
    pub base_url: String,
}

impl Default for NominatimEndpoint {
    fn default() -> Self {
        Self {
            base_url: NOMINATIM_URL.clone(),
        }
    }
}

impl NominatimEndpoint {
    pub fn search_url(&self) -> String {
        crate::endpoint_url(&self.base_url, "search")
    }
}

/// Free-text street search, optionally qualified by a city.
#[derive(Debug, Clone, Copy)]
pub struct NominatimQuery<'a> {
    pub street: &'a str,
    pub city: Option<&'a str>,
    pub limit: usize,
}

impl<'a> NominatimQuery<'a> {
    pub const fn new(street: &'a str, city: Option<&'a str>, limit: usize) -> Self {
        Self {
            street,
            city,
            limit,
        }
    }

    /// `"<street>, <city>"` when a non-blank city is known, the bare street otherwise.
    pub fn text(&self) -> String {
        match self.city.map(str::trim).filter(|city| !city.is_empty()) {
            Some(city) => format!("{}, {city}", self.street),
            None => self.street.to_string(),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.text()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", self.limit.to_string()),
            ("featuretype", "street".to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NominatimPlace {
    #[serde(deserialize_with = "lenient::string")]
    pub place_id: String,
    pub display_name: String,
    #[serde(deserialize_with = "lenient::f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub lon: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

/// The subset of `addressdetails=1` output the autocomplete cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NominatimAddress {
    pub road: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl NominatimPlace {
    pub fn into_suggestion(self) -> LocationSuggestion {
        let NominatimAddress {
            road,
            street,
            city,
            town,
            village,
            state,
            country,
        } = self.address;

        LocationSuggestion {
            id: self.place_id,
            display_name: self.display_name,
            lat: self.lat,
            lon: self.lon,
            kind: self.kind,
            address: Address {
                city,
                town,
                village,
                street,
                road,
                state,
                country,
            },
            provider: Provider::Nominatim,
        }
    }
}
