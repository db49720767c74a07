//! Merging remembered addresses with live geocoding suggestions.
//!
//! The options list shown under an address field is built from two sources. Addresses
//! other users already saved are the most likely picks, so they always come first,
//! busiest first. Geocoding suggestions fill in behind them. A place that appears in
//! both sources is listed once, as the remembered entry.

use itertools::Itertools;
use prokvartiru_providers::LocationSuggestion;
use serde::{Deserialize, Serialize};

use crate::addresses::RememberedAddress;

const COMPLEX_SEPARATOR: &str = " • ";

/// Which address field is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    City,
    Street,
}

/// Origin of an option. The declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSource {
    Remembered,
    Geocoding,
}

/// A selectable entry of the autocomplete list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOption {
    /// What gets written into the field when the option is picked.
    pub value: String,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub source: OptionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u32>,
}

impl LocationOption {
    /// Label selection: city → town → village for cities, street → road for streets,
    /// the full display name when the address block has nothing usable.
    pub fn from_suggestion(suggestion: &LocationSuggestion, kind: LocationKind) -> Option<Self> {
        let address = &suggestion.address;
        let candidates = match kind {
            LocationKind::City => [&address.city, &address.town, &address.village],
            LocationKind::Street => [&address.street, &address.road, &None],
        };
        let label = candidates
            .into_iter()
            .flatten()
            .map(|part| part.trim())
            .find(|part| !part.is_empty())
            .unwrap_or_else(|| suggestion.display_name.trim());

        Self::build(
            label,
            suggestion.display_name.trim().to_string(),
            address.country.clone(),
            OptionSource::Geocoding,
            None,
        )
    }

    pub fn from_remembered(address: &RememberedAddress, kind: LocationKind) -> Option<Self> {
        let (label, rest) = match kind {
            LocationKind::City => (&address.city, [&address.street, &address.building]),
            LocationKind::Street => (&address.street, [&address.building, &address.city]),
        };

        let mut description = rest
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .join(", ");
        if let Some(complex) = address
            .residential_complex
            .as_deref()
            .map(str::trim)
            .filter(|complex| !complex.is_empty())
        {
            if !description.is_empty() {
                description.push_str(COMPLEX_SEPARATOR);
            }
            description.push_str(complex);
        }

        Self::build(
            label.trim(),
            description,
            None,
            OptionSource::Remembered,
            address.usage_count,
        )
    }

    fn build(
        label: &str,
        description: String,
        country: Option<String>,
        source: OptionSource,
        usage_count: Option<u32>,
    ) -> Option<Self> {
        if label.is_empty() {
            return None;
        }
        Some(Self {
            value: label.to_string(),
            label: label.to_string(),
            description,
            country,
            source,
            usage_count,
        })
    }

    pub const fn is_remembered(&self) -> bool {
        matches!(self.source, OptionSource::Remembered)
    }

    /// Key used for de-duplication: case and spacing differences do not count.
    pub fn dedup_key(&self) -> String {
        self.value.split_whitespace().join(" ").to_lowercase()
    }
}

/// Combine geocoding suggestions and remembered addresses into one options list.
///
/// Values are unique in the result, remembered options precede geocoding ones, and
/// among options with a usage count the larger count comes first. Options without a
/// count keep their place.
pub fn merge(
    geocode_results: &[LocationSuggestion],
    remembered: &[RememberedAddress],
    kind: LocationKind,
) -> Vec<LocationOption> {
    let remembered_options = remembered
        .iter()
        .filter_map(|address| LocationOption::from_remembered(address, kind));
    let geocoding_options = geocode_results
        .iter()
        .filter_map(|suggestion| LocationOption::from_suggestion(suggestion, kind));

    // Remembered first so that they win the de-duplication.
    let mut options: Vec<LocationOption> = remembered_options
        .chain(geocoding_options)
        .unique_by(LocationOption::dedup_key)
        .collect();

    options.sort_by_key(|option| option.source);
    let split = options.partition_point(LocationOption::is_remembered);
    let (remembered_part, geocoding_part) = options.split_at_mut(split);
    rank_by_usage(remembered_part);
    rank_by_usage(geocoding_part);

    options
}

/// Stable descending sort of the options that carry a usage count, performed in the
/// slots those options already occupy. Options without a count do not move.
fn rank_by_usage(options: &mut [LocationOption]) {
    let slots: Vec<usize> = options
        .iter()
        .positions(|option| option.usage_count.is_some())
        .collect();
    if slots.len() < 2 {
        return;
    }

    let mut counted: Vec<LocationOption> = slots.iter().map(|&i| options[i].clone()).collect();
    counted.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    for (slot, option) in slots.into_iter().zip(counted) {
        options[slot] = option;
    }
}
