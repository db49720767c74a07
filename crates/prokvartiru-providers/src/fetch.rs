//! Outbound calls to the geocoding providers.
//!
//! The caller owns the [`reqwest::Client`] and therefore its timeout and user agent.
use reqwest::{Client, Response};
use tracing::{debug, instrument, warn};

use super::Result;
use crate::{
    GeoNamesEndpoint, GeoNamesQuery, GeoNamesResponse, NominatimEndpoint, NominatimPlace,
    NominatimQuery, Provider, ProviderError, ProviderResult,
};

/// City prefix search against `GeoNames` `searchJSON`.
#[instrument(
    name = "GeoNames search",
    skip_all,
    fields(query = query.name_starts_with, max_rows = query.max_rows),
    level = "debug"
)]
pub async fn search_geonames(
    client: &Client,
    endpoint: &GeoNamesEndpoint,
    query: GeoNamesQuery<'_>,
) -> Result<Vec<ProviderResult>> {
    let response = client
        .get(endpoint.search_url())
        .query(&query.params(&endpoint.username))
        .send()
        .await?;
    let body = read_success_body(response, Provider::GeoNames).await?;

    let decoded: GeoNamesResponse = serde_json::from_str(&body)?;
    if let Some(status) = decoded.status {
        warn!(code = ?status.value, message = %status.message, "GeoNames rejected the request");
        return Err(ProviderError::Rejected {
            provider: Provider::GeoNames.name(),
            message: status.message,
        });
    }

    debug!(count = decoded.geonames.len(), "GeoNames results");
    Ok(decoded
        .geonames
        .into_iter()
        .map(ProviderResult::GeoNames)
        .collect())
}

/// Street search against Nominatim `/search`.
#[instrument(
    name = "Nominatim search",
    skip_all,
    fields(street = query.street, city = ?query.city, limit = query.limit),
    level = "debug"
)]
pub async fn search_nominatim(
    client: &Client,
    endpoint: &NominatimEndpoint,
    query: NominatimQuery<'_>,
) -> Result<Vec<ProviderResult>> {
    let response = client
        .get(endpoint.search_url())
        .query(&query.params())
        .send()
        .await?;
    let body = read_success_body(response, Provider::Nominatim).await?;

    let places: Vec<NominatimPlace> = serde_json::from_str(&body)?;
    debug!(count = places.len(), "Nominatim results");
    Ok(places.into_iter().map(ProviderResult::Nominatim).collect())
}

async fn read_success_body(response: Response, provider: Provider) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        warn!(provider = provider.name(), %status, "Provider answered with an error status");
        return Err(ProviderError::Upstream {
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}
