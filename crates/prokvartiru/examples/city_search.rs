//! One-off city and street lookups
//!
//! This example demonstrates the non-debounced operations:
//! - Searching cities through GeoNames and streets through Nominatim
//! - Merging live suggestions with remembered addresses
//! - Telling "nothing found" apart from "the request failed"
//!
//! Set `GEONAMES_USERNAME` to an account of your own; the `demo` account is
//! rate limited and usually rejected.

use prokvartiru::{AutocompleteConfig, LocationAutocomplete, LocationKind, SearchStatus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    prokvartiru::init_logging(tracing::Level::INFO)?;

    let config = AutocompleteConfig::builder().limit(5).build()?;
    let autocomplete = LocationAutocomplete::new(config)?;

    // Raw geocoding, straight from the provider
    println!("Cities starting with 'Алма':");
    let response = autocomplete.geocoding().search_cities("Алма", 5).await;
    for suggestion in &response.suggestions {
        println!(
            "  {} ({:.4}, {:.4})",
            suggestion.display_name, suggestion.lat, suggestion.lon
        );
    }
    if let Some(error) = &response.error {
        println!("  {error}");
    }

    // Merged options as the address form shows them
    println!("\nStreets matching 'Абая' in Алматы:");
    let outcome = autocomplete
        .suggest(LocationKind::Street, "Абая", Some("Алматы"))
        .await;
    match &outcome.status {
        SearchStatus::Found => {
            for (i, option) in outcome.options.iter().enumerate() {
                println!(
                    "  {}. {} [{:?}] {}",
                    i + 1,
                    option.label,
                    option.source,
                    option.description
                );
            }
        }
        SearchStatus::NoResults => println!("  Nothing found"),
        SearchStatus::Failed(message) => println!("  {message}"),
    }

    Ok(())
}
