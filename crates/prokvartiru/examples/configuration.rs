//! Configuration options
//!
//! Shows the presets, individual overrides, and validation of the builder.

use std::time::Duration;

use prokvartiru::{AutocompleteConfig, AutocompleteConfigBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default = AutocompleteConfig::default();
    print_config("Default", &default);

    let responsive = AutocompleteConfigBuilder::responsive().build()?;
    print_config("Responsive", &responsive);

    let thorough = AutocompleteConfigBuilder::thorough().build()?;
    print_config("Thorough", &thorough);

    // Presets are starting points
    let custom = AutocompleteConfigBuilder::responsive()
        .debounce(Duration::from_millis(250))
        .street_limit(8)
        .min_query_chars(3)
        .cache(512, Duration::from_secs(300))
        .geonames_username("prokvartiru")
        .api_url("https://prokvartiru.kz/api")
        .build()?;
    print_config("Custom", &custom);

    // Invalid values are refused at build time
    match AutocompleteConfig::builder().limit(0).build() {
        Ok(_) => println!("\nUnexpectedly accepted a zero limit"),
        Err(err) => println!("\nRejected: {err}"),
    }

    Ok(())
}

fn print_config(name: &str, config: &AutocompleteConfig) {
    println!("{name}:");
    println!("  debounce:        {:?}", config.debounce);
    println!("  min query chars: {}", config.min_query_chars);
    println!(
        "  limits:          {} cities, {} streets, {} remembered",
        config.city_limit, config.street_limit, config.remembered_limit
    );
    println!("  request timeout: {:?}", config.request_timeout);
    println!(
        "  cache:           {} entries for {:?}",
        config.cache_capacity, config.cache_ttl
    );
    println!("  backend:         {}", config.endpoints.api_url);
}
