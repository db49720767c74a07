//! Keystroke-driven autocomplete
//!
//! Simulates a user typing into the city field and then the street field. Only the
//! options for the last committed query are printed; intermediate keystrokes are
//! absorbed by the debounce and stale lookups are discarded.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use prokvartiru::{
    AutocompleteConfigBuilder, AutocompleteSession, LocationAutocomplete, LocationKind,
    OptionsUpdate,
};
use tokio::sync::mpsc::UnboundedReceiver;

const WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prokvartiru::init_logging(tracing::Level::INFO)?;

    let config = AutocompleteConfigBuilder::responsive()
        .build()
        .context("building configuration")?;
    let autocomplete = Arc::new(
        LocationAutocomplete::new(config).context("creating the autocomplete")?,
    );

    let (city_field, mut city_updates) =
        AutocompleteSession::spawn(Arc::clone(&autocomplete), LocationKind::City, None);
    type_into(&city_field, "Алматы").await;

    let mut chosen_city = None;
    if let Some(update) = next_update(&mut city_updates).await {
        println!("City options for '{}':", update.outcome.query);
        for option in &update.outcome.options {
            println!("  {} - {}", option.label, option.description);
        }
        chosen_city = update
            .outcome
            .options
            .first()
            .map(|option| option.value.clone());
    }
    city_field.close();

    let (street_field, mut street_updates) =
        AutocompleteSession::spawn(autocomplete, LocationKind::Street, chosen_city);
    type_into(&street_field, "Абая").await;

    if let Some(update) = next_update(&mut street_updates).await {
        println!(
            "\nStreet options for '{}' ({:?}):",
            update.outcome.query, update.outcome.status
        );
        for option in &update.outcome.options {
            println!("  {} [{:?}]", option.label, option.source);
        }
    }
    street_field.close();

    Ok(())
}

async fn next_update(updates: &mut UnboundedReceiver<OptionsUpdate>) -> Option<OptionsUpdate> {
    tokio::time::timeout(WAIT, updates.recv()).await.ok().flatten()
}

/// Feed the field one character at a time, faster than the debounce period.
async fn type_into(field: &AutocompleteSession, text: &str) {
    let mut typed = String::new();
    for ch in text.chars() {
        typed.push(ch);
        field.input(typed.clone());
        tokio::time::sleep(Duration::from_millis(80)).await;
    }
}
