//! ProKvartiru location autocomplete
//!
//! Address entry on ProKvartiru.kz (posting a review of a flat or a tenant, searching
//! for one) goes through two autocompleting fields: the city and the street. This
//! library provides everything behind them:
//!
//! - **Geocoding**: cities from `GeoNames`, streets from Nominatim, memoized in a
//!   bounded TTL cache
//! - **Remembered addresses**: addresses other users already saved on the backend,
//!   offered first and ordered by how often they are used
//! - **Debounced sessions**: keystrokes are committed after a quiet period and stale
//!   responses never overwrite newer ones
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use prokvartiru::{AutocompleteConfig, AutocompleteSession, LocationAutocomplete, LocationKind};
//!
//! # async fn run() -> Result<(), prokvartiru::error::ProKvartiruError> {
//! let config = AutocompleteConfig::builder()
//!     .geonames_username("prokvartiru")
//!     .api_url("https://prokvartiru.kz/api")
//!     .build()?;
//! let autocomplete = Arc::new(LocationAutocomplete::new(config)?);
//!
//! // One-off lookup
//! let outcome = autocomplete.suggest(LocationKind::City, "Алматы", None).await;
//! println!("{} options, status {:?}", outcome.options.len(), outcome.status);
//!
//! // Keystroke-driven street field, narrowed to the chosen city
//! let (session, mut updates) =
//!     AutocompleteSession::spawn(autocomplete, LocationKind::Street, Some("Алматы".into()));
//! session.input("Аб");
//! session.input("Абая");
//! if let Some(update) = updates.recv().await {
//!     println!("{:?}", update.outcome.options);
//! }
//! # Ok(())
//! # }
//! ```
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod addresses;
pub mod cache;
mod config;
mod core;
pub mod debounce;
pub mod error;
pub mod geocoding;
pub mod ranking;
mod session;

pub use crate::core::{AutocompleteOutcome, LocationAutocomplete};

pub use addresses::{AddressBook, NewAddress, RememberedAddress};
pub use cache::TtlCache;
pub use config::{AutocompleteConfig, AutocompleteConfigBuilder, ProviderEndpoints};
pub use debounce::{CommittedQuery, DebouncedSearchController};
pub use geocoding::{GeocodingClient, SearchStatus, SuggestionResponse};
pub use prokvartiru_providers as providers;
pub use prokvartiru_providers::{Address, LocationSuggestion};
pub use ranking::{LocationKind, LocationOption, OptionSource, merge};
pub use session::{AutocompleteSession, OptionsUpdate};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the autocomplete.
///
/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, or by `level` when
/// `RUST_LOG` is unset. Only the first call has an effect.
///
/// # Examples
///
/// ```rust
/// use prokvartiru::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), prokvartiru::error::ProKvartiruError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> error::Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
        Ok(())
    })
}
