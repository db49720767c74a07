mod common;

use std::{sync::Arc, time::Duration};

use common::{RecordedRequest, StubResponse, StubServer};
use prokvartiru::{
    AutocompleteConfig, AutocompleteSession, LocationAutocomplete, LocationKind, NewAddress,
    OptionSource, SearchStatus, init_logging, providers::ProviderError,
};
use prokvartiru_providers::test_data;

const GEONAMES_PATH: &str = "/searchJSON";
const NOMINATIM_PATH: &str = "/search";
const POPULAR_PATH: &str = "/api/addresses/popular";
const REMEMBERED_PATH: &str = "/api/addresses/remembered";
const SEARCH_PATH: &str = "/api/addresses/search";

fn setup_test_env() {
    let _ = init_logging(tracing::Level::WARN);
}

fn config_for(stub: &StubServer) -> AutocompleteConfig {
    AutocompleteConfig::builder()
        .debounce(Duration::from_millis(20))
        .geonames_username("prokvartiru")
        .geonames_url(&stub.base_url)
        .nominatim_url(&stub.base_url)
        .api_url(format!("{}/api", stub.base_url))
        .request_timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

fn autocomplete_for(stub: &StubServer) -> LocationAutocomplete {
    LocationAutocomplete::new(config_for(stub)).unwrap()
}

/// Routes every path to an empty but valid body.
fn empty_route(request: &RecordedRequest) -> StubResponse {
    match request.path.as_str() {
        GEONAMES_PATH => StubResponse::json(test_data::GEONAMES_EMPTY),
        NOMINATIM_PATH => StubResponse::json(test_data::NOMINATIM_EMPTY),
        POPULAR_PATH | REMEMBERED_PATH | SEARCH_PATH => {
            StubResponse::json(test_data::REMEMBERED_EMPTY)
        }
        _ => StubResponse::not_found(),
    }
}

#[tokio::test]
async fn test_city_search_almaty() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        GEONAMES_PATH => StubResponse::json(test_data::GEONAMES_ALMATY),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let response = autocomplete
        .geocoding()
        .search_cities("Алматы", 10)
        .await;

    assert_eq!(response.status(), SearchStatus::Found);
    assert_eq!(response.suggestions.len(), 1);
    let almaty = &response.suggestions[0];
    assert_eq!(almaty.id, "1");
    assert_eq!(almaty.address.city.as_deref(), Some("Алматы"));
    assert_eq!(almaty.display_name, "Алматы, Алматы қаласы, Kazakhstan");
    assert!((almaty.lat - 43.25).abs() < f64::EPSILON);

    let requests = stub.requests_to(GEONAMES_PATH);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.param("name_startsWith"), Some("Алматы"));
    assert_eq!(request.param("maxRows"), Some("10"));
    assert_eq!(request.param("username"), Some("prokvartiru"));
    assert_eq!(request.param("featureClass"), Some("P"));
}

#[tokio::test]
async fn test_city_search_server_error() {
    setup_test_env();
    let stub = StubServer::start(|_| StubResponse::status(500)).await;
    let autocomplete = autocomplete_for(&stub);

    let response = autocomplete.geocoding().search_cities("Алм", 10).await;
    assert!(response.suggestions.is_empty());
    assert_eq!(response.error.as_deref(), Some("Failed to search cities"));

    let err = autocomplete
        .geocoding()
        .try_search_cities("Алм", 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err.provider_error(),
        ProviderError::Upstream { status: 500 }
    ));
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    setup_test_env();
    let stub = StubServer::start(|_| StubResponse::status(503)).await;
    let autocomplete = autocomplete_for(&stub);

    autocomplete.geocoding().search_cities("Алм", 10).await;
    autocomplete.geocoding().search_cities("Алм", 10).await;

    assert_eq!(stub.requests_to(GEONAMES_PATH).len(), 2);
    assert!(autocomplete.geocoding().cache().is_empty());
}

#[tokio::test]
async fn test_geonames_status_body_is_rejected() {
    setup_test_env();
    let stub =
        StubServer::start(|_| StubResponse::json(test_data::GEONAMES_QUOTA_EXCEEDED)).await;
    let autocomplete = autocomplete_for(&stub);

    let err = autocomplete
        .geocoding()
        .try_search_cities("Алм", 10)
        .await
        .unwrap_err();

    match err.provider_error() {
        ProviderError::Rejected { provider, message } => {
            assert_eq!(*provider, "GeoNames");
            assert!(message.contains("limit"));
        }
        other => panic!("Expected a rejection, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Failed to search cities");
}

#[tokio::test]
async fn test_successful_searches_are_cached() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        GEONAMES_PATH => StubResponse::json(test_data::GEONAMES_ALMATY),
        NOMINATIM_PATH => StubResponse::json(test_data::NOMINATIM_ABAYA),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);
    let geocoding = autocomplete.geocoding();

    let first = geocoding.search_cities("Алматы", 10).await;
    let second = geocoding.search_cities("Алматы", 10).await;
    assert_eq!(first, second);
    assert_eq!(stub.requests_to(GEONAMES_PATH).len(), 1);

    // A different limit is a different key.
    geocoding.search_cities("Алматы", 5).await;
    assert_eq!(stub.requests_to(GEONAMES_PATH).len(), 2);

    geocoding.search_streets("Абая", Some("Алматы"), 10).await;
    geocoding.search_streets("Абая", Some("Алматы"), 10).await;
    geocoding.search_streets("Абая", None, 10).await;
    assert_eq!(stub.requests_to(NOMINATIM_PATH).len(), 2);
}

#[tokio::test]
async fn test_street_search_query_params() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        NOMINATIM_PATH => StubResponse::json(test_data::NOMINATIM_ABAYA),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let response = autocomplete
        .geocoding()
        .search_streets("Абая", Some("Алматы"), 7)
        .await;
    assert_eq!(response.status(), SearchStatus::Found);
    assert_eq!(response.suggestions.len(), 2);
    assert_eq!(
        response.suggestions[0].address.road.as_deref(),
        Some("проспект Абая")
    );
    assert_eq!(response.suggestions[1].id, "187221045");

    autocomplete
        .geocoding()
        .search_streets("Сатпаева", None, 7)
        .await;

    let requests = stub.requests_to(NOMINATIM_PATH);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].param("q"), Some("Абая, Алматы"));
    assert_eq!(requests[0].param("format"), Some("json"));
    assert_eq!(requests[0].param("addressdetails"), Some("1"));
    assert_eq!(requests[0].param("limit"), Some("7"));
    assert_eq!(requests[1].param("q"), Some("Сатпаева"));
}

#[tokio::test]
async fn test_street_search_timeout() {
    setup_test_env();
    let stub = StubServer::start(|_| {
        StubResponse::json(test_data::NOMINATIM_ABAYA).delayed(Duration::from_millis(800))
    })
    .await;
    let config = AutocompleteConfig::builder()
        .nominatim_url(&stub.base_url)
        .request_timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let autocomplete = LocationAutocomplete::new(config).unwrap();

    let err = autocomplete
        .geocoding()
        .try_search_streets("Абая", Some("Алматы"), 10)
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "Expected a timeout, got {err}");

    let response = autocomplete
        .geocoding()
        .search_streets("Абая", Some("Алматы"), 10)
        .await;
    assert_eq!(response.error.as_deref(), Some("Failed to search streets"));
}

#[tokio::test]
async fn test_suggest_cities_remembered_first() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        GEONAMES_PATH => StubResponse::json(test_data::GEONAMES_AST),
        SEARCH_PATH => StubResponse::json(test_data::REMEMBERED_ASTANA),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete.suggest(LocationKind::City, " Ast ", None).await;

    assert_eq!(outcome.query, "Ast");
    assert_eq!(outcome.status, SearchStatus::Found);
    let labels: Vec<&str> = outcome.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["Astana", "Astrakhan", "Astorga"]);

    let astana = &outcome.options[0];
    assert_eq!(astana.source, OptionSource::Remembered);
    assert_eq!(astana.usage_count, Some(3));
    assert_eq!(astana.description, "Kabanbay Batyr Ave, 53 • Highvill");
    assert_eq!(outcome.options[1].source, OptionSource::Geocoding);
    assert_eq!(outcome.options[1].country.as_deref(), Some("Russia"));

    let search = stub.requests_to(SEARCH_PATH);
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].param("q"), Some("Ast"));
    assert_eq!(search[0].param("limit"), Some("5"));
}

#[tokio::test]
async fn test_suggest_streets_within_city() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        NOMINATIM_PATH => StubResponse::json(test_data::NOMINATIM_ABAYA),
        REMEMBERED_PATH => StubResponse::json(test_data::REMEMBERED_ALMATY),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete
        .suggest(LocationKind::Street, "абая", Some("Алматы"))
        .await;

    let labels: Vec<&str> = outcome.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "проспект Абая",
            "улица Абая, Косшы, Акмолинская область, Казахстан"
        ]
    );
    assert_eq!(outcome.options[0].source, OptionSource::Remembered);
    assert_eq!(outcome.options[0].description, "10, Алматы");

    let remembered = stub.requests_to(REMEMBERED_PATH);
    assert_eq!(remembered.len(), 1);
    assert_eq!(remembered[0].param("city"), Some("Алматы"));
    assert!(stub.requests_to(SEARCH_PATH).is_empty());
}

#[tokio::test]
async fn test_short_query_uses_popular_addresses() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        POPULAR_PATH => StubResponse::json(test_data::REMEMBERED_POPULAR),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete.suggest(LocationKind::City, "А", None).await;

    let labels: Vec<&str> = outcome.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["Алматы", "Астана", "Шымкент"]);
    assert!(outcome.options.iter().all(|o| o.source == OptionSource::Remembered));
    assert_eq!(outcome.status, SearchStatus::Found);
    assert!(
        stub.requests_to(GEONAMES_PATH).is_empty(),
        "Short queries must not reach the geocoder"
    );
}

#[tokio::test]
async fn test_remembered_failure_keeps_geocoding_options() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        GEONAMES_PATH => StubResponse::json(test_data::GEONAMES_AST),
        _ => StubResponse::status(500),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete.suggest(LocationKind::City, "Ast", None).await;

    assert_eq!(outcome.status, SearchStatus::Found);
    assert_eq!(outcome.options.len(), 3);
    assert!(outcome.options.iter().all(|o| o.source == OptionSource::Geocoding));
}

#[tokio::test]
async fn test_suggest_reports_failure() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        SEARCH_PATH => StubResponse::json(test_data::REMEMBERED_EMPTY),
        _ => StubResponse::status(500),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete.suggest(LocationKind::City, "Алм", None).await;

    assert!(outcome.is_empty());
    assert_eq!(
        outcome.status,
        SearchStatus::Failed("Failed to search cities".to_string())
    );
}

#[tokio::test]
async fn test_suggest_reports_no_results() {
    setup_test_env();
    let stub = StubServer::start(empty_route).await;
    let autocomplete = autocomplete_for(&stub);

    let outcome = autocomplete.suggest(LocationKind::City, "Qwxz", None).await;

    assert!(outcome.is_empty());
    assert_eq!(outcome.status, SearchStatus::NoResults);
}

#[tokio::test]
async fn test_remember_posts_and_invalidates_cache() {
    setup_test_env();
    let stub = StubServer::start(|request| match (request.method.as_str(), request.path.as_str()) {
        ("GET", POPULAR_PATH) => StubResponse::json(test_data::REMEMBERED_POPULAR),
        ("POST", REMEMBERED_PATH) => StubResponse {
            status: 201,
            ..StubResponse::json("{}")
        },
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = autocomplete_for(&stub);
    let addresses = autocomplete.addresses();

    addresses.popular(5).await.unwrap();
    addresses.popular(5).await.unwrap();
    assert_eq!(stub.requests_to(POPULAR_PATH).len(), 1);

    let address = NewAddress::new("Алматы", "проспект Абая", "10").residential_complex("Tau Park");
    autocomplete.remember(&address).await.unwrap();

    let posted = stub
        .requests()
        .into_iter()
        .find(|request| request.method == "POST")
        .expect("remember should POST");
    assert_eq!(posted.path, REMEMBERED_PATH);
    let body: serde_json::Value = serde_json::from_str(&posted.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "city": "Алматы",
            "street": "проспект Абая",
            "building": "10",
            "residentialComplex": "Tau Park"
        })
    );

    addresses.popular(5).await.unwrap();
    assert_eq!(
        stub.requests_to(POPULAR_PATH).len(),
        2,
        "Saving an address should drop cached reads"
    );
}

#[tokio::test]
async fn test_remember_rejects_incomplete_address() {
    setup_test_env();
    let stub = StubServer::start(empty_route).await;
    let autocomplete = autocomplete_for(&stub);

    let result = autocomplete
        .remember(&NewAddress::new("Алматы", "  ", "10"))
        .await;
    assert!(result.is_err());
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_session_publishes_latest_only() {
    setup_test_env();
    let stub = StubServer::start(|request| match request.path.as_str() {
        NOMINATIM_PATH if request.param("q") == Some("Аба, Алматы") => {
            StubResponse::json(test_data::NOMINATIM_EMPTY).delayed(Duration::from_millis(300))
        }
        NOMINATIM_PATH => StubResponse::json(test_data::NOMINATIM_ABAYA),
        REMEMBERED_PATH => StubResponse::json(test_data::REMEMBERED_ALMATY),
        _ => StubResponse::not_found(),
    })
    .await;
    let autocomplete = Arc::new(autocomplete_for(&stub));

    let (session, mut updates) =
        AutocompleteSession::spawn(autocomplete, LocationKind::Street, Some("Алматы".into()));

    session.input("Аба");
    // Let the first query commit and its slow request start.
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.input("Абая");

    let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .expect("an update should arrive")
        .expect("session should still be open");
    assert_eq!(update.sequence, 2);
    assert_eq!(update.outcome.query, "Абая");
    assert_eq!(update.outcome.status, SearchStatus::Found);

    let stale = tokio::time::timeout(Duration::from_millis(500), updates.recv()).await;
    assert!(stale.is_err(), "Superseded lookup must not publish");

    session.close();
    assert!(updates.recv().await.is_none());
}

#[tokio::test]
async fn test_session_city_change_applies_to_next_query() {
    setup_test_env();
    let stub = StubServer::start(empty_route).await;
    let autocomplete = Arc::new(autocomplete_for(&stub));

    let (session, mut updates) =
        AutocompleteSession::spawn(autocomplete, LocationKind::Street, Some("Алматы".into()));

    session.input("Абая");
    let first = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.outcome.status, SearchStatus::NoResults);

    session.set_city(Some("Астана".into()));
    session.input("Кенесары");
    tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .unwrap()
        .unwrap();

    let queries: Vec<String> = stub
        .requests_to(NOMINATIM_PATH)
        .iter()
        .filter_map(|request| request.param("q").map(str::to_string))
        .collect();
    assert_eq!(queries, ["Абая, Алматы", "Кенесары, Астана"]);
}

#[tokio::test]
async fn test_session_survives_dropped_receiver() {
    setup_test_env();
    let stub = StubServer::start(empty_route).await;
    let autocomplete = Arc::new(autocomplete_for(&stub));

    let (session, updates) = AutocompleteSession::spawn(autocomplete, LocationKind::City, None);
    drop(updates);

    assert!(session.input("Алматы"));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(stub.requests_to(GEONAMES_PATH).len(), 1);

    assert!(session.input("Астана"), "Session should keep accepting input");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(stub.requests_to(GEONAMES_PATH).len(), 2);
}
