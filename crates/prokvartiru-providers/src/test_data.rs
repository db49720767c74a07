//! Canned provider and backend payloads for tests.
//!
//! The bodies mirror what the live services return so that decoding is exercised
//! against realistic shapes, including the quirks (string coordinates, HTTP 200
//! error bodies, missing address blocks).

/// `GeoNames` answer for `name_startsWith=Алматы`.
pub const GEONAMES_ALMATY: &str = r#"{
  "totalResultsCount": 1,
  "geonames": [
    {
      "geonameId": 1,
      "name": "Алматы",
      "adminName1": "Алматы қаласы",
      "countryName": "Kazakhstan",
      "lat": "43.25",
      "lng": "76.95",
      "fcodeName": "city"
    }
  ]
}"#;

/// Several cities sharing a prefix, one of them duplicated by a remembered address.
pub const GEONAMES_AST: &str = r#"{
  "totalResultsCount": 3,
  "geonames": [
    {"geonameId": 1526273, "name": "Astana", "adminName1": "Astana", "countryName": "Kazakhstan",
     "lat": "51.1801", "lng": "71.44598", "fcodeName": "capital of a political entity"},
    {"geonameId": 580497, "name": "Astrakhan", "adminName1": "Astrakhan Oblast", "countryName": "Russia",
     "lat": "46.34968", "lng": "48.04076", "fcodeName": "seat of a first-order administrative division"},
    {"geonameId": 3124364, "name": "Astorga", "adminName1": "Castille and León", "countryName": "Spain",
     "lat": "42.45879", "lng": "-6.05601", "fcodeName": "populated place"}
  ]
}"#;

/// `GeoNames` reports quota problems with HTTP 200 and a status object.
pub const GEONAMES_QUOTA_EXCEEDED: &str = r#"{
  "status": {
    "message": "the daily limit of 20000 credits for demo has been exceeded. Please use an application specific account.",
    "value": 18
  }
}"#;

pub const GEONAMES_EMPTY: &str = r#"{"totalResultsCount": 0, "geonames": []}"#;

/// Nominatim answer for `q=Абая`, the second hit without `address`.
pub const NOMINATIM_ABAYA: &str = r#"[
  {
    "place_id": 298473611,
    "display_name": "проспект Абая, Бостандыкский район, Алматы, 050000, Казахстан",
    "lat": "43.2402",
    "lon": "76.9054",
    "type": "primary",
    "address": {
      "road": "проспект Абая",
      "city_district": "Бостандыкский район",
      "city": "Алматы",
      "postcode": "050000",
      "country": "Казахстан",
      "country_code": "kz"
    }
  },
  {
    "place_id": "187221045",
    "display_name": "улица Абая, Косшы, Акмолинская область, Казахстан",
    "lat": "51.0111",
    "lon": "71.5402",
    "type": "residential"
  }
]"#;

pub const NOMINATIM_EMPTY: &str = "[]";

/// Backend `/addresses/*` body with a mix of numeric and string ids.
pub const REMEMBERED_ALMATY: &str = r#"{
  "addresses": [
    {"id": 11, "city": "Алматы", "street": "проспект Абая", "building": "10", "usageCount": 4},
    {"id": "12", "city": "Алматы", "street": "улица Сатпаева", "building": "90/1",
     "residentialComplex": "Tau Park", "usageCount": 9},
    {"id": 13, "city": "Алматы", "street": "проспект Достык", "building": "5"}
  ]
}"#;

/// Popular cities as the backend ranks them.
pub const REMEMBERED_POPULAR: &str = r#"{
  "addresses": [
    {"id": 1, "city": "Астана", "street": "проспект Мангилик Ел", "building": "55", "usageCount": 31},
    {"id": 2, "city": "Алматы", "street": "проспект Абая", "building": "10", "usageCount": 57},
    {"id": 3, "city": "Шымкент", "street": "проспект Тауке хана", "building": "1", "usageCount": 12}
  ]
}"#;

/// Remembered entry that collides with a `GeoNames` hit in [`GEONAMES_AST`].
pub const REMEMBERED_ASTANA: &str = r#"{
  "addresses": [
    {"id": 21, "city": "Astana", "street": "Kabanbay Batyr Ave", "building": "53",
     "residentialComplex": "Highvill", "usageCount": 3}
  ]
}"#;

pub const REMEMBERED_EMPTY: &str = r#"{"addresses": []}"#;
