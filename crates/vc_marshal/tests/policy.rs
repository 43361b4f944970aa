use vc_marshal::info::UnknownKeys;
use vc_marshal::value::{Map, Value};
use vc_marshal::{ErrorKind, Marshal, Unmapped};

fn map<const N: usize>(pairs: [(&str, Value); N]) -> Map {
    pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

// -----------------------------------------------------------------------------
// Ignore

#[derive(Marshal, Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

#[test]
fn unknown_keys_are_dropped_by_default() {
    assert_eq!(Point::struct_info().unwrap().policy(), UnknownKeys::Ignore);

    let point = Point::from_map(map([
        ("x", Value::from(1)),
        ("y", Value::from(2)),
        ("z", Value::from(3)),
    ]))
    .unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });
    assert!(!point.to_map().unwrap().contains_key("z"));
}

// -----------------------------------------------------------------------------
// Strict

#[derive(Marshal, Debug, PartialEq)]
#[marshal(strict)]
struct Config {
    name: String,
    #[marshal(default)]
    retries: u32,
    #[marshal(ignore_on_read)]
    generation: u64,
}

#[test]
fn strict_rejects_unknown_keys() {
    let err = Config::from_map(map([
        ("name", Value::from("a")),
        ("extra", Value::from(1)),
    ]))
    .unwrap_err();
    assert_eq!(
        *err.kind(),
        ErrorKind::UnknownKey {
            key: "extra".into(),
            type_name: "Config",
        }
    );
    assert_eq!(
        err.to_string(),
        "unknown key `extra` for `Config`\n  parsing Config"
    );
}

#[test]
fn strict_reports_first_unknown_key_in_input_order() {
    let err = Config::from_map([
        ("zeta", Value::from(1)),
        ("name", Value::from("a")),
        ("alpha", Value::from(2)),
    ])
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownKey { key, .. } if key == "zeta"));
}

#[test]
fn strict_counts_keys_of_fields_not_read() {
    let err = Config::from_map(map([
        ("name", Value::from("a")),
        ("generation", Value::from(4)),
    ]))
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownKey { key, .. } if key == "generation"));
}

#[test]
fn strict_accepts_known_keys() {
    let config = Config::from_map(map([
        ("name", Value::from("a")),
        ("retries", Value::from(2)),
    ]))
    .unwrap();
    assert_eq!(config.retries, 2);
    assert_eq!(config.generation, 0);
}

// -----------------------------------------------------------------------------
// Unmapped

#[derive(Marshal, Debug, PartialEq)]
struct Event {
    kind: String,
    #[marshal(unmapped)]
    rest: Unmapped,
}

#[test]
fn unmapped_keys_survive_a_round_trip() {
    let input = map([
        ("kind", Value::from("click")),
        ("x", Value::from(10)),
        ("meta", Value::from_iter([("source", "mouse")])),
    ]);
    let event = Event::from_map(input.clone()).unwrap();

    assert_eq!(Event::struct_info().unwrap().policy(), UnknownKeys::Unmapped);
    assert_eq!(event.rest.len(), 2);
    assert_eq!(event.rest.get("x"), Some(&Value::from(10)));
    assert!(!event.rest.contains_key("kind"));

    assert_eq!(event.to_map().unwrap(), input);
}

#[test]
fn declared_fields_win_over_unmapped_entries() {
    let mut event = Event::from_map([("kind", Value::from("click"))]).unwrap();
    assert!(event.rest.is_empty());

    event.rest.insert("kind", Value::from("stale"));
    let exported = event.to_map().unwrap();
    assert_eq!(exported["kind"], Value::from("click"));
}

#[derive(Marshal, Debug)]
struct Counters {
    label: String,
    #[marshal(unmapped)]
    counts: Unmapped<i64>,
}

#[test]
fn typed_unmapped_store() {
    let counters = Counters::from_map(map([
        ("label", Value::from("page")),
        ("hits", Value::from(3)),
        ("misses", Value::from(1)),
    ]))
    .unwrap();
    let total: i64 = counters.counts.iter().map(|(_, v)| v).sum();
    assert_eq!(total, 4);

    let err = Counters::from_map(map([
        ("label", Value::from("page")),
        ("hits", Value::from("many")),
    ]))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected int for `hits`, found \"many\"\n  parsing Counters"
    );
}
