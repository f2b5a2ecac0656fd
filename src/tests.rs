use crate::objects::*;
use crate::time::{parse_service_time, ServiceTime};
use crate::{Error, RawFeed, Schedule, SharedSchedule, STOP_SEARCH_LIMIT};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::convert::TryFrom;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2024-06-03 is a Monday, 2024-06-01 a Saturday.
fn monday() -> NaiveDate {
    date(2024, 6, 3)
}

fn saturday() -> NaiveDate {
    date(2024, 6, 1)
}

fn basic() -> Schedule {
    Schedule::from_path("fixtures/basic").expect("impossible to read feed")
}

#[test]
fn parse_times() {
    assert_eq!(ServiceTime::from_hms(25, 10, 0), parse_service_time("25:10:00"));
    assert_eq!(ServiceTime::from_hms(8, 5, 0), parse_service_time("08:05:00"));
    // Past-midnight times stay past midnight instead of wrapping
    assert!(parse_service_time("25:10:00") > parse_service_time("08:05:00"));
    assert_eq!("25:10:00", parse_service_time("25:10:00").to_string());

    // Malformed values resolve to zero elapsed time
    assert_eq!(ServiceTime::ZERO, parse_service_time(""));
    assert_eq!(ServiceTime::ZERO, parse_service_time("8:05"));
    assert_eq!(ServiceTime::ZERO, parse_service_time("aa:bb:cc"));
    assert_eq!(ServiceTime::ZERO, parse_service_time("08:05:00:00"));
}

#[test]
fn overflowing_hour_resolves_to_zero() {
    // An hour field too large to represent as seconds is just another
    // malformed value, not a load failure
    assert_eq!(ServiceTime::ZERO, parse_service_time("600000:00:00"));
    assert_eq!(ServiceTime::ZERO, parse_service_time("2147483647:00:00"));
    assert_eq!(ServiceTime::ZERO, ServiceTime::from_hms(i32::MAX, 0, 0));
}

#[test]
fn time_arithmetic() {
    let duration = ServiceTime::from_hms(8, 30, 0) - ServiceTime::from_hms(8, 0, 0);
    assert_eq!("00:30:00", duration.to_string());
    // An inconsistent feed can produce a negative duration; the raw
    // difference is kept
    let negative = ServiceTime::from_hms(8, 0, 0) - ServiceTime::from_hms(8, 30, 0);
    assert_eq!(-1800, negative.as_secs());
    assert_eq!("-00:30:00", negative.to_string());
}

#[test]
fn read_feed() {
    let schedule = basic();
    assert_eq!(4, schedule.stops.len());
    assert_eq!(2, schedule.routes.len());
    assert_eq!(6, schedule.trips.len());
    assert_eq!(12, schedule.stop_times.len());
    assert_eq!(4, schedule.services.len());
    assert_eq!(2, schedule.agencies.len());
    assert_eq!(
        "Demo Transit Authority",
        schedule.get_agency("DTA").unwrap().name
    );
    // An agency without an id is keyed "default"
    assert_eq!(
        "Anonymous Shuttle",
        schedule.get_agency("default").unwrap().name
    );
}

#[test]
fn duplicate_ids_last_write_wins() {
    let schedule = basic();
    assert_eq!("Main Street North", schedule.get_stop("D").unwrap().name);
}

#[test]
fn lookup_misses_are_not_errors() {
    let schedule = basic();
    assert!(schedule.get_stop("nope").is_none());
    assert!(schedule.get_route("nope").is_none());
    assert!(schedule.get_trip("nope").is_none());
    assert!(schedule.get_service("nope").is_none());
}

#[test]
fn missing_required_file_aborts_build() {
    let raw = RawFeed::from_path("fixtures/missing_stop_times").unwrap();
    match Schedule::try_from(raw) {
        Err(Error::MissingFile(name)) => assert_eq!("stop_times.txt", name),
        other => panic!("expected MissingFile, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn feed_path_must_be_a_directory() {
    match Schedule::from_path("fixtures/basic/stops.txt") {
        Err(Error::NotADirectory(path)) => assert!(path.ends_with("stops.txt")),
        other => panic!("expected NotADirectory, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn agency_file_is_optional() {
    let schedule = Schedule::from_path("fixtures/no_agency").expect("impossible to read feed");
    assert!(schedule.agencies.is_empty());
    assert_eq!(4, schedule.stops.len());
}

#[test]
fn calendar_weekly_pattern_and_range() {
    let schedule = basic();
    // MON runs mondays only, within 20240101-20241231
    assert!(schedule.service_runs_on("MON", monday()));
    assert!(!schedule.service_runs_on("MON", date(2023, 12, 31)));
    assert!(!schedule.service_runs_on("MON", date(2024, 6, 4)));
    // Both range ends are service days when the weekday matches
    assert!(schedule.service_runs_on("MON", date(2024, 1, 1)));
    assert!(schedule.service_runs_on("MON", date(2024, 12, 30)));
    assert!(!schedule.service_runs_on("MON", date(2025, 1, 6)));
    // An unknown service is inactive, not an error
    assert!(!schedule.service_runs_on("GHOST", monday()));
}

#[test]
fn malformed_calendar_dates_use_sentinels() {
    let schedule = basic();
    let bad = schedule.get_service("BAD").unwrap();
    assert_eq!(NaiveDate::MIN, bad.start_date);
    assert_eq!(NaiveDate::MAX, bad.end_date);
    // Which makes the service eligible on any date its weekday flags allow
    assert!(schedule.service_runs_on("BAD", date(1990, 1, 1)));
    assert!(schedule.service_runs_on("BAD", date(2090, 1, 1)));
}

#[test]
fn malformed_times_resolve_to_zero() {
    let schedule = basic();
    let first = schedule
        .stop_times
        .iter()
        .find(|st| st.trip_id == "T5" && st.stop_sequence == 1)
        .unwrap();
    assert_eq!(ServiceTime::ZERO, first.arrival_time);
    let second = schedule
        .stop_times
        .iter()
        .find(|st| st.trip_id == "T5" && st.stop_sequence == 2)
        .unwrap();
    assert_eq!(ServiceTime::ZERO, second.departure_time);
}

#[test]
fn find_connections_basic() {
    let schedule = basic();
    let connections = schedule.find_connections("A", "B", monday(), None);
    // T3 only runs weekends, T5 references an unknown service, T7 never
    // reaches B; T1 and T6 remain, ordered by departure time
    assert_eq!(2, connections.len());

    let first = &connections[0];
    assert_eq!("T1", first.trip_id);
    assert_eq!("R1", first.route_id);
    assert_eq!("101", first.route_short_name);
    assert_eq!(Some("Downtown Express".to_string()), first.route_long_name);
    assert_eq!("Main Street", first.from_stop_name);
    assert_eq!("Union Station", first.to_stop_name);
    assert_eq!(ServiceTime::from_hms(8, 0, 0), first.departure_time);
    assert_eq!(ServiceTime::from_hms(8, 30, 0), first.arrival_time);
    assert_eq!("00:30:00", first.duration.to_string());
    assert_eq!(Some("Union via Downtown".to_string()), first.trip_headsign);

    assert_eq!("T6", connections[1].trip_id);
    assert_eq!(ServiceTime::from_hms(10, 0, 0), connections[1].departure_time);
}

#[test]
fn destination_must_be_later_in_sequence() {
    let schedule = basic();
    // On T2 the stop order is B then A, so B->A connects...
    let forward = schedule.find_connections("B", "A", monday(), None);
    assert_eq!(1, forward.len());
    assert_eq!("T2", forward[0].trip_id);
    // ...and the trip contributes nothing in the A->B direction (T1 and T6
    // still do)
    let reverse = schedule.find_connections("A", "B", monday(), None);
    assert!(reverse.iter().all(|c| c.trip_id != "T2"));
}

#[test]
fn min_departure_filters_candidates() {
    let schedule = basic();
    // A departure exactly at the threshold is kept
    let at = schedule.find_connections("A", "B", monday(), Some(ServiceTime::from_hms(8, 0, 0)));
    assert_eq!(2, at.len());
    let after = schedule.find_connections("A", "B", monday(), Some(ServiceTime::from_hms(8, 0, 1)));
    assert_eq!(1, after.len());
    assert_eq!("T6", after[0].trip_id);
}

#[test]
fn past_midnight_connection() {
    let schedule = basic();
    let connections = schedule.find_connections("A", "B", saturday(), None);
    assert_eq!(1, connections.len());
    let c = &connections[0];
    assert_eq!("T3", c.trip_id);
    assert_eq!(ServiceTime::from_hms(25, 12, 0), c.departure_time);
    assert_eq!("25:12:00", c.departure_time.to_string());
    assert_eq!(ServiceTime::from_hms(25, 40, 0), c.arrival_time);
    assert_eq!("00:28:00", c.duration.to_string());
}

#[test]
fn revisited_stop_uses_first_match_in_load_order() {
    // A loop trip that serves B twice after A, stored with the seq=9 record
    // ahead of the seq=5 one. The stored-first record wins, not the one
    // with the smallest sequence gap.
    let mut schedule = Schedule {
        routes: to_map([Route {
            id: "R".to_string(),
            ..Route::default()
        }]),
        trips: to_map([Trip {
            id: "LOOP".to_string(),
            service_id: "ALWAYS".to_string(),
            route_id: "R".to_string(),
            ..Trip::default()
        }]),
        services: to_map([always_service("ALWAYS")]),
        ..Schedule::default()
    };
    schedule.stop_times = vec![
        stop_time("LOOP", "A", 1, "10:00:00", "10:00:00"),
        stop_time("LOOP", "B", 9, "11:00:00", "11:01:00"),
        stop_time("LOOP", "B", 5, "10:30:00", "10:31:00"),
    ];

    let connections = schedule.find_connections("A", "B", monday(), None);
    assert_eq!(1, connections.len());
    assert_eq!(ServiceTime::from_hms(11, 0, 0), connections[0].arrival_time);
    // Unknown stops fall back to their raw ids in the result
    assert_eq!("A", connections[0].from_stop_name);
    assert_eq!("B", connections[0].to_stop_name);
}

#[test]
fn list_departures_sorted_and_filtered() {
    let schedule = basic();
    let all = schedule.list_departures("A", monday(), None);
    let times: Vec<String> = all.iter().map(|d| d.departure_time.to_string()).collect();
    assert_eq!(vec!["07:59:00", "08:00:00", "09:21:00", "10:00:00"], times);

    // from_time excludes the 07:59 departure and keeps the 08:00 one
    let from = schedule.list_departures("A", monday(), Some(ServiceTime::from_hms(8, 0, 0)));
    assert_eq!(3, from.len());
    assert_eq!(ServiceTime::from_hms(8, 0, 0), from[0].departure_time);
    assert_eq!("Main Street", from[0].stop_name);
}

#[test]
fn departure_headsign_falls_back_to_stop_headsign() {
    let schedule = basic();
    let departures = schedule.list_departures("B", monday(), None);
    let t2 = departures.iter().find(|d| d.trip_id == "T2").unwrap();
    assert_eq!(Some("To Main".to_string()), t2.headsign);
    let t1 = departures.iter().find(|d| d.trip_id == "T1").unwrap();
    assert_eq!(Some("Union via Downtown".to_string()), t1.headsign);
}

#[test]
fn stop_search_is_case_insensitive_and_sorted() {
    let schedule = basic();
    let names: Vec<&str> = schedule
        .find_stops_by_name("main")
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(vec!["Main Street", "Main Street North"], names);
    assert_eq!(2, schedule.find_stops_by_name("MAIN").len());
    assert!(schedule.find_stops_by_name("zzz").is_empty());
}

#[test]
fn stop_search_caps_after_sorting() {
    let mut schedule = Schedule::default();
    // Insert in reverse so the cap can only be alphabetical, never "first
    // 20 seen"
    for n in (1..=25).rev() {
        let id = format!("S{:02}", n);
        schedule.stops.insert(
            id.clone(),
            Stop {
                id,
                name: format!("Stop {:02}", n),
                ..Stop::default()
            },
        );
    }
    let matches = schedule.find_stops_by_name("stop");
    assert_eq!(STOP_SEARCH_LIMIT, matches.len());
    assert_eq!("Stop 01", matches[0].name);
    assert_eq!("Stop 20", matches[19].name);
}

#[test]
fn all_routes_ordered_by_display_name() {
    let schedule = basic();
    let names: Vec<&str> = schedule.all_routes().iter().map(|r| r.display_name()).collect();
    assert_eq!(vec!["101", "Lakeshore"], names);
}

#[test]
fn all_routes_breaks_display_name_ties_by_id() {
    let mut schedule = Schedule::default();
    for id in ["RB", "RA", "RC"] {
        schedule.routes.insert(
            id.to_string(),
            Route {
                id: id.to_string(),
                short_name: "7".to_string(),
                ..Route::default()
            },
        );
    }
    let ids: Vec<&str> = schedule
        .all_routes()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(vec!["RA", "RB", "RC"], ids);
}

#[test]
fn route_display_name_fallbacks() {
    let mut route = Route {
        id: "R9".to_string(),
        ..Route::default()
    };
    assert_eq!("R9", route.display_name());
    route.long_name = "Crosstown".to_string();
    assert_eq!("Crosstown", route.display_name());
    route.short_name = "9".to_string();
    assert_eq!("9", route.display_name());
}

#[test]
fn results_serialize_for_the_protocol_layer() {
    let schedule = basic();
    let connections = schedule.find_connections("A", "B", monday(), None);
    let value: serde_json::Value = serde_json::to_value(&connections[0]).unwrap();
    assert_eq!("08:00:00", value["departure_time"]);
    assert_eq!("08:30:00", value["arrival_time"]);
    assert_eq!("00:30:00", value["duration"]);
    assert_eq!("101", value["route_short_name"]);

    let departures = schedule.list_departures("A", monday(), None);
    let value = serde_json::to_value(&departures[0]).unwrap();
    assert_eq!("07:59:00", value["departure_time"]);
}

#[test]
fn queries_fail_before_load_and_survive_reload() {
    let shared = SharedSchedule::new();
    assert!(!shared.is_loaded());
    assert!(matches!(shared.snapshot(), Err(Error::DataNotLoaded)));

    let old = shared.load("fixtures/basic").expect("impossible to load feed");
    assert!(shared.is_loaded());

    // A reload publishes a fresh snapshot; the old one stays consistent for
    // in-flight queries
    let new = shared.load("fixtures/basic").expect("impossible to load feed");
    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(1, old.find_connections("A", "B", saturday(), None).len());

    // A failed reload keeps the previous snapshot published
    assert!(shared.load("fixtures/missing_stop_times").is_err());
    let current = shared.snapshot().unwrap();
    assert!(Arc::ptr_eq(&current, &new));
}

fn to_map<O: Id>(elements: impl IntoIterator<Item = O>) -> FxHashMap<String, O> {
    elements
        .into_iter()
        .map(|e| (e.id().to_owned(), e))
        .collect()
}

fn always_service(id: &str) -> Calendar {
    Calendar {
        id: id.to_string(),
        monday: true,
        tuesday: true,
        wednesday: true,
        thursday: true,
        friday: true,
        saturday: true,
        sunday: true,
        start_date: NaiveDate::MIN,
        end_date: NaiveDate::MAX,
    }
}

fn stop_time(trip_id: &str, stop_id: &str, seq: u32, arrival: &str, departure: &str) -> StopTime {
    StopTime {
        trip_id: trip_id.to_string(),
        stop_id: stop_id.to_string(),
        stop_sequence: seq,
        arrival_time: parse_service_time(arrival),
        departure_time: parse_service_time(departure),
        ..StopTime::default()
    }
}
