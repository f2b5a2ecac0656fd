use crate::objects::*;
use crate::raw_feed::RawFeed;
use crate::Error;
use chrono::NaiveDate;
use log::info;
use rustc_hash::FxHashMap;
use std::convert::TryFrom;
use std::path::Path;

/// The frozen, queryable timetable built from a [RawFeed]
///
/// The store is built exactly once from the six feed files and is immutable
/// afterwards: concurrent queries are pure reads and need no locking. To
/// replace the data, build a new [Schedule] and swap it in through
/// [crate::SharedSchedule].
///
/// ```no_run
/// let schedule = transit_timetable::Schedule::from_path("fixtures/basic")?;
/// assert!(schedule.get_stop("stop1").is_some());
/// # Ok::<(), transit_timetable::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Schedule {
    /// All agencies by `agency_id`; a record without one is keyed "default"
    pub agencies: FxHashMap<String, Agency>,
    /// All stops by `stop_id`
    pub stops: FxHashMap<String, Stop>,
    /// All routes by `route_id`
    pub routes: FxHashMap<String, Route>,
    /// All trips by `trip_id`
    pub trips: FxHashMap<String, Trip>,
    /// All stop times, kept flat and in feed order. Queries scan this
    /// sequence, so "first match" always means first in load order
    pub stop_times: Vec<StopTime>,
    /// All service calendars by `service_id`
    pub services: FxHashMap<String, Calendar>,
}

impl TryFrom<RawFeed> for Schedule {
    type Error = Error;

    /// Tries to build a [Schedule] from a [RawFeed]
    ///
    /// Fails if any of the five mandatory files could not be read; a missing
    /// `agency.txt` just leaves the agency index empty. Duplicate identifiers
    /// within a file overwrite the earlier record (last write wins).
    fn try_from(raw: RawFeed) -> Result<Schedule, Error> {
        Ok(Schedule {
            agencies: to_agency_map(raw.agencies.unwrap_or_else(|| Ok(Vec::new()))?),
            stops: to_map(raw.stops?),
            routes: to_map(raw.routes?),
            trips: to_map(raw.trips?),
            stop_times: raw.stop_times?,
            services: to_map(raw.calendar?),
        })
    }
}

impl Schedule {
    /// Reads and indexes a feed from a directory of delimited text files
    pub fn from_path<P>(path: P) -> Result<Schedule, Error>
    where
        P: AsRef<Path> + std::fmt::Display,
    {
        info!("loading feed from {path}");
        let raw = RawFeed::from_path(path)?;
        raw.log_stats();
        let schedule = Schedule::try_from(raw)?;
        info!(
            "feed indexed: {} stops, {} routes, {} trips, {} stop times, {} services",
            schedule.stops.len(),
            schedule.routes.len(),
            schedule.trips.len(),
            schedule.stop_times.len(),
            schedule.services.len(),
        );
        Ok(schedule)
    }

    /// Gets a [Stop] by its `stop_id`
    pub fn get_stop(&self, id: &str) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Gets a [Route] by its `route_id`
    pub fn get_route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Gets a [Trip] by its `trip_id`
    pub fn get_trip(&self, id: &str) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Gets a service [Calendar] by its `service_id`
    pub fn get_service(&self, id: &str) -> Option<&Calendar> {
        self.services.get(id)
    }

    /// Gets an [Agency] by its `agency_id` ("default" for the anonymous one)
    pub fn get_agency(&self, id: &str) -> Option<&Agency> {
        self.agencies.get(id)
    }

    /// Decides whether `service_id` operates on `date`
    ///
    /// An unknown service is simply inactive, never an error; trips that
    /// reference it drop out of all query results.
    pub fn service_runs_on(&self, service_id: &str, date: NaiveDate) -> bool {
        self.services
            .get(service_id)
            .map(|service| service.runs_on(date))
            .unwrap_or(false)
    }
}

// Collecting into the map makes the last record win on duplicate ids.
fn to_map<O: Id>(elements: impl IntoIterator<Item = O>) -> FxHashMap<String, O> {
    elements
        .into_iter()
        .map(|e| (e.id().to_owned(), e))
        .collect()
}

fn to_agency_map(agencies: Vec<Agency>) -> FxHashMap<String, Agency> {
    agencies
        .into_iter()
        .map(|a| {
            let id = a.id.clone().unwrap_or_else(|| "default".to_string());
            (id, a)
        })
        .collect()
}
