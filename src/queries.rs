//! Query operations over a frozen [Schedule].
//!
//! All queries are sequential scans over the flat stop-time sequence; no
//! secondary index exists, which keeps the "first match in load order"
//! tie-break trivially true.
use crate::objects::{Route, Stop, StopTime};
use crate::schedule::Schedule;
use crate::time::ServiceTime;
use chrono::NaiveDate;
use serde::Serialize;

/// Name searches return at most this many stops, the alphabetically
/// earliest ones. The cap applies after sorting.
pub const STOP_SEARCH_LIMIT: usize = 20;

/// A direct, same-trip ride between two stops
///
/// These are plain data records handed back to the calling layer; the crate
/// has no outbound wire format of its own.
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    /// Trip the ride uses
    pub trip_id: String,
    /// Route that trip belongs to
    pub route_id: String,
    /// Display name of the route: short name, else long name, else route id
    pub route_short_name: String,
    /// Long name of the route, when the feed carries one
    pub route_long_name: Option<String>,
    /// Identifier of the departure stop
    pub from_stop_id: String,
    /// Identifier of the arrival stop
    pub to_stop_id: String,
    /// Name of the departure stop, or the raw id if the stop is unknown
    pub from_stop_name: String,
    /// Name of the arrival stop, or the raw id if the stop is unknown
    pub to_stop_name: String,
    /// Departure time at the departure stop
    pub departure_time: ServiceTime,
    /// Arrival time at the arrival stop
    pub arrival_time: ServiceTime,
    /// Arrival minus departure. Negative only when the feed itself is
    /// inconsistent; the raw difference is returned either way
    pub duration: ServiceTime,
    /// The trip headsign if present
    pub trip_headsign: Option<String>,
}

/// One scheduled departure from a stop
#[derive(Debug, Clone, Serialize)]
pub struct Departure {
    /// Trip that departs
    pub trip_id: String,
    /// Route that trip belongs to
    pub route_id: String,
    /// Display name of the route: short name, else long name, else route id
    pub route_short_name: String,
    /// Departure time at the stop
    pub departure_time: ServiceTime,
    /// Trip headsign, else the stop time's own headsign, else absent
    pub headsign: Option<String>,
    /// Identifier of the stop
    pub stop_id: String,
    /// Name of the stop, or the raw id if the stop is unknown
    pub stop_name: String,
}

impl Schedule {
    /// Finds direct connections from one stop to another on a calendar date
    ///
    /// Candidate departures are scanned in order of their arrival time at
    /// the departure stop; the returned list is re-sorted ascending by
    /// departure time. A candidate whose trip, service or route does not
    /// resolve is silently dropped. With `min_departure` set, candidates
    /// departing earlier are skipped.
    pub fn find_connections(
        &self,
        from_stop_id: &str,
        to_stop_id: &str,
        date: NaiveDate,
        min_departure: Option<ServiceTime>,
    ) -> Vec<Connection> {
        let mut candidates: Vec<&StopTime> = self
            .stop_times
            .iter()
            .filter(|st| st.stop_id == from_stop_id)
            .collect();
        candidates.sort_by_key(|st| st.arrival_time);

        let mut connections = Vec::new();
        for departure in candidates {
            if let Some(min) = min_departure {
                if departure.departure_time < min {
                    continue;
                }
            }

            let trip = match self.get_trip(&departure.trip_id) {
                Some(trip) => trip,
                None => continue,
            };
            if !self.service_runs_on(&trip.service_id, date) {
                continue;
            }

            // First match in load order wins, not the smallest sequence gap:
            // a trip revisiting the destination later uses the record stored
            // earliest.
            let arrival = self.stop_times.iter().find(|st| {
                st.trip_id == departure.trip_id
                    && st.stop_id == to_stop_id
                    && st.stop_sequence > departure.stop_sequence
            });
            let arrival = match arrival {
                Some(arrival) => arrival,
                None => continue,
            };
            let route = match self.get_route(&trip.route_id) {
                Some(route) => route,
                None => continue,
            };

            connections.push(Connection {
                trip_id: trip.id.clone(),
                route_id: route.id.clone(),
                route_short_name: route.display_name().to_string(),
                route_long_name: route.long_name().map(String::from),
                from_stop_id: from_stop_id.to_string(),
                to_stop_id: to_stop_id.to_string(),
                from_stop_name: self.stop_name_or_id(from_stop_id),
                to_stop_name: self.stop_name_or_id(to_stop_id),
                departure_time: departure.departure_time,
                arrival_time: arrival.arrival_time,
                duration: arrival.arrival_time - departure.departure_time,
                trip_headsign: trip.trip_headsign.clone(),
            });
        }

        connections.sort_by_key(|c| c.departure_time);
        connections
    }

    /// Lists scheduled departures from a stop on a calendar date, ascending
    /// by departure time
    ///
    /// The full matching list is returned; capping the display is the
    /// caller's concern. With `from_time` set, earlier departures are
    /// skipped (a departure exactly at `from_time` is kept).
    pub fn list_departures(
        &self,
        stop_id: &str,
        date: NaiveDate,
        from_time: Option<ServiceTime>,
    ) -> Vec<Departure> {
        let mut departures = Vec::new();
        for stop_time in self.stop_times.iter().filter(|st| st.stop_id == stop_id) {
            if let Some(min) = from_time {
                if stop_time.departure_time < min {
                    continue;
                }
            }

            let trip = match self.get_trip(&stop_time.trip_id) {
                Some(trip) => trip,
                None => continue,
            };
            if !self.service_runs_on(&trip.service_id, date) {
                continue;
            }
            let route = match self.get_route(&trip.route_id) {
                Some(route) => route,
                None => continue,
            };

            departures.push(Departure {
                trip_id: trip.id.clone(),
                route_id: route.id.clone(),
                route_short_name: route.display_name().to_string(),
                departure_time: stop_time.departure_time,
                headsign: trip
                    .trip_headsign
                    .clone()
                    .or_else(|| stop_time.stop_headsign.clone()),
                stop_id: stop_id.to_string(),
                stop_name: self.stop_name_or_id(stop_id),
            });
        }

        departures.sort_by_key(|d| d.departure_time);
        departures
    }

    /// Finds stops whose name contains `term`, ASCII case-insensitively
    ///
    /// Returns the [STOP_SEARCH_LIMIT] alphabetically earliest matches, ties
    /// broken by stop id so the order is deterministic.
    pub fn find_stops_by_name(&self, term: &str) -> Vec<&Stop> {
        let needle = term.to_ascii_lowercase();
        let mut matches: Vec<&Stop> = self
            .stops
            .values()
            .filter(|stop| stop.name.to_ascii_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(STOP_SEARCH_LIMIT);
        matches
    }

    /// All routes, ordered ascending by display name with the route id as
    /// tie-break
    pub fn all_routes(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.values().collect();
        routes.sort_by(|a, b| {
            a.display_name()
                .cmp(b.display_name())
                .then_with(|| a.id.cmp(&b.id))
        });
        routes
    }

    fn stop_name_or_id(&self, stop_id: &str) -> String {
        self.get_stop(stop_id)
            .map(|stop| stop.name.clone())
            .unwrap_or_else(|| stop_id.to_string())
    }
}
