/*! In-memory index and query engine for static public-transit schedule feeds.

A feed is a directory of up to six delimited text files (agencies, stops,
routes, trips, stop times, service calendars) following the
[GTFS](https://gtfs.org/) static model. This crate reads such a directory,
freezes it into an immutable [Schedule] and answers point queries over it:

- direct, same-trip connections between two stops on a date ([Schedule::find_connections])
- scheduled departures from a stop on a date ([Schedule::list_departures])
- stop search by name fragment ([Schedule::find_stops_by_name])
- the full route listing ([Schedule::all_routes])

## Design decisions

### Two representations

[RawFeed] holds one parse result per file, as close as possible to the CSV.
[Schedule] indexes the records by identifier and is the structure queries
run against. Duplicate identifiers overwrite the earlier record, a
deliberate simplification of feed handling, not a bug.

### Schedule times

Times are elapsed time since midnight of the service day and the hour may
exceed 23 for trips continuing past midnight; see [ServiceTime]. Malformed
times resolve to zero elapsed time and malformed calendar dates resolve to
the minimal or maximal representable date, so per-record oddities never
fail a load. Only a missing mandatory file does.

### Load then freeze

A [Schedule] never mutates once built. [SharedSchedule] is the one safe
reload path: build a new store, swap the shared reference atomically. It
also guards queries issued before the first load with [Error::DataNotLoaded].

This crate computes no multi-leg itineraries and applies no calendar
exception overrides: service activity is governed solely by the weekly
pattern and date range.
*/
#![warn(missing_docs)]

pub mod error;
mod feed_reader;
mod objects;
mod queries;
mod raw_feed;
mod schedule;
pub(crate) mod serde_helpers;
mod shared;
mod time;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use feed_reader::FeedReader;
pub use objects::*;
pub use queries::{Connection, Departure, STOP_SEARCH_LIMIT};
pub use raw_feed::RawFeed;
pub use schedule::Schedule;
pub use shared::SharedSchedule;
pub use time::{parse_service_time, ServiceTime};
