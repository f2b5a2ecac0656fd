use crate::feed_reader::FeedReader;
use crate::objects::*;
use crate::Error;
use log::info;
use std::path::Path;

/// Data structure that maps the feed files with little intelligence
///
/// One slot per file, in the order the files are ingested. Each required
/// file carries its own parse result so a missing or unreadable file only
/// surfaces once a [crate::Schedule] is built from it. To query the
/// timetable, [crate::Schedule] is what you want.
#[derive(Debug)]
pub struct RawFeed {
    /// All Agencies, None if the file was absent as it is not mandatory
    pub agencies: Option<Result<Vec<Agency>, Error>>,
    /// All Stops
    pub stops: Result<Vec<Stop>, Error>,
    /// All Routes
    pub routes: Result<Vec<Route>, Error>,
    /// All Trips
    pub trips: Result<Vec<Trip>, Error>,
    /// All StopTimes, in file order
    pub stop_times: Result<Vec<StopTime>, Error>,
    /// All Calendar entries
    pub calendar: Result<Vec<Calendar>, Error>,
}

impl RawFeed {
    /// Reads the raw feed from a directory of delimited text files
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path> + std::fmt::Display,
    {
        FeedReader::default().read_from_path(path)
    }

    /// Logs some basic statistics about the feed files (number of records
    /// for each file). Mostly to be sure that everything was read
    pub fn log_stats(&self) {
        info!("raw feed:");
        info!("  stops: {}", mandatory_file_summary(&self.stops));
        info!("  routes: {}", mandatory_file_summary(&self.routes));
        info!("  trips: {}", mandatory_file_summary(&self.trips));
        info!("  stop times: {}", mandatory_file_summary(&self.stop_times));
        info!("  calendar: {}", mandatory_file_summary(&self.calendar));
        info!("  agencies: {}", optional_file_summary(&self.agencies));
    }
}

fn mandatory_file_summary<T>(objs: &Result<Vec<T>, Error>) -> String {
    match objs {
        Ok(vec) => format!("{} objects", vec.len()),
        Err(e) => format!("could not read: {}", e),
    }
}

fn optional_file_summary<T>(objs: &Option<Result<Vec<T>, Error>>) -> String {
    match objs {
        Some(objs) => mandatory_file_summary(objs),
        None => "file not present".to_string(),
    }
}
