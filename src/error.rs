//! Module for the error management
use thiserror::Error;

/// Specific line from a CSV file that could not be read
#[derive(Debug)]
pub struct LineError {
    /// Headers of the CSV file
    pub headers: Vec<String>,
    /// Values of the line that could not be parsed
    pub values: Vec<String>,
}

/// An error that can occur when loading or querying a timetable.
///
/// Only structural load failures are fatal. Per-record oddities (unknown
/// references, malformed dates or times) degrade to empty results or
/// sentinel values and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory file is not present in the feed directory
    #[error("could not find file {0}")]
    MissingFile(String),
    /// A query was issued before a schedule was successfully loaded
    #[error("schedule data is not loaded")]
    DataNotLoaded,
    /// The given path to the feed is not a directory
    #[error("could not read feed: {0} is not a directory")]
    NotADirectory(String),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIo {
        /// The file name that could not be read
        file_name: String,
        /// The initial error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    Csv {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
        /// The line that could not be parsed by the csv library
        line_in_error: Option<LineError>,
    },
}
