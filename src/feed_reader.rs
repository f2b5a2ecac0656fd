use crate::raw_feed::RawFeed;
use crate::Error;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Allows to parameterize how the feed files are read
///
/// ```no_run
/// let feed = transit_timetable::FeedReader::default()
///     .trim_fields(false) // high quality data does not need trimming
///     .read_from_path("fixtures/basic")?;
/// # Ok::<(), transit_timetable::Error>(())
/// ```
pub struct FeedReader {
    /// Avoid trimming the fields
    ///
    /// It is quite time consuming. If performance is an issue, and if your
    /// data is high quality, you can switch it off
    pub trim_fields: bool,
}

impl Default for FeedReader {
    fn default() -> Self {
        FeedReader { trim_fields: true }
    }
}

impl FeedReader {
    /// Should the fields be trimmed (default: true)
    pub fn trim_fields(mut self, trim_fields: bool) -> Self {
        self.trim_fields = trim_fields;
        self
    }

    /// Reads a feed from a directory of delimited text files
    ///
    /// The five mandatory files yield an [Error::MissingFile] in their slot
    /// when absent; `agency.txt` is optional and absence is simply [None].
    pub fn read_from_path<P>(&self, path: P) -> Result<RawFeed, Error>
    where
        P: AsRef<Path> + std::fmt::Display,
    {
        let p = path.as_ref();
        if !p.is_dir() {
            return Err(Error::NotADirectory(format!("{}", p.display())));
        }

        Ok(RawFeed {
            agencies: self.read_objs_from_optional_path(p, "agency.txt"),
            stops: self.read_objs_from_path(p.join("stops.txt")),
            routes: self.read_objs_from_path(p.join("routes.txt")),
            trips: self.read_objs_from_path(p.join("trips.txt")),
            stop_times: self.read_objs_from_path(p.join("stop_times.txt")),
            calendar: self.read_objs_from_path(p.join("calendar.txt")),
        })
    }

    fn read_objs<T, O>(&self, mut reader: T, file_name: &str) -> Result<Vec<O>, Error>
    where
        for<'de> O: Deserialize<'de>,
        T: std::io::Read,
    {
        let mut bom = [0; 3];
        reader
            .read_exact(&mut bom)
            .map_err(|e| Error::NamedFileIo {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?;

        let chained = if bom != [0xefu8, 0xbbu8, 0xbfu8] {
            bom.chain(reader)
        } else {
            [].chain(reader)
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(if self.trim_fields {
                csv::Trim::Fields
            } else {
                csv::Trim::None
            })
            .from_reader(chained);
        // We store the headers to be able to return them in case of errors
        let headers = reader
            .headers()
            .map_err(|e| Error::Csv {
                file_name: file_name.to_owned(),
                source: e,
                line_in_error: None,
            })?
            .clone();

        // Pre-allocate a StringRecord for performance reasons
        let mut rec = csv::StringRecord::new();
        let mut objs = Vec::new();

        // Read each record into the pre-allocated StringRecord one at a time
        while reader.read_record(&mut rec).map_err(|e| Error::Csv {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: None,
        })? {
            let obj = rec.deserialize(Some(&headers)).map_err(|e| Error::Csv {
                file_name: file_name.to_owned(),
                source: e,
                line_in_error: Some(crate::error::LineError {
                    headers: headers.into_iter().map(String::from).collect(),
                    values: rec.into_iter().map(String::from).collect(),
                }),
            })?;
            objs.push(obj);
        }
        Ok(objs)
    }

    fn read_objs_from_path<O>(&self, path: std::path::PathBuf) -> Result<Vec<O>, Error>
    where
        for<'de> O: Deserialize<'de>,
    {
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("invalid_file_name")
            .to_string();
        if path.exists() {
            File::open(path)
                .map_err(|e| Error::NamedFileIo {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                })
                .and_then(|r| self.read_objs(r, &file_name))
        } else {
            Err(Error::MissingFile(file_name))
        }
    }

    fn read_objs_from_optional_path<O>(
        &self,
        dir_path: &Path,
        file_name: &str,
    ) -> Option<Result<Vec<O>, Error>>
    where
        for<'de> O: Deserialize<'de>,
    {
        File::open(dir_path.join(file_name))
            .ok()
            .map(|r| self.read_objs(r, file_name))
    }
}
