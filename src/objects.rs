use crate::serde_helpers::*;
use crate::time::ServiceTime;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Objects that have an identifier implement this trait
///
/// Those identifiers are technical and should not be shown to travellers
pub trait Id {
    /// Identifier of the object
    fn id(&self) -> &str;
}

/// A calendar describes on which days a service runs. See <https://gtfs.org/reference/static/#calendartxt>
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Calendar {
    /// Unique technical identifier (not for the traveller) of this calendar
    #[serde(rename = "service_id")]
    pub id: String,
    /// Does the service run on mondays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub monday: bool,
    /// Does the service run on tuesdays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub tuesday: bool,
    /// Does the service run on wednesdays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub wednesday: bool,
    /// Does the service run on thursdays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub thursday: bool,
    /// Does the service run on fridays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub friday: bool,
    /// Does the service run on saturdays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub saturday: bool,
    /// Does the service run on sundays
    #[serde(
        deserialize_with = "deserialize_bool",
        serialize_with = "serialize_bool"
    )]
    pub sunday: bool,
    /// First service day of the interval. An unparsable date becomes the
    /// earliest representable date instead of a load failure
    #[serde(
        deserialize_with = "deserialize_start_date",
        serialize_with = "serialize_date"
    )]
    pub start_date: NaiveDate,
    /// Last service day of the interval, included. An unparsable date becomes
    /// the latest representable date
    #[serde(
        deserialize_with = "deserialize_end_date",
        serialize_with = "serialize_date"
    )]
    pub end_date: NaiveDate,
}

impl Id for Calendar {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}—{}", self.start_date, self.end_date)
    }
}

impl Calendar {
    /// Returns true if the weekly pattern has a service on that weekday
    pub fn valid_weekday(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Returns true if the service operates on `date`: the date range is
    /// inclusive on both ends and the weekday flag must be set
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date && self.valid_weekday(date)
    }
}

/// A physical stop or station. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Stop {
    /// Unique technical identifier (not for the traveller) of the stop
    #[serde(rename = "stop_id")]
    pub id: String,
    /// Short text or a number that identifies the location for riders
    #[serde(rename = "stop_code")]
    pub code: Option<String>,
    /// Name of the location, used for the name search
    #[serde(rename = "stop_name", default)]
    pub name: String,
    /// Description of the location that provides useful, quality information
    #[serde(default, rename = "stop_desc")]
    pub description: String,
    /// Type of the location
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub location_type: u8,
    /// Defines hierarchy between the different locations
    pub parent_station: Option<String>,
    /// Identifies the fare zone for a stop
    pub zone_id: Option<String>,
    /// URL of a web page about the location
    #[serde(rename = "stop_url")]
    pub url: Option<String>,
    /// Longitude of the stop
    #[serde(
        deserialize_with = "de_with_optional_float",
        serialize_with = "serialize_float_as_str",
        rename = "stop_lon",
        default
    )]
    pub longitude: Option<f64>,
    /// Latitude of the stop
    #[serde(
        deserialize_with = "de_with_optional_float",
        serialize_with = "serialize_float_as_str",
        rename = "stop_lat",
        default
    )]
    pub latitude: Option<f64>,
    /// Timezone of the location
    #[serde(rename = "stop_timezone")]
    pub timezone: Option<String>,
    /// Indicates whether wheelchair boardings are possible from the location
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub wheelchair_boarding: u8,
}

impl Id for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A route is a commercial line. See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Route {
    /// Unique technical (not for the traveller) identifier for the route
    #[serde(rename = "route_id")]
    pub id: String,
    /// Short name of a route, like "32" or "Green". Empty when the feed does
    /// not provide one
    #[serde(rename = "route_short_name", default)]
    pub short_name: String,
    /// Full name of a route, generally more descriptive than the short name.
    /// Empty when the feed does not provide one
    #[serde(rename = "route_long_name", default)]
    pub long_name: String,
    /// Description of a route that provides useful, quality information
    #[serde(rename = "route_desc")]
    pub desc: Option<String>,
    /// Indicates the type of transportation used on a route
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub route_type: u16,
    /// URL of a web page about the particular route
    #[serde(rename = "route_url")]
    pub url: Option<String>,
    /// Agency for the specified route
    pub agency_id: Option<String>,
    /// Orders the routes in a way which is ideal for presentation to customers
    #[serde(rename = "route_sort_order")]
    pub order: Option<u32>,
    /// Route color designation that matches public facing material
    #[serde(rename = "route_color")]
    pub color: Option<String>,
    /// Legible color to use for text drawn against the route color
    #[serde(rename = "route_text_color")]
    pub text_color: Option<String>,
}

impl Route {
    /// The name shown to riders: short name, else long name, else the raw
    /// route identifier
    pub fn display_name(&self) -> &str {
        if !self.short_name.is_empty() {
            &self.short_name
        } else if !self.long_name.is_empty() {
            &self.long_name
        } else {
            &self.id
        }
    }

    /// The long name if the feed carries one
    pub fn long_name(&self) -> Option<&str> {
        if self.long_name.is_empty() {
            None
        } else {
            Some(&self.long_name)
        }
    }
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A trip is one run of a vehicle along a route on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Trip {
    /// Unique technical (not for the traveller) identifier for the trip
    #[serde(rename = "trip_id")]
    pub id: String,
    /// References the [Calendar] on which this trip runs
    pub service_id: String,
    /// References along which [Route] this trip runs
    pub route_id: String,
    /// Text that appears on signage identifying the trip's destination to riders
    pub trip_headsign: Option<String>,
    /// Public facing text used to identify the trip to riders, for instance
    /// train numbers for commuter rail trips
    pub trip_short_name: Option<String>,
    /// Direction of travel, used to separate trips by direction in timetables
    pub direction_id: Option<u8>,
    /// Identifies the block of sequential trips made with the same vehicle
    pub block_id: Option<String>,
    /// Shape of the trip
    pub shape_id: Option<String>,
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "route id: {}, service id: {}",
            self.route_id, self.service_id
        )
    }
}

/// The moment where a vehicle, running a [Trip], serves a [Stop]. See <https://gtfs.org/reference/static/#stop_timestxt>
///
/// Stop times are kept as a flat sequence in feed order, not grouped by
/// trip; the `trip_id` + `stop_sequence` pair identifies a record.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct StopTime {
    /// [Trip] to which this stop time belongs
    pub trip_id: String,
    /// Arrival time at the stop. Missing or malformed values resolve to zero
    /// elapsed time
    #[serde(default, deserialize_with = "deserialize_service_time")]
    pub arrival_time: ServiceTime,
    /// Departure time from the stop. Missing or malformed values resolve to
    /// zero elapsed time
    #[serde(default, deserialize_with = "deserialize_service_time")]
    pub departure_time: ServiceTime,
    /// Identifier of the [Stop] where the vehicle stops
    pub stop_id: String,
    /// Order of stops for a particular trip. The values must increase along
    /// the trip but do not need to be consecutive
    pub stop_sequence: u32,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: Option<String>,
    /// Indicates pickup method
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub pickup_type: u8,
    /// Indicates drop off method
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub drop_off_type: u8,
    /// Actual distance traveled along the shape from the first stop
    #[serde(
        default,
        deserialize_with = "de_with_optional_float",
        serialize_with = "serialize_float_as_str"
    )]
    pub shape_dist_traveled: Option<f64>,
}

/// General information about the agency running the network. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Agency {
    /// Unique technical (not for the traveller) identifier for the agency
    #[serde(rename = "agency_id")]
    pub id: Option<String>,
    /// Full name of the transit agency
    #[serde(rename = "agency_name")]
    pub name: String,
    /// URL of the transit agency
    #[serde(rename = "agency_url")]
    pub url: String,
    /// Timezone where the transit agency is located
    #[serde(rename = "agency_timezone")]
    pub timezone: String,
    /// Primary language used by this transit agency
    #[serde(rename = "agency_lang")]
    pub lang: Option<String>,
    /// A voice telephone number for the specified agency
    #[serde(rename = "agency_phone")]
    pub phone: Option<String>,
    /// URL of a web page where a rider can purchase tickets online
    #[serde(rename = "agency_fare_url")]
    pub fare_url: Option<String>,
    /// Email address actively monitored by the agency's customer service
    #[serde(rename = "agency_email")]
    pub email: Option<String>,
}

impl Id for Agency {
    fn id(&self) -> &str {
        match &self.id {
            None => "",
            Some(id) => id,
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
