//! Implements a struct that holds the state of the REST server.

use crate::{Error, db::Database, timezone::get_local_offset};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database that expenses are stored in.
    pub db: Database,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to work out what "today" is when a page needs a default date.
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(db: Database, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            db,
            local_timezone: local_timezone.to_owned(),
        })
    }
}
