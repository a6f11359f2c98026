//! The session token kept in the encrypted auth cookie.

use std::cmp::max;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID};

// Hours are always two digits, so a midnight expiry parses back.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]"
);

/// Who is logged in and until when, in the user's local offset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub user_id: UserID,
    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    pub fn new(user_id: UserID, expires_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            expires_at,
        }
    }

    /// The JSON text stored as the cookie value.
    ///
    /// # Errors
    ///
    /// Returns [Error::JSONSerializationError] if the expiry cannot be formatted.
    pub fn encode(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|error| Error::JSONSerializationError(error.to_string()))
    }

    /// Read a token back from a cookie value.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidToken] if `value` is not an encoded token.
    pub fn decode(value: &str) -> Result<Self, Error> {
        serde_json::from_str(value).map_err(|error| Error::InvalidToken(error.to_string()))
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Push the expiry out to `expires_at`. An expiry that is already later is kept.
    pub fn extended_to(self, expires_at: OffsetDateTime) -> Self {
        Self {
            expires_at: max(self.expires_at, expires_at),
            ..self
        }
    }
}
