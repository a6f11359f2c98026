//! Password strength checks and bcrypt hashes for cashbook log-ins.
//!
//! New passwords are scored with zxcvbn. The user's e-mail address is fed to
//! the scorer as well, so a password made from the address counts as weak.

use std::fmt;

use bcrypt::{hash, verify};
use email_address::EmailAddress;
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The lowest zxcvbn score accepted for a new password.
pub const MIN_PASSWORD_SCORE: Score = Score::Three;

/// A password that passed the strength check and is ready to be hashed.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check `raw_password` for the user registered as `email`.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's advice when the score is below
    /// [MIN_PASSWORD_SCORE].
    pub fn new(raw_password: &str, email: &EmailAddress) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[email.as_str(), email.local_part()]);

        if entropy.score() >= MIN_PASSWORD_SCORE {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(|feedback| feedback.to_string())
            .filter(|advice| !advice.trim().is_empty())
            .unwrap_or_else(|| "add more words or characters.".to_owned());

        Err(Error::TooWeak(advice.trim().to_owned()))
    }

    /// Skip the strength check, e.g. for seeded test users.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// A salted bcrypt hash, as stored in the `password` column of the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's recommended cost. Tests use a lower cost to stay fast.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost or fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
