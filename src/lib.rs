//! Cashbook is a web app for tracking personal finances.
//!
//! Users keep a set of accounts, record credit and debit transactions against
//! them, file those transactions under categories and get a dashboard that
//! summarises where the money went.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod i18n;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{AccountBalance, get_accounts_with_balances};
pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    get_user_by_id, update_password,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// Functions for seeding a database, used by the `create_test_db` binary.
pub mod seed {
    pub use crate::account::{AccountName, create_account};
    pub use crate::category::{CategoryName, NewCategory, create_category};
    pub use crate::transaction::{NewTransaction, TransactionType, create_transaction};
}

use crate::{
    alert::Alert, category::CategoryId, html::error_view,
    internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token in the cookie could not be read.
    #[error("could not parse the auth token: {0}")]
    InvalidToken(String),

    /// There was an error creating the new expiry date time for the auth cookie.
    #[error("could not compute the cookie expiry: {0}")]
    InvalidExpiry(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string used as an email address is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A user with the email address already exists.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An empty string was used as an account name.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// The user already has an account with the name.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// An empty string was used as a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID does not refer to one of the user's categories.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The chosen parent category is not one of the user's top-level categories,
    /// or the category would end up more than one level deep.
    #[error("categories can only be nested one level under a top-level category")]
    InvalidParentCategory,

    /// A transaction amount must be greater than zero, the direction of the
    /// money is given by the transaction type.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The date range given to the dashboard could not be parsed.
    #[error("could not parse the date range \"{0}\"")]
    InvalidDateRange(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A query referenced a row that does not exist.
    #[error("a foreign key constraint failed")]
    InvalidForeignKey,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidDateRange(dates) => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "Invalid Date Range",
                    &format!(
                        "Could not read the date range \"{dates}\". \
                        Use the form \"2024-January-01 - 2024-January-31\"."
                    ),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        let (status, message, details) = match &self {
            Error::EmptyAccountName | Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                "Missing name".to_owned(),
                self.to_string(),
            ),
            Error::DuplicateAccountName(name) => (
                StatusCode::BAD_REQUEST,
                "Duplicate Account Name".to_owned(),
                format!(
                    "The account {name} already exists. \
                    Choose a different account name, or edit or delete the existing account."
                ),
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                "Invalid category".to_owned(),
                format!("Could not find a category with the ID {category_id}"),
            ),
            Error::InvalidParentCategory => (
                StatusCode::BAD_REQUEST,
                "Invalid parent category".to_owned(),
                "Choose a top-level category as the parent. \
                Categories can only be nested one level deep."
                    .to_owned(),
            ),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                "Invalid amount".to_owned(),
                format!(
                    "{amount} is not a valid amount. Enter an amount greater than zero \
                    and pick credit or debit as the type."
                ),
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                "Invalid transaction date".to_owned(),
                format!(
                    "{date} is a date in the future, which is not allowed. \
                    Change the date to today or earlier."
                ),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings".to_owned(),
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found".to_owned(),
                "The requested item could not be found.".to_owned(),
            ),
            Error::UpdateMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not update account".to_owned(),
                "The account could not be found.".to_owned(),
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                "Could not delete account".to_owned(),
                "The account could not be found. \
                Try refreshing the page to see if the account has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                "Could not update category".to_owned(),
                "The category could not be found.".to_owned(),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_owned(),
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Alert::Error { message, details }).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn query_returned_no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_date_range_renders_400_page() {
        let response = Error::InvalidDateRange("foo".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_errors_render_bad_request_alerts() {
        for error in [
            Error::EmptyAccountName,
            Error::DuplicateAccountName("Wallet".to_owned()),
            Error::InvalidCategory(3),
            Error::InvalidParentCategory,
            Error::NonPositiveAmount(0.0),
        ] {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unexpected_errors_render_internal_server_error_alerts() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
