//! Endpoints for moving accounts to the trash, restoring them and deleting them for good.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        AccountId,
        core::{delete_account_permanently, restore_account, soft_delete_account},
    },
    alert::Alert,
    auth::UserID,
    endpoints,
    timezone::local_today,
};

/// The state needed to delete or restore an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for moving an account to the trash, responds with an alert.
pub async fn delete_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<DeleteAccountState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match soft_delete_account(user_id, account_id, today, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Account moved to the trash".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for taking an account out of the trash, redirects to the accounts page.
pub async fn restore_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<DeleteAccountState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    restore_account(user_id, account_id, &connection)?;
    tracing::info!("Restored account {account_id}");

    Ok(Redirect::to(endpoints::ACCOUNTS).into_response())
}

/// A route handler for deleting an account and its transactions for good.
pub async fn delete_account_permanently_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<DeleteAccountState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account_permanently(user_id, account_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Account deleted permanently".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not permanently delete account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}
