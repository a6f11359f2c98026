//! Account editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        AccountId, AccountName,
        core::{get_active_account, update_account},
        form::{AccountFormData, AccountFormTarget, account_form},
    },
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    i18n::Language,
    navigation::NavBar,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing one of the user's active accounts.
pub async fn get_edit_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_active_account(user_id, account_id, &connection)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::ACCOUNT, account_id);
    let nav_bar = NavBar::new(&edit_endpoint, language).into_html();
    let form = account_form(
        AccountFormTarget::Update(&update_endpoint),
        account.name.as_ref(),
        &account.description,
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("Edit Account", &[], &content).into_response())
}

/// Handle account update form submission, redirects to the account page on success.
pub async fn update_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<AccountFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::ACCOUNT, account_id);

    let name = match AccountName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return account_form(
                AccountFormTarget::Update(&update_endpoint),
                &form_data.name,
                &form_data.description,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_account(
        user_id,
        account_id,
        &name,
        form_data.description.trim(),
        &connection,
    ) {
        Ok(()) => (HxRedirect(update_endpoint), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}
