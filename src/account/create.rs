//! Account creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        AccountName, create_account,
        form::{AccountFormData, AccountFormTarget, account_form},
    },
    auth::UserID,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    i18n::Language,
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating an account.
pub async fn get_new_account_page(language: Language) -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW, language).into_html();
    let form = account_form(AccountFormTarget::Create(endpoints::ACCOUNTS), "", "", "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Account", &[], &content).into_response()
}

/// Handle account creation form submission, redirects to the accounts page on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<AccountFormData>,
) -> Response {
    let name = match AccountName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => return form_with_error(&form_data, &error).into_response(),
    };

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

    match create_account(
        user_id,
        name,
        form_data.description.trim(),
        today,
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create account: {error}");
            error.into_alert_response()
        }
    }
}

fn form_with_error(form_data: &AccountFormData, error: &Error) -> Markup {
    account_form(
        AccountFormTarget::Create(endpoints::ACCOUNTS),
        &form_data.name,
        &form_data.description,
        &format!("Error: {error}"),
    )
}
