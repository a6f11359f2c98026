//! The page and endpoint for adding a transaction to an account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since it rejects malformed bodies with a 400 instead of a 422.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_active_account},
    auth::UserID,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    i18n::{Language, Text},
    navigation::NavBar,
    timezone::local_today,
    transaction::{NewTransaction, TransactionForm, TransactionType, create_transaction},
};

/// The state needed to add a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for adding a transaction to an active account.
pub async fn get_create_transaction_page(
    Path(account_id): Path<AccountId>,
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let (account, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let account = get_active_account(user_id, account_id, &connection)?;
        let categories = get_all_categories(user_id, &connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new transaction page: {error}")
        })?;

        (account, categories)
    };

    let max_date = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    Ok(create_transaction_view(&account, max_date, &categories, language).into_response())
}

/// A route handler for adding a transaction, redirects to the account page on success.
pub async fn create_transaction_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    if form.date > today {
        tracing::warn!("Rejected transaction dated {} which is after {today}", form.date);
        return Error::FutureDate(form.date).into_alert_response();
    }

    let transaction = NewTransaction {
        account_id,
        category_id: form.category_id,
        amount: form.amount,
        date: form.date,
        transaction_type: form.transaction_type,
        description: form.description.trim().to_owned(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(user_id, transaction, &connection) {
        tracing::error!("could not create transaction for account {account_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::format_endpoint(endpoints::ACCOUNT, account_id)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Order categories for a select input: each top-level category followed by its children.
fn category_options(categories: &[Category]) -> Vec<(&Category, bool)> {
    let mut options = Vec::with_capacity(categories.len());

    for parent in categories.iter().filter(|category| category.parent_id.is_none()) {
        options.push((parent, false));
        options.extend(
            categories
                .iter()
                .filter(|child| child.parent_id == Some(parent.id))
                .map(|child| (child, true)),
        );
    }

    options
}

fn create_transaction_view(
    account: &Account,
    max_date: Date,
    categories: &[Category],
    language: Language,
) -> Markup {
    let create_transaction_route = endpoints::format_endpoint(endpoints::ADD_TRANSACTION, account.id);
    let account_route = endpoints::format_endpoint(endpoints::ACCOUNT, account.id);
    let nav_bar = NavBar::new(&create_transaction_route, language).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_transaction_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction for " (account.name) }

                div
                {
                    label
                        for="transaction_type"
                        class=(FORM_LABEL_STYLE)
                    {
                        (language.translate(Text::TransactionType))
                    }

                    select
                        name="transaction_type"
                        id="transaction_type"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value=(TransactionType::Debit.code()) selected
                        {
                            (language.translate(Text::Debit))
                        }
                        option value=(TransactionType::Credit.code())
                        {
                            (language.translate(Text::Credit))
                        }
                    }
                }

                div
                {
                    label
                        for="amount"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Amount"
                    }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="date"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Date"
                    }

                    input
                        name="date"
                        id="date"
                        type="date"
                        max=(max_date)
                        required
                        value=(max_date)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="category_id"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Category"
                    }

                    select
                        name="category_id"
                        id="category_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for (category, is_child) in category_options(categories) {
                            option value=(category.id)
                            {
                                @if is_child { "-- " }
                                (category.name)
                            }
                        }
                    }

                    @if categories.is_empty() {
                        p class="mt-2 text-sm text-gray-500 dark:text-gray-400"
                        {
                            "You need a category first. "
                            a href=(endpoints::NEW_CATEGORY_VIEW) class="underline" { "Create one" }
                            "."
                        }
                    }
                }

                div
                {
                    label
                        for="description"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Description"
                    }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Add Transaction"
                }

                a href=(account_route) class="block text-center text-sm underline" { "Back to account" }
            }
        }
    };

    base("Add Transaction", &[], &content)
}
