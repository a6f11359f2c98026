//! The page listing every transaction of the user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    i18n::{Language, Text},
    navigation::NavBar,
    transaction::{TransactionListItem, get_transactions, table::transactions_table},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transactions of all active accounts, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    Ok(transactions_view(&transactions, language).into_response())
}

fn transactions_view(transactions: &[TransactionListItem], language: Language) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, language).into_html();
    let title = language.translate(Text::Transactions);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (title) }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Add transactions from an account's page."
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    (transactions_table(transactions, true, language))
                }
            }
        }
    );

    base(title, &[], &content)
}
