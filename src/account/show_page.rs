//! The page for a single account and its transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, AccountId, core::get_active_account},
    auth::UserID,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    i18n::{Language, Text},
    navigation::NavBar,
    transaction::{TransactionListItem, TransactionType, get_account_transactions, transactions_table},
};

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render one of the user's active accounts with its transactions, newest first.
pub async fn get_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<AccountPageState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_active_account(user_id, account_id, &connection)?;
    let transactions = get_account_transactions(user_id, account_id, &connection)
        .inspect_err(|error| {
            tracing::error!("Failed to retrieve transactions for account {account_id}: {error}")
        })?;

    Ok(account_view(&account, &transactions, language).into_response())
}

fn balance(transactions: &[TransactionListItem]) -> f64 {
    transactions
        .iter()
        .map(|item| match item.transaction.transaction_type {
            TransactionType::Credit => item.transaction.amount,
            TransactionType::Debit => -item.transaction.amount,
        })
        .sum()
}

fn account_view(
    account: &Account,
    transactions: &[TransactionListItem],
    language: Language,
) -> Markup {
    let show_url = endpoints::format_endpoint(endpoints::ACCOUNT, account.id);
    let nav_bar = NavBar::new(&show_url, language).into_html();
    let add_url = endpoints::format_endpoint(endpoints::ADD_TRANSACTION, account.id);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (account.name) }

                        @if !account.description.is_empty() {
                            p class="text-sm text-gray-500 dark:text-gray-400" { (account.description) }
                        }

                        p data-balance="true"
                        {
                            "Balance: " (format_currency(balance(transactions)))
                        }
                    }

                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        a href=(add_url) class=(LINK_STYLE) { "Add Transaction" }
                    }
                }

                h2 class="text-lg font-semibold" { (language.translate(Text::Transactions)) }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    (transactions_table(transactions, false, language))
                }
            }
        }
    );

    base(account.name.as_ref(), &[], &content)
}
