//! The page showing a single transaction.

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
    auth::UserID,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, date_datetime_attr, format_currency},
    i18n::{Language, Text},
    navigation::NavBar,
    transaction::{TransactionId, TransactionListItem, TransactionType, get_transaction},
};

/// The state needed for the transaction detail page.
#[derive(Debug, Clone)]
pub struct TransactionDetailState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render one of the user's transactions, or the 404 page if it is not theirs.
pub async fn get_transaction_detail_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<TransactionDetailState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = get_transaction(user_id, transaction_id, &connection)?;

    Ok(transaction_detail_view(&item, language).into_response())
}

fn transaction_detail_view(item: &TransactionListItem, language: Language) -> Markup {
    let transaction = &item.transaction;
    let nav_bar = NavBar::new(endpoints::TRANSACTION_DETAIL_VIEW, language).into_html();
    let account_url = endpoints::format_endpoint(endpoints::ACCOUNT, transaction.account_id);
    let type_label = match transaction.transaction_type {
        TransactionType::Credit => language.translate(Text::Credit),
        TransactionType::Debit => language.translate(Text::Debit),
    };

    let field = |label: &str, value: Markup| {
        html! {
            div class="flex justify-between gap-8 py-2 border-b border-gray-200 dark:border-gray-700"
            {
                dt class="font-medium" { (label) }
                dd { (value) }
            }
        }
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Transaction #" (transaction.id) }

                dl
                {
                    (field("Date", html! {
                        time datetime=(date_datetime_attr(transaction.date)) { (transaction.date) }
                    }))
                    (field(language.translate(Text::Accounts), html! {
                        a href=(account_url) class=(LINK_STYLE) { (item.account_name) }
                    }))
                    (field(language.translate(Text::CategoryName), html! { (item.category_name) }))
                    (field(language.translate(Text::TransactionType), html! { (type_label) }))
                    (field("Amount", html! { (format_currency(transaction.amount)) }))
                    (field("Description", html! { (transaction.description) }))
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
                {
                    "Back to " (language.translate(Text::Transactions))
                }
            }
        }
    );

    base("Transaction", &[], &content)
}
