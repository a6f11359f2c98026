//! Defines the route handler for the page that lists accounts and the trash.

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
    account::{
        Account, AccountBalance,
        core::{get_accounts_with_balances, get_deleted_accounts},
    },
    auth::UserID,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, date_datetime_attr, edit_delete_action_links,
        format_currency,
    },
    i18n::{Language, Text},
    navigation::NavBar,
};

/// The state needed for the accounts page.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the active accounts with their balances, followed by the trash.
pub async fn get_accounts_page(
    State(state): State<AccountsPageState>,
    Extension(user_id): Extension<UserID>,
    language: Language,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_accounts_with_balances(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve accounts: {error}"))?;
    let trash = get_deleted_accounts(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve deleted accounts: {error}"))?;

    Ok(accounts_view(&accounts, &trash, language).into_response())
}

fn accounts_view(accounts: &[AccountBalance], trash: &[Account], language: Language) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS, language).into_html();
    let title = language.translate(Text::Accounts);

    let account_row = |item: &AccountBalance| {
        let account = &item.account;
        let show_url = endpoints::format_endpoint(endpoints::ACCOUNT, account.id);
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-id=(account.id)
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(show_url) class=(LINK_STYLE) { (account.name) }
                }

                td class=(TABLE_CELL_STYLE) { (format_currency(item.balance)) }

                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(date_datetime_attr(account.created_at)) { (account.created_at) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &show_url,
                            &format!(
                                "Move '{}' to the trash? You can restore it later.",
                                account.name
                            ),
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let trash_row = |account: &Account| {
        let restore_url = endpoints::format_endpoint(endpoints::RESTORE_ACCOUNT, account.id);
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_ACCOUNT_PERMANENTLY, account.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-deleted-account-id=(account.id)
            {
                th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (account.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(deleted_at) = account.deleted_at {
                        time datetime=(date_datetime_attr(deleted_at)) { (deleted_at) }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(restore_url) class=(LINK_STYLE) { "Restore" }

                        button
                            type="button"
                            hx-delete=(delete_url)
                            hx-confirm=(format!(
                                "Delete '{}' and all of its transactions for good? This cannot be undone.",
                                account.name
                            ))
                            hx-target="closest tr"
                            hx-target-error="#alert-container"
                            hx-swap="delete"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete permanently"
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (title) }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Create Account"
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table id="accounts" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Created" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for item in accounts {
                                (account_row(item))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td colspan="4" class="px-6 py-4 text-center"
                                    {
                                        "No accounts yet. "
                                        a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create one"
                                        }
                                        " to start recording transactions."
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if !trash.is_empty() {
                section class="space-y-4 w-full max-w-4xl mt-8"
                {
                    h2 class="text-lg font-semibold" { "Trash" }

                    div class="overflow-x-auto dark:bg-gray-800"
                    {
                        table id="trash" class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Deleted" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for account in trash {
                                    (trash_row(account))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}
