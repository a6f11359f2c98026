//! The transactions table shared by the transactions page and the account page.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, date_datetime_attr,
        format_currency,
    },
    i18n::{Language, Text},
    transaction::{TransactionListItem, TransactionType},
};

/// Render `items` as a table, with the account column only when `show_account` is set.
pub fn transactions_table(
    items: &[TransactionListItem],
    show_account: bool,
    language: Language,
) -> Markup {
    let column_count = if show_account { 6 } else { 5 };

    html! {
        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    @if show_account {
                        th scope="col" class=(TABLE_CELL_STYLE) { (language.translate(Text::Accounts)) }
                    }
                    th scope="col" class=(TABLE_CELL_STYLE) { (language.translate(Text::CategoryName)) }
                    th scope="col" class=(TABLE_CELL_STYLE) { (language.translate(Text::TransactionType)) }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                }
            }

            tbody
            {
                @for item in items {
                    @let transaction = &item.transaction;
                    @let detail_url = endpoints::format_endpoint(
                        endpoints::TRANSACTION_DETAIL_VIEW,
                        transaction.id,
                    );
                    @let (type_label, amount_style) = match transaction.transaction_type {
                        TransactionType::Credit => (
                            language.translate(Text::Credit),
                            "text-green-700 dark:text-green-400",
                        ),
                        TransactionType::Debit => (
                            language.translate(Text::Debit),
                            "text-red-700 dark:text-red-400",
                        ),
                    };

                    tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                    {
                        td class=(TABLE_CELL_STYLE)
                        {
                            a href=(detail_url) class=(LINK_STYLE)
                            {
                                time datetime=(date_datetime_attr(transaction.date)) { (transaction.date) }
                            }
                        }
                        @if show_account {
                            td class=(TABLE_CELL_STYLE) { (item.account_name) }
                        }
                        td class=(TABLE_CELL_STYLE) { (item.category_name) }
                        td class=(TABLE_CELL_STYLE) { (type_label) }
                        td class={ (TABLE_CELL_STYLE) " " (amount_style) } { (format_currency(transaction.amount)) }
                        td class=(TABLE_CELL_STYLE) { (transaction.description) }
                    }
                }

                @if items.is_empty() {
                    tr
                    {
                        td colspan=(column_count) class="px-6 py-4 text-center"
                        {
                            "No transactions yet."
                        }
                    }
                }
            }
        }
    }
}
