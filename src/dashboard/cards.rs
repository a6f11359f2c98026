//! Summary cards for the dashboard counts and the date range totals.

use maud::{Markup, html};

use crate::{
    dashboard::stats::{DashboardCounts, TypeTotals},
    html::{CARD_STYLE, format_currency},
    i18n::{Language, Text},
};

const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

fn card(id: &str, label: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-card=(id)
        {
            p class=(CARD_LABEL_STYLE) { (label) }
            p class={ (CARD_VALUE_STYLE) " " (value_style) } { (value) }
        }
    }
}

/// The account and transaction counts.
pub(super) fn count_cards_view(counts: &DashboardCounts, language: Language) -> Markup {
    html! {
        section id="counts" class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            (card(
                "account-count",
                language.translate(Text::AccountCount),
                &counts.account_count.to_string(),
                "",
            ))
            (card(
                "transaction-count",
                language.translate(Text::TransactionCount),
                &counts.transaction_count.to_string(),
                "",
            ))
            (card(
                "credit-count",
                language.translate(Text::CreditCount),
                &counts.credit_count.to_string(),
                "text-green-600 dark:text-green-400",
            ))
            (card(
                "debit-count",
                language.translate(Text::DebitCount),
                &counts.debit_count.to_string(),
                "text-red-600 dark:text-red-400",
            ))
        }
    }
}

/// The credit and debit totals of the selected date range.
pub(super) fn type_total_cards_view(totals: &TypeTotals, language: Language) -> Markup {
    html! {
        div class="grid grid-cols-2 gap-4"
        {
            (card(
                "credit-total",
                language.translate(Text::Credit),
                &format_currency(totals.credit),
                "text-green-600 dark:text-green-400",
            ))
            (card(
                "debit-total",
                language.translate(Text::Debit),
                &format_currency(totals.debit),
                "text-red-600 dark:text-red-400",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        dashboard::stats::{DashboardCounts, TypeTotals},
        i18n::Language,
    };

    use super::{count_cards_view, type_total_cards_view};

    fn card_text(html: &Html, id: &str) -> String {
        html.select(&Selector::parse(&format!("[data-card={id}]")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No card {id}"))
            .text()
            .collect()
    }

    #[test]
    fn renders_counts() {
        let counts = DashboardCounts {
            account_count: 2,
            transaction_count: 5,
            credit_count: 3,
            debit_count: 2,
        };

        let html = Html::parse_fragment(&count_cards_view(&counts, Language::English).into_string());

        assert_eq!(card_text(&html, "account-count"), "Accounts2");
        assert_eq!(card_text(&html, "transaction-count"), "Transactions5");
        assert_eq!(card_text(&html, "credit-count"), "Credit Transactions3");
        assert_eq!(card_text(&html, "debit-count"), "Debit Transactions2");
    }

    #[test]
    fn renders_type_totals_in_language() {
        let totals = TypeTotals {
            credit: 25.0,
            debit: 7.5,
        };

        let html = Html::parse_fragment(
            &type_total_cards_view(&totals, Language::Indonesian).into_string(),
        );

        assert_eq!(card_text(&html, "credit-total"), "Kredit$25.00");
        assert_eq!(card_text(&html, "debit-total"), "Debit$7.50");
    }
}
