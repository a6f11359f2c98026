//! The date range section of the dashboard: filter form, totals and per-category table.

use maud::{Markup, html};

use crate::{
    dashboard::{aggregation::LabelledValue, date_range::DateRange},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, date_datetime_attr, format_currency,
    },
    i18n::{Language, Text},
};

/// A form that reloads the dashboard with a different `dates` range.
pub(super) fn date_range_form(range: DateRange, language: Language) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex flex-wrap items-end gap-2"
        {
            div class="flex-1 min-w-[16rem]"
            {
                label for="dates" class=(FORM_LABEL_STYLE)
                {
                    (language.translate(Text::DateRange))
                }

                input
                    id="dates"
                    type="text"
                    name="dates"
                    value=(range.to_query())
                    placeholder="2024-January-01 - 2024-January-31"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="w-28"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    (language.translate(Text::Filter))
                }
            }
        }
    }
}

/// The range bounds as text, e.g. "From 2024-01-01 To 2024-01-31".
pub(super) fn date_range_caption(range: DateRange, language: Language) -> Markup {
    html! {
        p class="text-sm text-gray-600 dark:text-gray-400"
        {
            (language.translate(Text::From)) " "
            time datetime=(date_datetime_attr(range.start)) { (range.start) }
            " " (language.translate(Text::To)) " "
            time datetime=(date_datetime_attr(range.end)) { (range.end) }
        }
    }
}

/// The summed amount of each category within the date range.
pub(super) fn category_totals_table(rows: &[LabelledValue], language: Language) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table
                id="range-category-totals"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { (language.translate(Text::CategoryName)) }
                        th scope="col" class=(TABLE_CELL_STYLE) { (language.translate(Text::Total)) }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                            {
                                (row.label)
                            }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.value)) }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center"
                            {
                                (language.translate(Text::NoData))
                            }
                        }
                    }
                }
            }
        }
    }
}
