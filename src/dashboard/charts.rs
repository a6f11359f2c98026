//! Chart generation and rendering for the dashboard.
//!
//! Two ECharts visualizations are built with charming:
//! - **Transaction counter**: a pie chart of credit vs debit transaction counts
//! - **Category totals**: a bar chart of the summed amounts per top-level category
//!
//! Each chart is serialized to an ECharts option object and initialized by a
//! script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::{aggregation::LabelledValue, stats::DashboardCounts},
    html::HeadElement,
    i18n::{Language, Text},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initializes the dashboard charts once the page has loaded.
///
/// The charts follow the browser's dark mode setting and resize with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Escape the angle brackets and ampersands in chart options that hold user
/// named categories, so the text cannot close the surrounding `<script>` tag.
///
/// Chart options only carry these characters inside JSON strings, where the
/// `\uXXXX` escapes decode back to the same text.
fn escape_script_text(options: &str) -> String {
    let mut escaped = String::with_capacity(options.len());

    for character in options.chars() {
        match character {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            character => escaped.push(character),
        }
    }

    escaped
}

/// The rows of the transaction counter chart, leaving out types with no transactions.
pub(super) fn type_counter_rows(counts: &DashboardCounts, language: Language) -> Vec<LabelledValue> {
    [
        (Text::Credit, counts.credit_count),
        (Text::Debit, counts.debit_count),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(text, count)| LabelledValue {
        label: language.translate(text).to_owned(),
        value: count as f64,
    })
    .collect()
}

pub(super) fn type_counter_chart(rows: &[LabelledValue], language: Language) -> Chart {
    let data = rows
        .iter()
        .map(|row| (row.value, row.label.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text(language.translate(Text::TransactionCounter)))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("3%"))
        .series(
            Pie::new()
                .name(language.translate(Text::Counter))
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub(super) fn category_totals_chart(rows: &[LabelledValue], language: Language) -> Chart {
    let labels = rows.iter().map(|row| row.label.clone()).collect::<Vec<_>>();
    let values = rows.iter().map(|row| row.value).collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text(language.translate(Text::CategoryTotals)))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name(language.translate(Text::Total)).data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
