//! ECharts bar charts for the analytics pages.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    expense::{CategorySummary, MonthlySummary},
    html::HeadElement,
};

/// The ECharts library, loaded before [charts_script].
const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for `charts`.
pub(super) fn charts_view(charts: &[AnalyticsChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 gap-4"
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

/// The head elements that load ECharts and initialise `charts` once the page
/// has loaded, following the browser's light or dark mode.
pub(super) fn charts_script(charts: &[AnalyticsChart]) -> [HeadElement; 2] {
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
                escape_script_json(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        HeadElement::ScriptSource(PreEscaped(wrapped_script)),
    ]
}

/// Escape `options` so it can be embedded in an inline `<script>` element.
///
/// Chart labels come from user input, and a label containing `</script>`
/// would otherwise end the script early. The escapes only appear inside JSON
/// strings, where they decode back to the original characters, so `options`
/// must not contain `<`, `>` or `&` outside of a string.
fn escape_script_json(options: &str) -> String {
    options
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

pub(super) fn category_chart(summary: &[CategorySummary]) -> Chart {
    let labels = summary
        .iter()
        .map(|row| row.category.clone())
        .collect::<Vec<_>>();
    let values = summary.iter().map(|row| row.total).collect::<Vec<_>>();

    bar_chart("Spending by Category", labels, values)
}

pub(super) fn monthly_chart(summary: &[MonthlySummary]) -> Chart {
    let labels = summary
        .iter()
        .map(|row| row.month.label())
        .collect::<Vec<_>>();
    let values = summary.iter().map(|row| row.total).collect::<Vec<_>>();

    bar_chart("Spending by Month", labels, values)
}

fn bar_chart(title: &str, labels: Vec<String>, values: Vec<f64>) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
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
        .series(bar::Bar::new().name("Total").data(values))
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

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        analytics::charts::{
            AnalyticsChart, category_chart, charts_script, escape_script_json, monthly_chart,
        },
        expense::{CategorySummary, MonthlySummary, YearMonth},
        html::HeadElement,
    };

    #[test]
    fn category_chart_uses_categories_as_labels() {
        let summary = vec![
            CategorySummary {
                category: "Food".to_owned(),
                total: 15.5,
                count: 1,
            },
            CategorySummary {
                category: "Transport".to_owned(),
                total: 45.0,
                count: 1,
            },
        ];

        let options = category_chart(&summary).to_string();

        assert!(options.contains("\"Food\""), "got {options}");
        assert!(options.contains("\"Transport\""), "got {options}");
        assert!(options.contains("45"), "got {options}");
    }

    #[test]
    fn monthly_chart_uses_month_labels() {
        let summary = vec![MonthlySummary {
            month: YearMonth::new(2024, Month::September),
            total: 60.5,
            count: 2,
        }];

        let options = monthly_chart(&summary).to_string();

        assert!(options.contains("September 2024"), "got {options}");
        assert!(options.contains("60.5"), "got {options}");
    }

    #[test]
    fn script_initialises_each_chart() {
        let charts = [
            AnalyticsChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            AnalyticsChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let [link, script] = charts_script(&charts);

        assert!(matches!(link, HeadElement::ScriptLink(url) if url.contains("echarts")));
        let HeadElement::ScriptSource(script) = script else {
            panic!("want script source");
        };
        assert!(script.0.contains("getElementById(\"first-chart\")"));
        assert!(script.0.contains("getElementById(\"second-chart\")"));
    }

    #[test]
    fn script_escapes_markup_in_chart_options() {
        let summary = vec![CategorySummary {
            category: "</script><script>alert(1)</script>".to_owned(),
            total: 1.0,
            count: 1,
        }];
        let charts = [AnalyticsChart {
            id: "category-chart",
            options: category_chart(&summary).to_string(),
        }];

        let [_, script] = charts_script(&charts);

        let HeadElement::ScriptSource(script) = script else {
            panic!("want script source");
        };
        assert!(!script.0.contains("</script>"), "got {}", script.0);
        assert!(
            script
                .0
                .contains(r"\u003c/script\u003e\u003cscript\u003ealert(1)")
        );
    }

    #[test]
    fn escaped_options_decode_to_the_same_json() {
        let options = r#"{"data":["Food & Drink","<b>"]}"#;

        let escaped = escape_script_json(options);

        assert_eq!(escaped, r#"{"data":["Food \u0026 Drink","\u003cb\u003e"]}"#);
        let original: serde_json::Value = serde_json::from_str(options).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(decoded, original);
    }
}
