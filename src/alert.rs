//! Alert system for displaying success and error messages to users.
//!
//! Alerts are returned as HTML fragments by the HTMX endpoints and swapped
//! into the `#alert-container` element of the page.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message shown at the bottom of the page that the user can dismiss.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded.
    SuccessSimple { message: String },
    /// An operation failed, with details on what to do about it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::SuccessSimple { message } => (true, message, String::new()),
            Alert::Error { message, details } => (false, message, details),
        };

        let container_style = if is_success {
            "flex items-start gap-3 p-4 rounded border text-green-800 border-green-300 \
            bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start gap-3 p-4 rounded border text-red-800 border-red-300 \
            bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                role="alert"
                class=(container_style)
                data-alert-kind=(if is_success { "success" } else { "error" })
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto text-lg leading-none"
                    onclick="this.parentElement.remove(); document.getElementById('alert-container').classList.add('hidden');"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn success_alert_renders_message() {
        let response = Alert::SuccessSimple {
            message: "Account deleted".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(alert.value().attr("data-alert-kind"), Some("success"));
        let text = alert.text().collect::<String>();
        assert!(text.contains("Account deleted"));
    }

    #[tokio::test]
    async fn error_alert_renders_details() {
        let response = Alert::Error {
            message: "Could not delete".to_owned(),
            details: "Try again".to_owned(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        let paragraphs: Vec<String> = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect();

        assert_eq!(paragraphs, vec!["Could not delete", "Try again"]);
    }
}
