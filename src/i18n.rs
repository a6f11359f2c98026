//! Display language selection and the translated interface strings.
//!
//! The chosen language lives in a plain (unsigned) cookie since it carries no
//! privileges. Requests without the cookie are rendered in English.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Path},
    http::{
        HeaderMap, Uri,
        header::{HOST, REFERER},
        request::Parts,
    },
    response::Redirect,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::{auth::normalize_redirect_url, endpoints};

/// The name of the cookie holding the language code.
pub const COOKIE_LANGUAGE: &str = "lang";

/// How long the browser should remember the chosen language.
const LANGUAGE_COOKIE_DURATION: Duration = Duration::days(365);

/// A language the interface can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// The default language.
    #[default]
    English,
    /// Bahasa Indonesia.
    Indonesian,
}

impl Language {
    /// Parse a two letter language code, e.g. "en".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::English),
            "id" => Some(Self::Indonesian),
            _ => None,
        }
    }

    /// The two letter language code, suitable for the `lang` attribute.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Indonesian => "id",
        }
    }

    /// Look up `text` in this language.
    pub fn translate(self, text: Text) -> &'static str {
        match self {
            Self::English => english(text),
            Self::Indonesian => indonesian(text),
        }
    }
}

impl<S> FromRequestParts<S> for Language
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(jar
            .get(COOKIE_LANGUAGE)
            .and_then(|cookie| Language::from_code(cookie.value_trimmed()))
            .unwrap_or_default())
    }
}

/// The interface strings that are shown in more than one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Text {
    Dashboard,
    Transactions,
    Accounts,
    Categories,
    LogOut,
    Language,
    AccountCount,
    TransactionCount,
    CreditCount,
    DebitCount,
    TransactionCounter,
    TransactionType,
    Counter,
    CategoryTotals,
    CategoryName,
    Total,
    Credit,
    Debit,
    TotalsByDate,
    DateRange,
    Filter,
    From,
    To,
    NoData,
}

fn english(text: Text) -> &'static str {
    match text {
        Text::Dashboard => "Dashboard",
        Text::Transactions => "Transactions",
        Text::Accounts => "Accounts",
        Text::Categories => "Categories",
        Text::LogOut => "Log out",
        Text::Language => "Language",
        Text::AccountCount => "Accounts",
        Text::TransactionCount => "Transactions",
        Text::CreditCount => "Credit Transactions",
        Text::DebitCount => "Debit Transactions",
        Text::TransactionCounter => "Transaction Counter",
        Text::TransactionType => "Transaction Type",
        Text::Counter => "Counter",
        Text::CategoryTotals => "Total by Category",
        Text::CategoryName => "Category Name",
        Text::Total => "Total",
        Text::Credit => "Credit",
        Text::Debit => "Debit",
        Text::TotalsByDate => "Totals by Date",
        Text::DateRange => "Date Range",
        Text::Filter => "Filter",
        Text::From => "From",
        Text::To => "To",
        Text::NoData => "No data for this period.",
    }
}

fn indonesian(text: Text) -> &'static str {
    match text {
        Text::Dashboard => "Dasbor",
        Text::Transactions => "Transaksi",
        Text::Accounts => "Akun",
        Text::Categories => "Kategori",
        Text::LogOut => "Keluar",
        Text::Language => "Bahasa",
        Text::AccountCount => "Akun",
        Text::TransactionCount => "Transaksi",
        Text::CreditCount => "Transaksi Kredit",
        Text::DebitCount => "Transaksi Debit",
        Text::TransactionCounter => "Penghitung Transaksi",
        Text::TransactionType => "Jenis Transaksi",
        Text::Counter => "Jumlah",
        Text::CategoryTotals => "Total per Kategori",
        Text::CategoryName => "Nama Kategori",
        Text::Total => "Total",
        Text::Credit => "Kredit",
        Text::Debit => "Debit",
        Text::TotalsByDate => "Total per Tanggal",
        Text::DateRange => "Rentang Tanggal",
        Text::Filter => "Saring",
        Text::From => "Dari",
        Text::To => "Sampai",
        Text::NoData => "Tidak ada data untuk periode ini.",
    }
}

/// Store the language given by the language code in the path and send the
/// client back to the page it came from.
///
/// Unknown language codes leave the current choice untouched. The client is
/// only sent back to the referring page if it is on this site, otherwise it
/// lands on the dashboard.
pub async fn switch_language(
    Path(code): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let jar = match Language::from_code(&code) {
        Some(language) => jar.add(
            Cookie::build((COOKIE_LANGUAGE, language.code()))
                .path("/")
                .max_age(LANGUAGE_COOKIE_DURATION)
                .same_site(SameSite::Lax)
                .http_only(true),
        ),
        None => {
            tracing::warn!("Ignoring request to switch to unknown language \"{code}\"");
            jar
        }
    };

    let redirect_url =
        referring_page(&headers).unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    (jar, Redirect::to(&redirect_url))
}

/// Get the path and query of the Referer header if it points at this site.
fn referring_page(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(REFERER)?.to_str().ok()?;
    let uri = referer.parse::<Uri>().ok()?;

    if let Some(authority) = uri.authority() {
        let host = headers.get(HOST)?.to_str().ok()?;

        if !authority.as_str().eq_ignore_ascii_case(host) {
            tracing::warn!("Ignoring Referer from another site: {referer}");
            return None;
        }
    }

    normalize_redirect_url(uri.path_and_query()?.as_str())
}
