//! The date range filter for the dashboard totals.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Dates in the `dates` query parameter look like "2024-January-05".
const DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month repr:long case_sensitive:false]-[day]");

/// The separator between the start and end dates of the `dates` query parameter.
const RANGE_SEPARATOR: &str = " - ";

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The first day of the month containing `today` through `today`.
    pub fn month_to_date(today: Date) -> Self {
        Self {
            start: today.replace_day(1).unwrap_or(today),
            end: today,
        }
    }

    /// Parse the `dates` query parameter, falling back to [DateRange::month_to_date].
    ///
    /// A value that does not have exactly one " - " separator is ignored.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDateRange] if either date cannot be parsed.
    pub fn from_query(dates: Option<&str>, today: Date) -> Result<Self, Error> {
        let Some(dates) = dates else {
            return Ok(Self::month_to_date(today));
        };

        let parts: Vec<&str> = dates.split(RANGE_SEPARATOR).collect();
        let [start, end] = parts.as_slice() else {
            tracing::debug!("Ignoring malformed date range {dates:?}");
            return Ok(Self::month_to_date(today));
        };

        let parse = |text: &str| {
            Date::parse(text.trim(), DATE_FORMAT).map_err(|error| {
                tracing::warn!("Rejecting date {text:?} in range {dates:?}: {error}");
                Error::InvalidDateRange(dates.to_owned())
            })
        };

        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }

    /// Format the range the same way the `dates` query parameter expects it.
    pub fn to_query(self) -> String {
        format!(
            "{}{RANGE_SEPARATOR}{}",
            format_date(self.start),
            format_date(self.end)
        )
    }
}

fn format_date(date: Date) -> String {
    format!("{:04}-{}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::DateRange;

    const TODAY: time::Date = date!(2025 - 03 - 17);

    #[test]
    fn defaults_to_month_to_date() {
        let range = DateRange::from_query(None, TODAY).unwrap();

        assert_eq!(
            range,
            DateRange {
                start: date!(2025 - 03 - 01),
                end: TODAY
            }
        );
    }

    #[test]
    fn parses_month_names_case_insensitively() {
        let range =
            DateRange::from_query(Some("2024-january-05 - 2024-FEBRUARY-10"), TODAY).unwrap();

        assert_eq!(
            range,
            DateRange {
                start: date!(2024 - 01 - 05),
                end: date!(2024 - 02 - 10)
            }
        );
    }

    #[test]
    fn ignores_value_without_separator() {
        let range = DateRange::from_query(Some("2024-January-05"), TODAY).unwrap();

        assert_eq!(range, DateRange::month_to_date(TODAY));
    }

    #[test]
    fn ignores_value_with_too_many_parts() {
        let range = DateRange::from_query(
            Some("2024-January-05 - 2024-January-06 - 2024-January-07"),
            TODAY,
        )
        .unwrap();

        assert_eq!(range, DateRange::month_to_date(TODAY));
    }

    #[test]
    fn rejects_unparsable_dates() {
        let result = DateRange::from_query(Some("2024-Jan-05 - 2024-01-10"), TODAY);

        assert_eq!(
            result,
            Err(Error::InvalidDateRange("2024-Jan-05 - 2024-01-10".to_owned()))
        );
    }

    #[test]
    fn query_string_parses_back() {
        let range = DateRange {
            start: date!(2024 - 12 - 01),
            end: date!(2025 - 01 - 09),
        };

        assert_eq!(range.to_query(), "2024-December-01 - 2025-January-09");
        assert_eq!(
            DateRange::from_query(Some(&range.to_query()), TODAY),
            Ok(range)
        );
    }
}
