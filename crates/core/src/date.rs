//! Statement date handling: strict `DD/MM/YYYY` parsing, completion of
//! `DD/MM` dates with a statement year, and the sort-and-drop pass applied
//! before a table is written.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::bank::StatementYear;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

fn full_date_shape() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("invalid regex"))
}

/// Strict `DD/MM/YYYY` parse. Wrong separators, missing zero padding and
/// impossible calendar dates all yield `None`.
pub fn parse_full(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !full_date_shape().is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn render(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `"05/03"` + 2024 → `"05/03/2024"`. Purely textual; the result is
/// validated later by [`parse_full`].
pub fn complete_partial(day_month: &str, year: StatementYear) -> String {
    format!("{}/{}", day_month.trim(), year)
}

/// Outcome of [`sort_ascending_dropping_invalid`].
#[derive(Debug, Clone, PartialEq)]
pub struct SortedByDate<T> {
    pub items: Vec<T>,
    /// `(original position, offending value)` for every removed item.
    pub dropped: Vec<(usize, String)>,
}

/// Parse each item's date field, drop the ones that fail, stable-sort the
/// rest ascending and rewrite their dates in canonical `DD/MM/YYYY` form.
///
/// `date_field` returns `None` when the item has no textual date at all,
/// which counts as unparseable.
pub fn sort_ascending_dropping_invalid<T, F>(items: Vec<T>, mut date_field: F) -> SortedByDate<T>
where
    F: FnMut(&mut T) -> Option<&mut String>,
{
    let mut kept: Vec<(NaiveDate, T)> = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();

    for (idx, mut item) in items.into_iter().enumerate() {
        let parsed = match date_field(&mut item) {
            Some(text) => match parse_full(text) {
                Some(date) => {
                    *text = render(date);
                    Some(date)
                }
                None => {
                    dropped.push((idx, text.clone()));
                    None
                }
            },
            None => {
                dropped.push((idx, String::new()));
                None
            }
        };

        if let Some(date) = parsed {
            kept.push((date, item));
        }
    }

    kept.sort_by_key(|(date, _)| *date);

    SortedByDate {
        items: kept.into_iter().map(|(_, item)| item).collect(),
        dropped,
    }
}
