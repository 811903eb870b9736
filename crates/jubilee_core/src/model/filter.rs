//! Listing filter state.
//!
//! # Responsibility
//! - Hold the primary filter (year XOR month), the search text and the page.
//! - Normalize raw UI input instead of rejecting it.
//!
//! # Invariants
//! - At most one primary filter is active (`PrimaryFilter` is a tagged enum).
//! - Stored search text is trimmed, lower-cased and at least 2 chars long.
//! - Every filter setter resets the page to 1.
//! - The page number is never 0.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shortest search text that is applied as a filter.
pub const MIN_SEARCH_CHARS: usize = 2;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

/// Calendar month, 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u8);

impl Month {
    /// Returns `None` outside `1..=12`.
    pub fn new(number: u32) -> Option<Self> {
        if (1..=12).contains(&number) {
            u8::try_from(number).ok().map(Self)
        } else {
            None
        }
    }

    pub fn number(self) -> u32 {
        u32::from(self.0)
    }

    /// Zero-padded form matching the `MM` slice of `DD.MM.YYYY`.
    pub fn two_digit(self) -> String {
        format!("{:02}", self.0)
    }
}

impl TryFrom<u32> for Month {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("month out of range: {value}"))
    }
}

impl From<Month> for u32 {
    fn from(value: Month) -> Self {
        value.number()
    }
}

/// Month selector input: a concrete month or "all months".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthChoice {
    None,
    Month(Month),
}

impl MonthChoice {
    /// Maps `0` and out-of-range numbers to [`MonthChoice::None`].
    pub fn from_number(number: u32) -> Self {
        Month::new(number).map_or(Self::None, Self::Month)
    }

    /// Parses `"none"`, an empty string or a month number.
    ///
    /// Anything unrecognized normalizes to [`MonthChoice::None`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Self::None;
        }
        trimmed
            .parse::<u32>()
            .map_or(Self::None, Self::from_number)
    }
}

/// The one primary filter that may be active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PrimaryFilter {
    #[default]
    None,
    /// Jubilees falling in the given year.
    Year(i32),
    /// Anniversaries in the given month with a jubilee in the reference year.
    Month(Month),
}

/// Filters and page number driving one listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    primary: PrimaryFilter,
    search: Option<String>,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            primary: PrimaryFilter::None,
            search: None,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> PrimaryFilter {
        self.primary
    }

    /// Normalized search text, when active.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns whether no filter at all is active.
    pub fn is_unfiltered(&self) -> bool {
        self.primary == PrimaryFilter::None && self.search.is_none()
    }

    /// Applies a year filter from raw text input.
    ///
    /// Exactly four ASCII digits replace any month filter. Other input clears
    /// an active year filter and leaves a month filter alone.
    pub fn set_year_filter(&mut self, year: &str) {
        let trimmed = year.trim();
        match parse_year(trimmed) {
            Some(value) => self.primary = PrimaryFilter::Year(value),
            None => {
                if matches!(self.primary, PrimaryFilter::Year(_)) {
                    self.primary = PrimaryFilter::None;
                }
            }
        }
        self.page = 1;
    }

    /// Applies a month filter; `MonthChoice::None` clears an active one.
    pub fn set_month_filter(&mut self, choice: MonthChoice) {
        match choice {
            MonthChoice::Month(month) => self.primary = PrimaryFilter::Month(month),
            MonthChoice::None => {
                if matches!(self.primary, PrimaryFilter::Month(_)) {
                    self.primary = PrimaryFilter::None;
                }
            }
        }
        self.page = 1;
    }

    /// Stores trimmed, lower-cased search text of at least two characters.
    /// Shorter input clears the search filter.
    pub fn set_search(&mut self, text: &str) {
        let normalized = text.trim().to_lowercase();
        self.search = if normalized.chars().count() >= MIN_SEARCH_CHARS {
            Some(normalized)
        } else {
            None
        };
        self.page = 1;
    }

    /// Clears every filter and returns to page 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns a copy of this state positioned at `page` (0 is treated as 1).
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

fn parse_year(value: &str) -> Option<i32> {
    if !YEAR_RE.is_match(value) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{FilterState, Month, MonthChoice, PrimaryFilter};

    fn march() -> MonthChoice {
        MonthChoice::Month(Month::new(3).expect("valid month"))
    }

    #[test]
    fn year_then_month_keeps_only_month() {
        let mut state = FilterState::new();
        state.set_year_filter("2025");
        state.set_month_filter(march());
        assert_eq!(state.primary(), PrimaryFilter::Month(Month::new(3).unwrap()));
    }

    #[test]
    fn month_then_year_keeps_only_year() {
        let mut state = FilterState::new();
        state.set_month_filter(march());
        state.set_year_filter(" 2025 ");
        assert_eq!(state.primary(), PrimaryFilter::Year(2025));
    }

    #[test]
    fn invalid_year_clears_year_but_not_month() {
        let mut state = FilterState::new();
        state.set_year_filter("2025");
        state.set_year_filter("25");
        assert_eq!(state.primary(), PrimaryFilter::None);

        state.set_month_filter(march());
        state.set_year_filter("20x5");
        assert!(matches!(state.primary(), PrimaryFilter::Month(_)));
    }

    #[test]
    fn year_rejects_non_ascii_digits_and_five_digits() {
        let mut state = FilterState::new();
        state.set_year_filter("٢٠٢٥");
        assert_eq!(state.primary(), PrimaryFilter::None);
        state.set_year_filter("20250");
        assert_eq!(state.primary(), PrimaryFilter::None);
    }

    #[test]
    fn month_none_clears_month_but_not_year() {
        let mut state = FilterState::new();
        state.set_month_filter(march());
        state.set_month_filter(MonthChoice::None);
        assert_eq!(state.primary(), PrimaryFilter::None);

        state.set_year_filter("2030");
        state.set_month_filter(MonthChoice::None);
        assert_eq!(state.primary(), PrimaryFilter::Year(2030));
    }

    #[test]
    fn month_choice_normalizes_out_of_range_input() {
        assert_eq!(MonthChoice::from_number(0), MonthChoice::None);
        assert_eq!(MonthChoice::from_number(13), MonthChoice::None);
        assert_eq!(MonthChoice::parse("none"), MonthChoice::None);
        assert_eq!(MonthChoice::parse("abc"), MonthChoice::None);
        assert_eq!(MonthChoice::parse(" 3 "), march());
    }

    #[test]
    fn short_search_clears_and_long_search_is_lowercased() {
        let mut state = FilterState::new();
        state.set_search("  РоМ ");
        assert_eq!(state.search(), Some("ром"));
        state.set_search("x");
        assert_eq!(state.search(), None);
        state.set_search("Яя");
        assert_eq!(state.search(), Some("яя"));
    }

    #[test]
    fn search_survives_primary_filter_changes() {
        let mut state = FilterState::new();
        state.set_search("acme");
        state.set_year_filter("2025");
        state.set_month_filter(march());
        assert_eq!(state.search(), Some("acme"));
    }

    #[test]
    fn every_setter_resets_page() {
        let mut state = FilterState::new().with_page(4);
        state.set_search("ab");
        assert_eq!(state.page(), 1);

        let mut state = state.with_page(3);
        state.set_year_filter("bad");
        assert_eq!(state.page(), 1);

        let mut state = state.with_page(2);
        state.set_month_filter(MonthChoice::None);
        assert_eq!(state.page(), 1);

        let mut state = state.with_page(2);
        state.reset();
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn primary_filter_serializes_as_tagged_variant() {
        let json = serde_json::to_value(PrimaryFilter::Month(Month::new(7).unwrap()))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "month", "value": 7 }));
    }
}
