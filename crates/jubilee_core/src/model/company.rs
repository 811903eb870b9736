//! Company anniversary record.
//!
//! # Responsibility
//! - Mirror one row of the `companies` table.
//! - Expose the date-component rules used by jubilee matching.
//!
//! # Invariants
//! - `anniversary_date` is kept verbatim in `DD.MM.YYYY` form.
//! - Empty or `"0"` dates mean "no date"; such rows never get listed.

use serde::{Deserialize, Serialize};

/// Stable row identifier (`companies.id`).
pub type CompanyId = i64;

/// Jubilees repeat every this many years.
pub const JUBILEE_PERIOD_YEARS: i32 = 5;

/// Stored anniversary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// Unique display name.
    pub name: String,
    pub website: Option<String>,
    /// `DD.MM.YYYY`, or empty/`"0"` for "no date".
    pub anniversary_date: String,
    /// Free text stored as entered, never derived from the date.
    pub jubilee: Option<String>,
    pub industry: Option<String>,
    pub calls: Option<String>,
    pub notes: Option<String>,
}

impl Company {
    /// Returns whether this record carries an anniversary date at all.
    pub fn has_anniversary(&self) -> bool {
        is_dated(&self.anniversary_date)
    }

    /// Year part of the anniversary date, when it parses.
    pub fn anniversary_year(&self) -> Option<i32> {
        year_component(&self.anniversary_date)
    }

    /// Month part of the anniversary date, when it parses.
    pub fn anniversary_month(&self) -> Option<u32> {
        month_component(&self.anniversary_date)
    }
}

/// Insert payload for out-of-band record creation (imports, fixtures).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub website: Option<String>,
    pub anniversary_date: String,
    pub jubilee: Option<String>,
    pub industry: Option<String>,
    pub calls: Option<String>,
    pub notes: Option<String>,
}

impl NewCompany {
    /// Creates a payload with only the name and date set.
    pub fn new(name: impl Into<String>, anniversary_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anniversary_date: anniversary_date.into(),
            ..Self::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_jubilee(mut self, jubilee: impl Into<String>) -> Self {
        self.jubilee = Some(jubilee.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

/// Returns `false` for the two "no date" markers: empty string and `"0"`.
pub fn is_dated(anniversary_date: &str) -> bool {
    !anniversary_date.is_empty() && anniversary_date != "0"
}

/// Parses the last four characters of a `DD.MM.YYYY` string as the year.
///
/// SQL evaluates the same slice with `CAST(... AS INTEGER)`, which yields `0`
/// where this returns `None`.
pub fn year_component(anniversary_date: &str) -> Option<i32> {
    let chars: Vec<char> = anniversary_date.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    chars[chars.len() - 4..]
        .iter()
        .collect::<String>()
        .parse()
        .ok()
}

/// Parses characters 4..5 (1-based) of a `DD.MM.YYYY` string as the month.
pub fn month_component(anniversary_date: &str) -> Option<u32> {
    let month: String = anniversary_date.chars().skip(3).take(2).collect();
    if month.chars().count() != 2 {
        return None;
    }
    month.parse().ok().filter(|value| (1..=12).contains(value))
}

/// Returns whether `anniversary_year` has a round jubilee in `reference_year`.
///
/// Uses the truncated remainder, so years after the reference also qualify.
pub fn is_jubilee_year(reference_year: i32, anniversary_year: i32) -> bool {
    (reference_year - anniversary_year) % JUBILEE_PERIOD_YEARS == 0
}

#[cfg(test)]
mod tests {
    use super::{is_dated, is_jubilee_year, month_component, year_component};

    #[test]
    fn no_date_markers_are_not_dated() {
        assert!(!is_dated(""));
        assert!(!is_dated("0"));
        assert!(is_dated("01.01.2015"));
    }

    #[test]
    fn components_follow_fixed_positions() {
        assert_eq!(year_component("15.03.1998"), Some(1998));
        assert_eq!(month_component("15.03.1998"), Some(3));
        assert_eq!(year_component("0"), None);
        assert_eq!(month_component("15.3.1998"), None);
    }

    #[test]
    fn jubilee_admits_differences_of_either_sign() {
        assert!(is_jubilee_year(2025, 2015));
        assert!(is_jubilee_year(2025, 2025));
        assert!(is_jubilee_year(2025, 2030));
        assert!(!is_jubilee_year(2025, 2017));
    }
}
