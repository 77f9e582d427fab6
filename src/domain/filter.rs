// Filter engine over the in-memory submission list
use chrono::{DateTime, NaiveDate, Utc};

use super::submission::Submission;

/// Inclusive time window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whole UTC days: from the first instant of `start` to the last instant of `end`.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
            end: end
                .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999))
                .map(|dt| dt.and_utc()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub asset_type: Option<String>,
    pub agency_type: Option<String>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = non_blank(asset_type.into());
        self
    }

    pub fn with_agency_type(mut self, agency_type: impl Into<String>) -> Self {
        self.agency_type = non_blank(agency_type.into());
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = non_blank(term.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = (!range.is_open()).then_some(range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.asset_type.is_none()
            && self.agency_type.is_none()
            && self.search.is_none()
            && self.date_range.is_none()
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        if let Some(asset_type) = &self.asset_type {
            if submission.asset_type() != asset_type {
                return false;
            }
        }

        if let Some(agency_type) = &self.agency_type {
            if submission.agency_type() != agency_type {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !matches_search(submission, &term.to_lowercase()) {
                return false;
            }
        }

        if let Some(range) = &self.date_range {
            if !range.contains(submission.timestamp) {
                return false;
            }
        }

        true
    }
}

/// Keep the submissions matching every present criterion, in their original order.
pub fn filter_submissions(all: &[Submission], criteria: &FilterCriteria) -> Vec<Submission> {
    if criteria.is_empty() {
        return all.to_vec();
    }

    all.iter()
        .filter(|s| criteria.matches(s))
        .cloned()
        .collect()
}

fn matches_search(submission: &Submission, needle: &str) -> bool {
    let data = &submission.data;
    [
        data.description.as_str(),
        data.agency.name.as_str(),
        data.asset.details.as_str(),
        data.location.as_deref().unwrap_or_default(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Whitespace-only means absent; anything else is kept verbatim.
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::FilterOptions;
    use crate::domain::test_support::{sample_list, submission};

    fn ids(list: &[Submission]) -> Vec<&str> {
        list.iter().map(|s| s.id.as_str()).collect()
    }

    fn is_subsequence(sub: &[Submission], all: &[Submission]) -> bool {
        let mut it = all.iter();
        sub.iter().all(|s| it.any(|a| a == s))
    }

    #[test]
    fn test_no_criteria_returns_input() {
        let all = sample_list();
        let filtered = filter_submissions(&all, &FilterCriteria::new());
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let criteria = FilterCriteria::new()
            .with_asset_type("")
            .with_agency_type("  ")
            .with_search("")
            .with_date_range(DateRange::default());
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_padded_type_matches_exactly() {
        let all = vec![
            submission("a", "laptop ", "police", "2024-03-02T00:00:00Z"),
            submission("b", "laptop", " police", "2024-03-01T00:00:00Z"),
        ];
        let options = FilterOptions::from_submissions(&all);
        assert_eq!(options.asset_types, vec!["laptop ", "laptop"]);

        let criteria = FilterCriteria::new().with_asset_type(options.asset_types[0].clone());
        assert_eq!(ids(&filter_submissions(&all, &criteria)), vec!["a"]);

        let criteria = FilterCriteria::new().with_agency_type(" police");
        assert_eq!(ids(&filter_submissions(&all, &criteria)), vec!["b"]);
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let mut all = sample_list();
        all[0].data.description = "seized laptop case".to_string();
        all[1].data.description = "laptop".to_string();

        let criteria = FilterCriteria::new().with_search(" laptop ");
        assert_eq!(criteria.search.as_deref(), Some(" laptop "));
        assert_eq!(ids(&filter_submissions(&all, &criteria)), vec!["s1"]);
    }

    #[test]
    fn test_asset_type_exact_match() {
        let all = sample_list();
        let criteria = FilterCriteria::new().with_asset_type("phone");
        let filtered = filter_submissions(&all, &criteria);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].asset_type(), "phone");

        let criteria = FilterCriteria::new().with_asset_type("Phone");
        assert!(filter_submissions(&all, &criteria).is_empty());
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let all = sample_list();
        let criteria = FilterCriteria::new()
            .with_asset_type("laptop")
            .with_agency_type("police");
        let filtered = filter_submissions(&all, &criteria);

        assert_eq!(ids(&filtered), vec!["s1"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut all = sample_list();
        all[1].data.description = "Stolen from the OFFICE".to_string();
        all[2].data.agency.name = "Office of Records".to_string();

        let criteria = FilterCriteria::new().with_search("office");
        let filtered = filter_submissions(&all, &criteria);

        assert_eq!(ids(&filtered), vec!["s2", "s3"]);
    }

    #[test]
    fn test_search_covers_asset_details_and_location() {
        let mut all = sample_list();
        all[0].data.asset.details = "Serial XK-9".to_string();
        all[2].data.location = Some("Harbor xk-9 dock".to_string());

        let filtered = filter_submissions(&all, &FilterCriteria::new().with_search("XK-9"));
        assert_eq!(ids(&filtered), vec!["s1", "s3"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let all = vec![
            submission("a", "laptop", "police", "2024-03-03T00:00:00Z"),
            submission("b", "laptop", "police", "2024-03-02T23:59:59Z"),
            submission("c", "laptop", "police", "2024-03-01T00:00:00Z"),
            submission("d", "laptop", "police", "2024-02-29T23:59:59Z"),
        ];
        let range = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 3, 1),
            NaiveDate::from_ymd_opt(2024, 3, 2),
        );
        let filtered = filter_submissions(&all, &FilterCriteria::new().with_date_range(range));

        assert_eq!(ids(&filtered), vec!["b", "c"]);
    }

    #[test]
    fn test_open_ended_range() {
        let all = sample_list();
        let range = DateRange::from_dates(NaiveDate::from_ymd_opt(2024, 3, 2), None);
        let filtered = filter_submissions(&all, &FilterCriteria::new().with_date_range(range));

        assert_eq!(ids(&filtered), vec!["s1", "s2"]);
    }

    #[test]
    fn test_result_is_ordered_subsequence_and_idempotent() {
        let all = sample_list();
        let cases = [
            FilterCriteria::new().with_asset_type("laptop"),
            FilterCriteria::new().with_agency_type("customs"),
            FilterCriteria::new().with_search("e"),
            FilterCriteria::new().with_asset_type("tablet"),
        ];

        for criteria in cases {
            let once = filter_submissions(&all, &criteria);
            assert!(is_subsequence(&once, &all));
            assert_eq!(filter_submissions(&once, &criteria), once);
        }
    }
}
