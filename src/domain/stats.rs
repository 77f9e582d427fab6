// Summary statistics over a submission list
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::submission::Submission;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_submissions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_submission: Option<DateTime<Utc>>,
    pub submissions_by_option: BTreeMap<String, usize>,
    /// Keyed by `YYYY-MM`.
    pub submissions_by_month: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn aggregate(list: &[Submission]) -> Self {
        let mut by_option: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_month: BTreeMap<String, usize> = BTreeMap::new();
        let mut latest: Option<DateTime<Utc>> = None;

        for submission in list {
            *by_option
                .entry(submission.asset_type().to_string())
                .or_default() += 1;
            *by_month
                .entry(submission.timestamp.format("%Y-%m").to_string())
                .or_default() += 1;

            // Max rather than list[0]: merged or re-sorted inputs stay correct.
            latest = Some(latest.map_or(submission.timestamp, |l| l.max(submission.timestamp)));
        }

        Self {
            total_submissions: list.len(),
            latest_submission: latest,
            submissions_by_option: by_option,
            submissions_by_month: by_month,
        }
    }
}

/// Choices offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub asset_types: Vec<String>,
    pub agency_types: Vec<String>,
}

impl FilterOptions {
    /// Distinct values in first-seen order.
    pub fn from_submissions(list: &[Submission]) -> Self {
        Self {
            asset_types: distinct(list.iter().map(Submission::asset_type)),
            agency_types: distinct(list.iter().map(Submission::agency_type)),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
