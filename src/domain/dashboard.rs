// Dashboard page state and its rendered view
use serde::Serialize;

use super::access::AccessLevel;
use super::filter::{filter_submissions, FilterCriteria};
use super::stats::{DashboardStats, FilterOptions};
use super::submission::Submission;
use super::visibility::PublicSettings;

/// Loaded data for a page in the `Ready` state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyPage {
    pub all: Vec<Submission>,
    pub filtered: Vec<Submission>,
    pub stats: DashboardStats,
    pub options: FilterOptions,
}

impl ReadyPage {
    pub fn new(all: Vec<Submission>) -> Self {
        let stats = DashboardStats::aggregate(&all);
        let options = FilterOptions::from_submissions(&all);
        Self {
            filtered: all.clone(),
            all,
            stats,
            options,
        }
    }

    pub fn apply_filter(&mut self, criteria: &FilterCriteria) {
        self.filtered = filter_submissions(&self.all, criteria);
        self.stats = DashboardStats::aggregate(&self.filtered);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Loading,
    PrivateBlocked,
    Error(String),
    Ready(ReadyPage),
}

impl PageState {
    pub fn status(&self) -> PageStatus {
        match self {
            PageState::Loading => PageStatus::Loading,
            PageState::PrivateBlocked => PageStatus::PrivateBlocked,
            PageState::Error(_) => PageStatus::Error,
            PageState::Ready(_) => PageStatus::Ready,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageStatus {
    Loading,
    PrivateBlocked,
    Error,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub state: PageStatus,
    pub public_data_enabled: bool,
    pub access: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: DashboardStats,
    pub filter_options: FilterOptions,
    pub submissions: Vec<Submission>,
}

impl DashboardView {
    pub fn render(state: &PageState, settings: PublicSettings, access: AccessLevel) -> Self {
        let mut view = Self {
            state: state.status(),
            public_data_enabled: settings.is_public_data_enabled,
            access,
            error: None,
            stats: DashboardStats::default(),
            filter_options: FilterOptions::default(),
            submissions: Vec::new(),
        };

        match state {
            PageState::Error(message) => view.error = Some(message.clone()),
            PageState::Ready(page) => {
                view.stats = page.stats.clone();
                view.filter_options = page.options.clone();
                view.submissions = page.filtered.clone();
            }
            PageState::Loading | PageState::PrivateBlocked => {}
        }

        view
    }
}
