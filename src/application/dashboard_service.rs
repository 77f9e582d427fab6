// Dashboard service - Use case for one dashboard page activation
use crate::application::submission_repository::{FetchError, SubmissionRepository, VisibilitySettings};
use crate::application::visibility_gate::VisibilityGate;
use crate::domain::access::{AccessLevel, Identity};
use crate::domain::dashboard::{DashboardView, PageState, ReadyPage};
use crate::domain::export::{export_filename, flatten, FlatRow};
use crate::domain::filter::FilterCriteria;
use crate::domain::submission::Submission;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn SubmissionRepository>,
    settings: Arc<dyn VisibilitySettings>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn SubmissionRepository>, settings: Arc<dyn VisibilitySettings>) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Start a page activation for `identity`. The session starts in `Loading`.
    pub fn open(&self, identity: &Identity) -> DashboardSession {
        DashboardSession {
            gate: VisibilityGate::new(self.settings.clone()),
            access: AccessLevel::classify(identity),
            repository: self.repository.clone(),
            state: PageState::Loading,
        }
    }
}

/// Rows ready for download, with the name the file should be saved under.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub rows: Vec<FlatRow>,
}

pub struct DashboardSession {
    gate: VisibilityGate,
    access: AccessLevel,
    repository: Arc<dyn SubmissionRepository>,
    state: PageState,
}

impl DashboardSession {
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Run the activation: gate, fetch, initial stats. Only acts from `Loading`;
    /// `PrivateBlocked` and `Error` are final for the session.
    pub async fn load(&mut self) {
        if !matches!(self.state, PageState::Loading) {
            return;
        }

        let settings = self.gate.initialize().await;
        tracing::debug!(
            "Dashboard activation: access={:?}, public_data_enabled={}",
            self.access,
            self.gate.is_public_data_enabled()
        );
        if !self.access.may_view(settings) {
            tracing::info!("Dashboard data is private; skipping fetch for {:?}", self.access);
            self.state = PageState::PrivateBlocked;
            return;
        }

        let fetch = FetchTask::spawn(self.repository.clone());
        self.state = match fetch.join().await {
            Ok(submissions) => {
                tracing::info!("Loaded {} submissions", submissions.len());
                PageState::Ready(ReadyPage::new(submissions))
            }
            Err(e) => {
                tracing::error!("Error fetching submissions: {}", e);
                PageState::Error(e.to_string())
            }
        };
    }

    /// Re-filter and recompute stats. No effect outside `Ready`.
    pub fn apply_filter(&mut self, criteria: &FilterCriteria) {
        if let PageState::Ready(page) = &mut self.state {
            page.apply_filter(criteria);
            tracing::debug!(
                "Filter applied: {} of {} submissions",
                page.filtered.len(),
                page.all.len()
            );
        }
    }

    /// Flattened rows of the current filtered list, or `None` outside `Ready`.
    pub fn export(&self, today: NaiveDate) -> Option<CsvExport> {
        match &self.state {
            PageState::Ready(page) => Some(CsvExport {
                filename: export_filename(today),
                rows: flatten(&page.filtered),
            }),
            _ => None,
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::render(&self.state, self.gate.settings(), self.access)
    }
}

/// In-flight fetch, aborted if dropped before completion.
struct FetchTask {
    handle: JoinHandle<Result<Vec<Submission>, FetchError>>,
}

impl FetchTask {
    fn spawn(repository: Arc<dyn SubmissionRepository>) -> Self {
        let handle = tokio::spawn(async move { repository.fetch_all().await });
        Self { handle }
    }

    async fn join(mut self) -> Result<Vec<Submission>, FetchError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => Err(FetchError::Interrupted(e.to_string())),
        }
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!("Aborting in-flight submissions fetch");
            self.handle.abort();
        }
    }
}
