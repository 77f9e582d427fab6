// HTTP request handlers
use crate::application::dashboard_service::DashboardSession;
use crate::domain::access::Identity;
use crate::domain::dashboard::PageStatus;
use crate::domain::export::to_csv;
use crate::domain::filter::{DateRange, FilterCriteria};
use crate::infrastructure::chunked_csv::chunked_csv_response;
use crate::infrastructure::http_response::{accepts_brotli, csv_download_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Set by the identity-aware proxy in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub asset_type: Option<String>,
    pub agency_type: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterQuery {
    pub fn to_criteria(&self) -> Result<FilterCriteria, String> {
        let start = parse_date("startDate", self.start_date.as_deref())?;
        let end = parse_date("endDate", self.end_date.as_deref())?;

        let mut criteria = FilterCriteria::new().with_date_range(DateRange::from_dates(start, end));
        if let Some(asset_type) = &self.asset_type {
            criteria = criteria.with_asset_type(asset_type.as_str());
        }
        if let Some(agency_type) = &self.agency_type {
            criteria = criteria.with_agency_type(agency_type.as_str());
        }
        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.as_str());
        }
        Ok(criteria)
    }
}

fn parse_date(param: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid {}: expected YYYY-MM-DD, got '{}'", param, raw)),
    }
}

pub fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Identity {
        user_id: header(USER_ID_HEADER),
        role: header(USER_ROLE_HEADER),
    }
}

fn status_for(state: PageStatus) -> StatusCode {
    match state {
        PageStatus::Ready => StatusCode::OK,
        PageStatus::PrivateBlocked => StatusCode::FORBIDDEN,
        PageStatus::Error => StatusCode::BAD_GATEWAY,
        PageStatus::Loading => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Open, load, and filter a session for this request.
async fn activate(state: &AppState, headers: &HeaderMap, criteria: &FilterCriteria) -> DashboardSession {
    let identity = identity_from_headers(headers);
    let mut session = state.dashboard_service.open(&identity);
    session.load().await;
    session.apply_filter(criteria);
    tracing::debug!("Dashboard session settled in {:?}", session.state().status());
    session
}

async fn view_response(session: &DashboardSession, compress: bool) -> Response<Body> {
    let view = session.view();
    json_response(status_for(view.state), &view, compress).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard data for the current caller and filters
pub async fn dashboard(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let criteria = match query.to_criteria() {
        Ok(criteria) => criteria,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let session = activate(&state, &headers, &criteria).await;
    view_response(&session, accepts_brotli(&headers)).await
}

/// CSV download of the filtered submissions
pub async fn export_csv(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let criteria = match query.to_criteria() {
        Ok(criteria) => criteria,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let compress = accepts_brotli(&headers);
    let session = activate(&state, &headers, &criteria).await;

    match session.export(Utc::now().date_naive()) {
        Some(export) => {
            tracing::info!("Exporting {} submissions as {}", export.rows.len(), export.filename);
            if compress {
                csv_download_response(to_csv(&export.rows), &export.filename, true).await
            } else {
                chunked_csv_response(export.rows, &export.filename)
            }
        }
        None => view_response(&session, compress).await,
    }
}
