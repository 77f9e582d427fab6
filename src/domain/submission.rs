// Submission domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Agency {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Asset {
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    pub agency: Agency,
    pub asset: Asset,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A record submitted through the intake flow.
///
/// Decoded once at the store boundary; absent nested strings arrive here as
/// empty strings, so nothing downstream has to deal with missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub data: SubmissionData,
    pub files: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Submission {
    pub fn asset_type(&self) -> &str {
        &self.data.asset.kind
    }

    pub fn agency_type(&self) -> &str {
        &self.data.agency.kind
    }
}
