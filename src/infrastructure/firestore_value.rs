// Firestore typed values and their decoding into the submission model
use crate::domain::submission::{Agency, Asset, Submission, SubmissionData};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

pub type Fields = HashMap<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub timestamp_value: Option<String>,
    #[serde(default)]
    pub boolean_value: Option<bool>,
    /// int64 arrives as a decimal string.
    #[serde(default)]
    pub integer_value: Option<String>,
    #[serde(default)]
    pub map_value: Option<MapValue>,
    #[serde(default)]
    pub array_value: Option<ArrayValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    /// Last segment of `projects/.../documents/<collection>/<id>`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// One element of a `runQuery` response stream.
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

impl Value {
    /// Scalar rendering used for free-text fields.
    pub fn as_text(&self) -> Option<String> {
        self.string_value
            .clone()
            .or_else(|| self.integer_value.clone())
            .or_else(|| self.boolean_value.map(|b| b.to_string()))
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp_value.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn as_map(&self) -> Option<&Fields> {
        self.map_value.as_ref().map(|m| &m.fields)
    }
}

fn text(fields: &Fields, key: &str) -> String {
    fields.get(key).and_then(Value::as_text).unwrap_or_default()
}

fn map<'a>(fields: &'a Fields, key: &str) -> Option<&'a Fields> {
    fields.get(key).and_then(Value::as_map)
}

fn agency(fields: Option<&Fields>) -> Agency {
    fields
        .map(|f| Agency {
            kind: text(f, "type"),
            name: text(f, "name"),
        })
        .unwrap_or_default()
}

fn asset(fields: Option<&Fields>) -> Asset {
    fields
        .map(|f| Asset {
            kind: text(f, "type"),
            details: text(f, "details"),
        })
        .unwrap_or_default()
}

/// Decode a submission document. `None` when the document has no usable timestamp.
pub fn decode_submission(document: &Document) -> Option<Submission> {
    let fields = &document.fields;
    let timestamp = fields.get("timestamp").and_then(Value::as_timestamp)?;

    let data = map(fields, "data")
        .map(|d| SubmissionData {
            agency: agency(map(d, "agency")),
            asset: asset(map(d, "asset")),
            description: text(d, "description"),
            location: d.get("location").and_then(Value::as_text),
        })
        .unwrap_or_default();

    let files = fields
        .get("files")
        .and_then(|v| v.array_value.as_ref())
        .map(|a| a.values.iter().filter_map(Value::as_text).collect())
        .unwrap_or_default();

    Some(Submission {
        id: document.id().to_string(),
        user_id: text(fields, "userId"),
        data,
        files,
        timestamp,
    })
}

/// `isPublicDataEnabled` of the settings document; missing means private.
pub fn decode_public_flag(document: &Document) -> bool {
    document
        .fields
        .get("isPublicDataEnabled")
        .and_then(|v| v.boolean_value)
        .unwrap_or(false)
}
