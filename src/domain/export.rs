// CSV export of the filtered submission list
use chrono::NaiveDate;

use super::submission::Submission;

pub const CSV_HEADER: [&str; 8] = [
    "Agency Type",
    "Agency Name",
    "Asset Type",
    "Asset Details",
    "Description",
    "Location",
    "Files",
    "Submitted At",
];

const FILE_SEPARATOR: &str = "; ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One submission flattened into export columns, in `CSV_HEADER` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub agency_type: String,
    pub agency_name: String,
    pub asset_type: String,
    pub asset_details: String,
    pub description: String,
    pub location: String,
    pub files: String,
    pub submitted_at: String,
}

impl FlatRow {
    pub fn from_submission(submission: &Submission) -> Self {
        let data = &submission.data;
        Self {
            agency_type: data.agency.kind.clone(),
            agency_name: data.agency.name.clone(),
            asset_type: data.asset.kind.clone(),
            asset_details: data.asset.details.clone(),
            description: data.description.clone(),
            location: data.location.clone().unwrap_or_default(),
            files: submission.files.join(FILE_SEPARATOR),
            submitted_at: submission.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    fn fields(&self) -> [&str; 8] {
        [
            self.agency_type.as_str(),
            self.agency_name.as_str(),
            self.asset_type.as_str(),
            self.asset_details.as_str(),
            self.description.as_str(),
            self.location.as_str(),
            self.files.as_str(),
            self.submitted_at.as_str(),
        ]
    }
}

pub fn flatten(list: &[Submission]) -> Vec<FlatRow> {
    list.iter().map(FlatRow::from_submission).collect()
}

pub fn header_line() -> String {
    encode_line(CSV_HEADER)
}

pub fn record_line(row: &FlatRow) -> String {
    encode_line(row.fields())
}

pub fn to_csv(rows: &[FlatRow]) -> String {
    let mut csv = header_line();
    for row in rows {
        csv.push_str(&record_line(row));
    }
    csv
}

/// `submissions-export-YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("submissions-export-{}.csv", date.format("%Y-%m-%d"))
}

fn encode_line(fields: [&str; 8]) -> String {
    let mut line = fields.map(escape_field).join(",");
    line.push('\n');
    line
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
