//! Position records and row normalization.
//!
//! A row is a plain field-name → string mapping as produced by the row source.
//! Positions are the immutable, trimmed form of those rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// One decoded data row: field name → raw string value.
pub type Row = HashMap<String, String>;

/// Column holding the unique position identifier.
pub const FIELD_POSITION_ID: &str = "PositionID";
/// Column holding the parent's position identifier (empty for the root).
pub const FIELD_PARENT_POSITION_ID: &str = "ParentPositionID";
pub const FIELD_JOB_TITLE: &str = "JobTitle";
pub const FIELD_FULL_NAME: &str = "FullName";
pub const FIELD_DEPARTMENT: &str = "Department";
pub const FIELD_WORK_LOCATION: &str = "WorkLocation";

const NO_TITLE: &str = "No Title";
const NO_NAME: &str = "No Name";
const NO_DEPARTMENT: &str = "No Department";
const NO_LOCATION: &str = "No Location";

/// One organizational role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub position_id: String,
    pub parent_position_id: Option<String>,
    pub job_title: Option<String>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub work_location: Option<String>,
}

impl Position {
    /// Create a position with only identity fields set.
    pub fn new(position_id: impl Into<String>, parent_position_id: Option<&str>) -> Self {
        Self {
            position_id: position_id.into(),
            parent_position_id: parent_position_id.and_then(non_empty),
            job_title: None,
            full_name: None,
            department: None,
            work_location: None,
        }
    }

    /// Normalize a raw row.
    ///
    /// `row_index` is only used for error reporting (zero-based data row).
    pub fn from_row(row_index: usize, row: &Row) -> Result<Self> {
        let position_id = row
            .get(FIELD_POSITION_ID)
            .and_then(|value| non_empty(value))
            .ok_or_else(|| ChartError::DataFormat {
                row: row_index,
                message: format!("missing required field `{FIELD_POSITION_ID}`"),
            })?;

        // The parent column must exist even though the root leaves it empty.
        let parent = row
            .get(FIELD_PARENT_POSITION_ID)
            .ok_or_else(|| ChartError::DataFormat {
                row: row_index,
                message: format!("missing required field `{FIELD_PARENT_POSITION_ID}`"),
            })?;

        let optional = |field: &str| row.get(field).and_then(|value| non_empty(value));

        Ok(Self {
            position_id,
            parent_position_id: non_empty(parent),
            job_title: optional(FIELD_JOB_TITLE),
            full_name: optional(FIELD_FULL_NAME),
            department: optional(FIELD_DEPARTMENT),
            work_location: optional(FIELD_WORK_LOCATION),
        })
    }

    /// Builder-style setter for the title and name labels.
    pub fn with_labels(mut self, job_title: &str, full_name: &str) -> Self {
        self.job_title = non_empty(job_title);
        self.full_name = non_empty(full_name);
        self
    }

    /// Builder-style setter for the detail overlay fields.
    pub fn with_details(mut self, department: &str, work_location: &str) -> Self {
        self.department = non_empty(department);
        self.work_location = non_empty(work_location);
        self
    }

    /// Parent identifier, if this is not a root candidate.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_position_id.as_deref()
    }

    pub fn title(&self) -> &str {
        self.job_title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(NO_NAME)
    }

    pub fn department(&self) -> &str {
        self.department.as_deref().unwrap_or(NO_DEPARTMENT)
    }

    pub fn work_location(&self) -> &str {
        self.work_location.as_deref().unwrap_or(NO_LOCATION)
    }

    /// Two-line label shown on the node box.
    pub fn label(&self) -> String {
        format!("{}\n{}", self.title(), self.name())
    }
}

/// Normalize every row, failing on the first malformed one.
pub fn normalize_rows<I>(rows: I) -> Result<Vec<Position>>
where
    I: IntoIterator<Item = Row>,
{
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| Position::from_row(index, &row))
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
