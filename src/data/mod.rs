//! Input records.
//!
//! Raw rows come from a row source (CSV text or host-decoded objects) and are
//! normalized into immutable [`Position`]s.

mod position;
mod row_source;

pub use position::{
    normalize_rows, Position, Row, FIELD_DEPARTMENT, FIELD_FULL_NAME, FIELD_JOB_TITLE,
    FIELD_PARENT_POSITION_ID, FIELD_POSITION_ID, FIELD_WORK_LOCATION,
};
pub use row_source::parse_csv;
