use crate::ipc::error::err;
use crate::model::AssignmentStatus;
use crate::tracker::TrackerError;
use chrono::NaiveDate;

pub fn param_str<'a>(params: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Reference date for banding and reminder scans. The daemon runs on the
/// user's machine, so the local calendar date is the right "today".
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Dates cross the wire as ISO 8601 calendar dates.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Reads an optional status param. Distinguishes "absent" (Ok(None)) from
/// "present but not one of the three known values" (Err).
pub fn parse_status(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<AssignmentStatus>, String> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| format!("invalid {key}")),
    }
}

pub fn tracker_err(id: &str, e: &TrackerError) -> serde_json::Value {
    let code = match e {
        TrackerError::EmptyTitle => "bad_params",
        TrackerError::CourseNotFound(_) | TrackerError::AssignmentNotFound(_) => "not_found",
    };
    err(id, code, e.to_string(), None)
}
