use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CheckinError, Result};

/// A persisted check-in: a note captured at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinRecord {
    /// Unique identity key, assigned once at creation.
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Trimmed, non-empty note text.
    pub note: String,
    /// ISO-8601 capture time.
    pub time: String,
    /// Capture time as epoch milliseconds.
    pub timestamp: i64,
}

impl CheckinRecord {
    /// Build a record from an already validated input.
    pub fn from_input(id: impl Into<String>, input: NewCheckin) -> Self {
        Self {
            id: id.into(),
            lat: input.lat,
            lng: input.lng,
            note: input.note,
            time: input.time,
            timestamp: input.timestamp,
        }
    }
}

/// Input to `create`: everything but the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCheckin {
    pub lat: f64,
    pub lng: f64,
    pub note: String,
    pub time: String,
    pub timestamp: i64,
}

impl NewCheckin {
    pub fn new(
        lat: f64,
        lng: f64,
        note: impl Into<String>,
        time: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            lat,
            lng,
            note: note.into(),
            time: time.into(),
            timestamp,
        }
    }

    /// Stamp a check-in with the given capture instant.
    pub fn at(lat: f64, lng: f64, note: impl Into<String>, when: DateTime<Utc>) -> Self {
        Self::new(
            lat,
            lng,
            note,
            when.to_rfc3339_opts(SecondsFormat::Millis, true),
            when.timestamp_millis(),
        )
    }

    /// Stamp a check-in with the current time.
    pub fn at_now(lat: f64, lng: f64, note: impl Into<String>) -> Self {
        Self::at(lat, lng, note, Utc::now())
    }

    /// Check the input and return it with the note trimmed.
    ///
    /// `time` must be RFC 3339 and name the same millisecond as `timestamp`.
    pub fn validate(self) -> Result<Self> {
        let note = self.note.trim();
        if note.is_empty() {
            return Err(CheckinError::InvalidInput("note must not be empty".into()));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(CheckinError::InvalidInput(format!(
                "latitude out of range: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(CheckinError::InvalidInput(format!(
                "longitude out of range: {}",
                self.lng
            )));
        }
        let captured = DateTime::parse_from_rfc3339(&self.time).map_err(|e| {
            CheckinError::InvalidInput(format!("time is not ISO-8601 ({e}): {}", self.time))
        })?;
        if captured.timestamp_millis() != self.timestamp {
            return Err(CheckinError::InvalidInput(format!(
                "time {} does not match timestamp {}",
                self.time, self.timestamp
            )));
        }
        let note = note.to_owned();
        Ok(Self { note, ..self })
    }
}

/// Generate a fresh, collision-resistant check-in id.
pub fn new_checkin_id() -> String {
    Uuid::new_v4().to_string()
}

/// A map pin derived from a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub description: String,
}

impl MapMarker {
    pub fn from_record(record: &CheckinRecord) -> Self {
        Self {
            id: record.id.clone(),
            lat: record.lat,
            lng: record.lng,
            title: record.note.clone(),
            description: record.time.clone(),
        }
    }
}

/// Project a collection onto map markers, preserving order.
pub fn markers(records: &[CheckinRecord]) -> Vec<MapMarker> {
    records.iter().map(MapMarker::from_record).collect()
}
