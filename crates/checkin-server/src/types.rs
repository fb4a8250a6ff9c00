use serde::{Deserialize, Serialize};

use checkin_core::types::{CheckinRecord, NewCheckin};

// --- Capture ---

#[derive(Debug, Deserialize)]
pub struct CreateCheckinRequest {
    pub lat: f64,
    pub lng: f64,
    pub note: String,
    /// Capture time; stamped by the server when absent.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl CreateCheckinRequest {
    /// Uses the client's capture time only when both `time` and `timestamp` are given.
    pub fn into_new_checkin(self) -> NewCheckin {
        match (self.time, self.timestamp) {
            (Some(time), Some(timestamp)) => {
                NewCheckin::new(self.lat, self.lng, self.note, time, timestamp)
            }
            _ => NewCheckin::at_now(self.lat, self.lng, self.note),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCheckinResponse {
    pub success: bool,
    pub checkin: CheckinRecord,
}

// --- History ---

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCheckinResponse {
    pub success: bool,
    /// `false` when the id was not present.
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCheckinsResponse {
    pub success: bool,
}
