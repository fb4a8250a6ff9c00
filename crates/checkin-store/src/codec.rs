use checkin_core::error::{CheckinError, Result};
use checkin_core::types::CheckinRecord;

/// Serialize the whole collection as one JSON array.
pub fn encode_collection(records: &[CheckinRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Parse a persisted blob back into a collection.
///
/// Anything that is not a JSON array of records is reported as corrupt.
pub fn decode_collection(blob: &str) -> Result<Vec<CheckinRecord>> {
    serde_json::from_str(blob).map_err(|e| CheckinError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkin_core::types::NewCheckin;

    fn record(id: &str, note: &str) -> CheckinRecord {
        CheckinRecord::from_input(
            id,
            NewCheckin::new(
                10.8231,
                106.6297,
                note,
                "2024-01-01T08:00:00.000Z",
                1704096000000,
            ),
        )
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode_collection(&[]).unwrap(), "[]");
    }

    #[test]
    fn roundtrip_preserves_order() {
        let records = vec![record("b", "second"), record("a", "first")];
        let blob = encode_collection(&records).unwrap();
        let decoded = decode_collection(&blob).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn decodes_blob_written_by_other_clients() {
        let blob = r#"[{"id":"1704096000000","lat":10.8231,"lng":106.6297,"note":"Office","time":"2024-01-01T08:00:00.000Z","timestamp":1704096000000}]"#;
        let decoded = decode_collection(blob).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "1704096000000");
        assert_eq!(decoded[0].note, "Office");
        assert_eq!(decoded[0].timestamp, 1704096000000);
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = decode_collection("{not json").unwrap_err();
        assert!(matches!(err, CheckinError::Corrupt(_)));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let err = decode_collection(r#"{"id":"1"}"#).unwrap_err();
        assert!(matches!(err, CheckinError::Corrupt(_)));

        let err = decode_collection(r#"[{"id":"1","lat":"north"}]"#).unwrap_err();
        assert!(matches!(err, CheckinError::Corrupt(_)));
    }
}
