/// Backend record identifiers are opaque strings (stringified document ids).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
