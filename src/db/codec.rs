//! Field encodings for table columns
//!
//! List-valued columns are stored as JSON arrays inside a single CSV field.
//! An empty list is written as `[]` so it never reads back as an absent field.

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

use crate::constants::TIMESTAMP_FORMAT;

/// `%Y-%m-%d %H:%M` timestamps (seconds are accepted on read)
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::constants::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
    }
}

/// JSON-array encoding for `likes` and `comments`
pub mod json_list {
    use serde::{de::DeserializeOwned, ser, Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<T, S>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        let encoded = serde_json::to_string(items).map_err(ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        super::decode_list(raw.as_deref()).map_err(serde::de::Error::custom)
    }
}

/// Decode a JSON-array field; blank or absent means an empty list
pub fn decode_list<T: serde::de::DeserializeOwned>(raw: Option<&str>) -> Result<Vec<T>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text),
    }
}

/// Parse a stored timestamp
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Boolean column tolerant of the spellings other tools write
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean: {raw:?}")))
}

/// Loose boolean parsing shared by table cells and form fields; blank is false
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Some(false),
        "true" | "1" | "yes" | "on" => Some(true),
        _ => None,
    }
}
