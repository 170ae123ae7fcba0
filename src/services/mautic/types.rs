//! Mautic REST payloads.
//!
//! Mautic is a PHP application: keyed collections come back as JSON objects, but an
//! empty collection is serialized as `[]`, and `total` is sometimes a number and
//! sometimes a numeric string. The deserializers below accept both shapes.
use chrono::{DateTime, FixedOffset};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One audience segment as returned by `GET /api/segments`.
///
/// Mautic writes `null` for unset fields; those decode to the field's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(default)]
    pub date_added: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub date_modified: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_by_user: Option<String>,
    #[serde(default)]
    pub modified_by: Option<i64>,
    #[serde(default)]
    pub modified_by_user: Option<String>,
    // Opaque: passed through, never interpreted
    #[serde(default)]
    pub description: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_global: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_preference_center: bool,
}

/// `{ total, lists: { "<key>": Segment } }`
#[derive(Debug, Default, Deserialize)]
pub struct SegmentPage {
    #[serde(default, deserialize_with = "deserialize_total")]
    pub total: u64,
    #[serde(default, deserialize_with = "deserialize_keyed_values")]
    pub lists: Vec<Segment>,
}

/// `{ total, contacts: { "<contact id>": { ...attributes } } }`
///
/// Only the contact ids are kept.
#[derive(Debug, Default, Deserialize)]
pub struct ContactSearch {
    #[serde(default, deserialize_with = "deserialize_total")]
    pub total: u64,
    #[serde(default, deserialize_with = "deserialize_contact_ids")]
    pub contacts: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Number(u64),
    Text(String),
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Total>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Total::Number(n)) => Ok(n),
        Some(Total::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Total::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid total: {s:?}"))),
    }
}

/// Entries of a keyed collection, `(key, value)`. The array form has no keys.
fn collection_entries<'de, D>(deserializer: D) -> Result<Vec<(Option<String>, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Value::Object(map)) => Ok(map.into_iter().map(|(k, v)| (Some(k), v)).collect()),
        Some(Value::Array(list)) => Ok(list.into_iter().map(|v| (None, v)).collect()),
        Some(other) => Err(de::Error::custom(format!(
            "expected an object or an array, found {other}"
        ))),
    }
}

fn deserialize_keyed_values<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    collection_entries(deserializer)?
        .into_iter()
        .enumerate()
        .map(|(index, (key, value))| {
            T::deserialize(value).map_err(|e| match key {
                Some(key) => <D::Error as de::Error>::custom(format!("entry {key:?}: {e}")),
                None => <D::Error as de::Error>::custom(format!("entry #{index}: {e}")),
            })
        })
        .collect()
}

fn deserialize_contact_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(collection_entries(deserializer)?
        .into_iter()
        .filter_map(|(key, contact)| match key {
            Some(key) => Some(key),
            // Array form only carries ids inside the records
            None => match contact.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
        })
        .collect())
}

/// Decode every top-level JSON value in `body`. End of input is the normal stop
/// condition, so an empty body yields an empty list.
pub fn decode_stream<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, serde_json::Error> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<T>()
        .collect()
}
