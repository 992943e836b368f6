//! Driver-neutral result rows
//!
//! Handles hand rows back as JSON objects keyed by column label. Stores decode
//! them into their typed DTOs with serde, so a fake handle can serve rows built
//! from plain values.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style column setter
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.0.get(column).and_then(Value::as_i64)
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a row from any serializable struct; non-object values yield an empty row
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Ok(Self::new()),
        }
    }

    /// Decode this row into a typed record
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i64,
        name: String,
        remark: Option<String>,
    }

    #[test]
    fn decode_maps_columns_to_fields() {
        let row = Row::new()
            .with("id", 7)
            .with("name", "spring promo")
            .with("remark", Value::Null);

        let sample: Sample = row.decode().unwrap();
        assert_eq!(
            sample,
            Sample {
                id: 7,
                name: "spring promo".to_string(),
                remark: None
            }
        );
    }

    #[test]
    fn encode_then_decode_preserves_struct() {
        let sample = Sample {
            id: 3,
            name: "x".to_string(),
            remark: Some("r".to_string()),
        };
        let row = Row::encode(&sample).unwrap();
        assert_eq!(row.get_i64("id"), Some(3));
        assert_eq!(row.decode::<Sample>().unwrap(), sample);
    }

    #[test]
    fn decode_reports_missing_columns() {
        let row = Row::new().with("id", 1);
        assert!(row.decode::<Sample>().is_err());
    }
}
