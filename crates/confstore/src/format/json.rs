//! JSON via `serde_json`, pretty printed.

use super::{Document, Format};
use crate::error::FormatError;

/// The `json` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec_pretty(document).map_err(FormatError::Json)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        serde_json::from_slice(bytes).map_err(FormatError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_output_is_pretty_printed() {
        let bytes = Json.serialize(&json!({"age": 42})).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\n  \"age\": 42\n}");
    }

    #[test]
    fn test_json_parses_nested_values() {
        let doc = Json
            .deserialize(br#"{"cats": [{"name": "Rudolph", "big": true}]}"#)
            .unwrap();
        assert_eq!(doc["cats"][0]["name"], "Rudolph");
        assert_eq!(doc["cats"][0]["big"], true);
    }

    #[test]
    fn test_json_rejects_malformed_input() {
        assert!(matches!(Json.deserialize(b"invalid"), Err(FormatError::Json(_))));
    }
}
