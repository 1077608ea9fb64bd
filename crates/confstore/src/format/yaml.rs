//! YAML via `serde_yaml`.

use super::{utf8, Document, Format};
use crate::error::FormatError;

/// The `yaml` / `yml` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Format for Yaml {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError> {
        let text = serde_yaml::to_string(document)?;
        // serde_yaml terminates its output; the store adds the final newline.
        Ok(text.trim_end_matches('\n').as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        Ok(serde_yaml::from_str(utf8(bytes)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_serializes_mapping_without_trailing_newline() {
        let bytes = Yaml.serialize(&json!({"name": "Patrick"})).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "name: Patrick");
    }

    #[test]
    fn test_yaml_parses_sequences_of_mappings() {
        let text = "cats:\n  - name: Jeremy\n    big: true\n  - name: Patrick\n    big: false\n";
        let doc = Yaml.deserialize(text.as_bytes()).unwrap();
        assert_eq!(
            doc,
            json!({"cats": [{"name": "Jeremy", "big": true}, {"name": "Patrick", "big": false}]})
        );
    }

    #[test]
    fn test_yaml_rejects_unbalanced_flow_mapping() {
        assert!(matches!(Yaml.deserialize(b"{ a: [1, 2"), Err(FormatError::Yaml(_))));
    }

    #[test]
    fn test_yaml_rejects_non_utf8_input() {
        assert!(matches!(
            Yaml.deserialize(&[0xc3, 0x28]),
            Err(FormatError::Encoding(_))
        ));
    }
}
