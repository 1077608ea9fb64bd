//! Serialization formats.
//!
//! A [`Format`] converts between bytes and a [`Document`], the format-neutral
//! value tree.  Caller types are turned into a document (and back) with
//! `serde_json`'s value conversion, which keeps the trait object safe so a
//! registry can hold formats of different concrete types side by side.
//!
//! Built-in formats:
//!
//! | Type         | Extensions      | Crate        |
//! |--------------|-----------------|--------------|
//! | [`Json`]     | `json`          | `serde_json` |
//! | [`Yaml`]     | `yaml`, `yml`   | `serde_yaml` |
//! | [`Toml`]     | `toml`          | `toml`       |
//!
//! Anything else can be plugged in by implementing [`Format`] or by handing a
//! pair of closures to [`FnFormat`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FormatError;

pub mod json;
pub mod toml;
pub mod yaml;

pub use self::json::Json;
pub use self::toml::Toml;
pub use self::yaml::Yaml;

/// Format-neutral value tree exchanged with a [`Format`].
pub type Document = serde_json::Value;

/// A configuration file format: one serializer and one deserializer.
#[cfg_attr(test, mockall::automock)]
pub trait Format: Send + Sync {
    /// Renders `document` to bytes.  The store appends the trailing newline.
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError>;

    /// Parses `bytes` into a document.
    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError>;
}

/// Adapts a pair of closures into a [`Format`].
///
/// ```rust
/// use confstore::format::{Document, FnFormat, Format};
/// use confstore::FormatError;
///
/// let upper = FnFormat::new(
///     |doc: &Document| Ok(doc.to_string().to_uppercase().into_bytes()),
///     |_: &[u8]| Err(FormatError::custom("write-only format")),
/// );
/// assert_eq!(upper.serialize(&Document::from("abc")).unwrap(), b"\"ABC\"");
/// assert!(upper.deserialize(b"").is_err());
/// ```
pub struct FnFormat<S, D> {
    serialize: S,
    deserialize: D,
}

impl<S, D> FnFormat<S, D>
where
    S: Fn(&Document) -> Result<Vec<u8>, FormatError> + Send + Sync,
    D: Fn(&[u8]) -> Result<Document, FormatError> + Send + Sync,
{
    pub fn new(serialize: S, deserialize: D) -> Self {
        Self {
            serialize,
            deserialize,
        }
    }
}

impl<S, D> Format for FnFormat<S, D>
where
    S: Fn(&Document) -> Result<Vec<u8>, FormatError> + Send + Sync,
    D: Fn(&[u8]) -> Result<Document, FormatError> + Send + Sync,
{
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError> {
        (self.serialize)(document)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        (self.deserialize)(bytes)
    }
}

/// Converts a caller value into a document.
pub(crate) fn to_document<T>(value: &T) -> Result<Document, FormatError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(FormatError::Document)
}

/// Converts a document into the caller's type.
pub(crate) fn from_document<T>(document: Document) -> Result<T, FormatError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(document).map_err(FormatError::Document)
}

/// Lays `overlay` over `base`: tables are merged key by key, any other value
/// in `overlay` replaces the one in `base`.
pub(crate) fn merge(base: &mut Document, overlay: Document) {
    match (base, overlay) {
        (Document::Object(base), Document::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Decodes `bytes` as UTF-8 for the text formats.
pub(crate) fn utf8(bytes: &[u8]) -> Result<&str, FormatError> {
    Ok(std::str::from_utf8(bytes)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Window {
        width: u32,
        title: String,
    }

    #[test]
    fn test_value_to_document_and_back() {
        let window = Window {
            width: 800,
            title: "main".to_string(),
        };

        let doc = to_document(&window).unwrap();
        assert_eq!(doc, json!({"width": 800, "title": "main"}));

        let restored: Window = from_document(doc).unwrap();
        assert_eq!(restored, window);
    }

    #[test]
    fn test_from_document_with_wrong_shape_is_document_error() {
        let result: Result<Window, _> = from_document(json!({"width": "wide"}));
        assert!(matches!(result, Err(FormatError::Document(_))));
    }

    #[test]
    fn test_merge_keeps_base_keys_missing_from_overlay() {
        let mut base = json!({"age": 1, "name": "kept", "net": {"port": 80, "host": "a"}});

        merge(&mut base, json!({"age": 7, "net": {"port": 8080}}));

        assert_eq!(
            base,
            json!({"age": 7, "name": "kept", "net": {"port": 8080, "host": "a"}})
        );
    }

    #[test]
    fn test_merge_replaces_arrays_and_scalars_whole() {
        let mut base = json!({"ports": [1, 2, 3], "mode": {"fast": true}});

        merge(&mut base, json!({"ports": [9], "mode": "slow"}));

        assert_eq!(base, json!({"ports": [9], "mode": "slow"}));
    }

    #[test]
    fn test_merge_over_non_table_base_takes_overlay() {
        let mut base = Document::Null;
        merge(&mut base, json!({"a": 1}));
        assert_eq!(base, json!({"a": 1}));
    }

    #[test]
    fn test_fn_format_delegates_to_closures() {
        let format = FnFormat::new(
            |_: &Document| Ok(b"fixed".to_vec()),
            |bytes: &[u8]| Ok(Document::from(bytes.len())),
        );

        assert_eq!(format.serialize(&Document::Null).unwrap(), b"fixed");
        assert_eq!(format.deserialize(b"abc").unwrap(), json!(3));
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert!(matches!(utf8(&[0xff, 0xfe]), Err(FormatError::Encoding(_))));
        assert_eq!(utf8(b"ok").unwrap(), "ok");
    }
}
