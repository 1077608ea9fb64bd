//! TOML via the `toml` crate.
//!
//! TOML is narrower than the document model, so documents are converted
//! explicitly in both directions:
//!
//! - the top level must be a table,
//! - `null` table entries are left out (that is how an `Option::None` field
//!   is written), a `null` inside an array is rejected,
//! - unsigned integers above `i64::MAX` are rejected,
//! - datetimes are read back as their RFC 3339 string.

use super::{utf8, Document, Format};
use crate::error::FormatError;

/// The `toml` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Format for Toml {
    fn serialize(&self, document: &Document) -> Result<Vec<u8>, FormatError> {
        let table = match document {
            Document::Object(map) => table_from_document(map)?,
            other => {
                return Err(FormatError::Unsupported(format!(
                    "toml top level must be a table, got {}",
                    kind(other)
                )))
            }
        };
        let text = toml::to_string_pretty(&table)?;
        Ok(text.trim_end_matches('\n').as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        let table: toml::Table = toml::from_str(utf8(bytes)?)?;
        document_from_table(table)
    }
}

fn table_from_document(
    map: &serde_json::Map<String, Document>,
) -> Result<toml::Table, FormatError> {
    let mut table = toml::Table::new();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        table.insert(key.clone(), value_from_document(value)?);
    }
    Ok(table)
}

fn value_from_document(value: &Document) -> Result<toml::Value, FormatError> {
    Ok(match value {
        Document::Null => {
            return Err(FormatError::Unsupported(
                "toml cannot represent null inside an array".to_string(),
            ))
        }
        Document::Bool(b) => toml::Value::Boolean(*b),
        Document::Number(n) => {
            if let Some(i) = n.as_i64() {
                toml::Value::Integer(i)
            } else if let Some(f) = n.as_f64().filter(|_| !n.is_u64()) {
                toml::Value::Float(f)
            } else {
                return Err(FormatError::Unsupported(format!(
                    "integer {n} is out of range for toml"
                )));
            }
        }
        Document::String(s) => toml::Value::String(s.clone()),
        Document::Array(items) => toml::Value::Array(
            items
                .iter()
                .map(value_from_document)
                .collect::<Result<_, _>>()?,
        ),
        Document::Object(map) => toml::Value::Table(table_from_document(map)?),
    })
}

fn document_from_table(table: toml::Table) -> Result<Document, FormatError> {
    let mut map = serde_json::Map::with_capacity(table.len());
    for (key, value) in table {
        map.insert(key, document_from_value(value)?);
    }
    Ok(Document::Object(map))
}

fn document_from_value(value: toml::Value) -> Result<Document, FormatError> {
    Ok(match value {
        toml::Value::String(s) => Document::String(s),
        toml::Value::Integer(i) => Document::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Document::Number)
            .ok_or_else(|| FormatError::Unsupported(format!("float {f} has no document form")))?,
        toml::Value::Boolean(b) => Document::Bool(b),
        toml::Value::Datetime(dt) => Document::String(dt.to_string()),
        toml::Value::Array(items) => Document::Array(
            items
                .into_iter()
                .map(document_from_value)
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => document_from_table(table)?,
    })
}

fn kind(value: &Document) -> &'static str {
    match value {
        Document::Null => "null",
        Document::Bool(_) => "a boolean",
        Document::Number(_) => "a number",
        Document::String(_) => "a string",
        Document::Array(_) => "an array",
        Document::Object(_) => "a table",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
