//! Implementations of the `confstore` subcommands.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.  Unknown extensions are reported as errors here, never
//! as a panic.  Only `init` may create a file; `check` and `get` read the
//! bytes once and parse them in memory.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use confstore::registry::extension;
use confstore::{store, Document, FormatRegistry};
use tracing::debug;

/// Outcome of `init`.
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExists,
}

/// Lists the registered extensions, one per line.
pub fn formats(registry: &FormatRegistry) -> String {
    registry.extensions().join("\n")
}

/// Parses `path` without creating it.
pub fn check(registry: &FormatRegistry, path: &Path) -> anyhow::Result<String> {
    read_document(registry, path)?;
    Ok("ok".to_string())
}

/// Creates `path` holding an empty table if it does not exist, otherwise
/// makes sure it parses.
pub fn init(registry: &FormatRegistry, path: &Path) -> anyhow::Result<InitOutcome> {
    let existed = path.exists();
    let mut document = Document::Object(serde_json::Map::new());
    store::try_load(registry, path, &mut document)
        .with_context(|| format!("could not initialise {}", path.display()))?;
    Ok(if existed {
        InitOutcome::AlreadyExists
    } else {
        InitOutcome::Created
    })
}

/// Looks up a dotted `key` in `path`.  Strings print as-is, everything else
/// as JSON.
pub fn get(registry: &FormatRegistry, path: &Path, key: &str) -> anyhow::Result<String> {
    let document = read_document(registry, path)?;
    let value = lookup(&document, key)
        .with_context(|| format!("key {key:?} not found in {}", path.display()))?;
    Ok(match value {
        Document::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other)?,
    })
}

/// Reads and parses `path` without ever writing it.
fn read_document(registry: &FormatRegistry, path: &Path) -> anyhow::Result<Document> {
    let text = path.to_string_lossy();
    let Some(format) = registry.for_path(&text) else {
        bail!(
            "unknown configuration format {:?} for {}",
            extension(&text),
            path.display()
        );
    };
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = format
        .deserialize(&bytes)
        .with_context(|| format!("failed to unmarshal {}", path.display()))?;
    debug!(path = %path.display(), "parsed document");
    Ok(document)
}

/// Walks `key` segment by segment.  Numeric segments index into arrays.
fn lookup<'d>(document: &'d Document, key: &str) -> Option<&'d Document> {
    if key.is_empty() {
        return Some(document);
    }
    key.split('.').try_fold(document, |current, segment| match current {
        Document::Object(map) => map.get(segment),
        Document::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
