//! Extension-to-format registry.
//!
//! The registry is an ordinary value owned by the application: build it once
//! at startup, register any custom formats, then pass it by reference to the
//! [`crate::store`] functions.  Registering needs `&mut self`, so a registry
//! cannot be mutated while another thread is reading it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::FormatError;
use crate::format::{Document, FnFormat, Format, Json, Toml, Yaml};

/// Maps file extensions to [`Format`]s.
///
/// [`FormatRegistry::new`] (and `Default`) starts with `json`, `yaml`, `yml`
/// and `toml`; [`FormatRegistry::empty`] starts with nothing.
///
/// ```rust
/// use confstore::{FormatRegistry, format::Json};
///
/// let mut registry = FormatRegistry::new();
/// assert!(registry.contains("yml"));
///
/// registry.register("jsonc", Json);
/// assert!(registry.contains("jsonc"));
/// ```
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn Format>>,
}

impl FormatRegistry {
    /// Creates a registry holding the built-in formats.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("json", Json);
        registry.register("yaml", Yaml);
        registry.register("yml", Yaml);
        registry.register("toml", Toml);
        registry
    }

    /// Creates a registry with no formats at all.
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Registers `format` for `extension`, replacing any previous entry.
    ///
    /// The extension is matched exactly (case-sensitive, without the dot).
    pub fn register<F>(&mut self, extension: impl Into<String>, format: F)
    where
        F: Format + 'static,
    {
        self.register_shared(extension, Arc::new(format));
    }

    /// Registers an already shared format, e.g. one format under several
    /// extensions.
    pub fn register_shared(&mut self, extension: impl Into<String>, format: Arc<dyn Format>) {
        let extension = extension.into();
        if self.formats.insert(extension.clone(), format).is_some() {
            debug!(extension = %extension, "replaced registered format");
        } else {
            debug!(extension = %extension, "registered format");
        }
    }

    /// Registers a format made of a serialize and a deserialize closure.
    pub fn register_fn<S, D>(&mut self, extension: impl Into<String>, serialize: S, deserialize: D)
    where
        S: Fn(&Document) -> Result<Vec<u8>, FormatError> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Document, FormatError> + Send + Sync + 'static,
    {
        self.register(extension, FnFormat::new(serialize, deserialize));
    }

    /// Looks up the format for `extension`.
    pub fn get(&self, extension: &str) -> Option<&dyn Format> {
        self.formats.get(extension).map(|f| f.as_ref())
    }

    /// Looks up the format for the extension of `path`.
    pub fn for_path(&self, path: &str) -> Option<&dyn Format> {
        self.get(extension(path))
    }

    /// Whether a format is registered for `extension`.
    pub fn contains(&self, extension: &str) -> bool {
        self.formats.contains_key(extension)
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.formats.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether no format is registered at all.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Returns everything after the last `.` in `path`, or `""` when there is
/// none.
///
/// The whole path text is scanned, not just the file name:
///
/// ```rust
/// use confstore::registry::extension;
///
/// assert_eq!(extension("settings/app.toml"), "toml");
/// assert_eq!(extension("archive.tar.gz"), "gz");
/// assert_eq!(extension("settings"), "");
/// assert_eq!(extension("conf.d/settings"), "d/settings");
/// ```
pub fn extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(i) => &path[i + 1..],
        None => "",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
