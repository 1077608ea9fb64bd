//! Loading and saving configuration values.
//!
//! [`load`] and [`save`] pick the format from the file extension through a
//! [`FormatRegistry`]; [`load_with`] and [`save_with`] take the format
//! explicitly and never consult a registry.
//!
//! # Unknown formats abort
//!
//! [`load`] and [`save`] **panic** when the path's extension has no
//! registered format (including a path without any extension).  That is a
//! bug at the call site, not a condition to recover from, and it is the only
//! error that does not come back as a [`StoreError`].  Use [`try_load`] /
//! [`try_save`] to get [`StoreError::UnknownFormat`] as a value instead.
//!
//! # Example
//!
//! ```rust
//! use confstore::{store, FormatRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Settings {
//!     age: u32,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("nested/settings.toml");
//! let registry = FormatRegistry::new();
//!
//! // First load creates the file from the current (default) value.
//! let mut settings = Settings::default();
//! store::load(&registry, &path, &mut settings).unwrap();
//! assert!(path.exists());
//!
//! settings.age = 42;
//! store::save(&registry, &path, &settings).unwrap();
//!
//! let mut reloaded = Settings::default();
//! store::load(&registry, &path, &mut reloaded).unwrap();
//! assert_eq!(reloaded, settings);
//! ```

use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::format::{from_document, merge, to_document, Format};
use crate::registry::{extension, FormatRegistry};

/// Reads `path` into `target`, creating the file from `target` if it cannot
/// be read.
///
/// # Panics
///
/// Panics when no format is registered for the path's extension.
///
/// # Errors
///
/// See [`load_with`].
pub fn load<P, T>(registry: &FormatRegistry, path: P, target: &mut T) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + DeserializeOwned,
{
    try_load(registry, path, target).or_else(abort_on_fatal)
}

/// Writes `value` to `path`.
///
/// # Panics
///
/// Panics when no format is registered for the path's extension.
///
/// # Errors
///
/// See [`save_with`].
pub fn save<P, T>(registry: &FormatRegistry, path: P, value: &T) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    try_save(registry, path, value).or_else(abort_on_fatal)
}

/// Like [`load`], but returns [`StoreError::UnknownFormat`] instead of
/// panicking.
pub fn try_load<P, T>(registry: &FormatRegistry, path: P, target: &mut T) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    let format = resolve(registry, path)?;
    load_with(path, target, format)
}

/// Like [`save`], but returns [`StoreError::UnknownFormat`] instead of
/// panicking.
pub fn try_save<P, T>(registry: &FormatRegistry, path: P, value: &T) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let format = resolve(registry, path)?;
    save_with(path, value, format)
}

/// Loads a `T` from `path`, starting from `T::default()`.  A missing file is
/// created from the default.
///
/// # Panics
///
/// Panics when no format is registered for the path's extension.
pub fn load_or_default<P, T>(registry: &FormatRegistry, path: P) -> Result<T, StoreError>
where
    P: AsRef<Path>,
    T: Serialize + DeserializeOwned + Default,
{
    let mut value = T::default();
    load(registry, path, &mut value)?;
    Ok(value)
}

/// Reads `path` with `format` into `target`.
///
/// The file's content is laid over the current value of `target`: tables
/// are merged key by key, so fields the file does not mention keep the value
/// they had.  Arrays and scalars in the file replace the current ones.
///
/// Any read failure (not only "not found") is treated as "no configuration
/// yet": `target` is saved to `path` with the same format and left as it
/// was.
///
/// # Errors
///
/// - [`StoreError::CreateDefault`] if the file could not be read and the
///   default could not be written either.
/// - [`StoreError::Unmarshal`] if the content does not parse or does not fit
///   `T`.  `target` is left untouched.
pub fn load_with<P, T>(path: P, target: &mut T, format: &dyn Format) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + DeserializeOwned,
{
    let path = path.as_ref();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(read) => {
            debug!(path = %path.display(), error = %read, "config unreadable, writing default");
            return match save_with(path, &*target, format) {
                Ok(()) => {
                    info!(path = %path.display(), "created config file from defaults");
                    Ok(())
                }
                Err(save) => {
                    warn!(path = %path.display(), error = %save, "could not create default config");
                    Err(StoreError::CreateDefault {
                        path: path.to_path_buf(),
                        read,
                        source: Box::new(save),
                    })
                }
            };
        }
    };

    let unmarshal = |source| StoreError::Unmarshal {
        path: path.to_path_buf(),
        source,
    };
    let document = format.deserialize(&bytes).map_err(unmarshal)?;
    let mut merged = to_document(&*target).map_err(unmarshal)?;
    merge(&mut merged, document);
    *target = from_document(merged).map_err(unmarshal)?;

    debug!(path = %path.display(), bytes = bytes.len(), "loaded config");
    Ok(())
}

/// Writes `value` to `path` with `format`, followed by a newline.
///
/// Missing parent directories are created.  An existing file is truncated
/// and overwritten in place; there is no atomic rename.
///
/// # Errors
///
/// - [`StoreError::Marshal`] if `value` cannot be serialized.
/// - [`StoreError::CreateDir`] if a parent directory cannot be created.
/// - [`StoreError::Write`] if the file cannot be written.
pub fn save_with<P, T>(path: P, value: &T, format: &dyn Format) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();

    let marshal = |source| StoreError::Marshal {
        path: path.to_path_buf(),
        source,
    };
    let document = to_document(value).map_err(marshal)?;
    let mut bytes = format.serialize(&document).map_err(marshal)?;
    bytes.push(b'\n');

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dirs(dir).map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    write_file(path, &bytes).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "saved config");
    Ok(())
}

fn resolve<'r>(registry: &'r FormatRegistry, path: &Path) -> Result<&'r dyn Format, StoreError> {
    let text = path.to_string_lossy();
    let ext = extension(&text);
    registry.get(ext).ok_or_else(|| StoreError::UnknownFormat {
        path: path.to_path_buf(),
        extension: ext.to_string(),
    })
}

/// Panics on the unknown-format error, hands everything else back.
fn abort_on_fatal(err: StoreError) -> Result<(), StoreError> {
    if err.is_fatal() {
        panic!("{err}");
    }
    Err(err)
}

#[cfg(unix)]
fn create_dirs(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
}

#[cfg(not(unix))]
fn create_dirs(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
