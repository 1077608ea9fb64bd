//! # confstore
//!
//! Load and save configuration values as JSON, YAML or TOML files, choosing
//! the format from the file extension.
//!
//! - **`registry`** – [`FormatRegistry`], the extension-to-format map.  It
//!   starts with `json`, `yaml`, `yml` and `toml` and accepts more at runtime.
//! - **`format`** – the [`Format`] trait and the built-in formats.
//! - **`store`** – [`store::load`] and [`store::save`].  Loading a file that
//!   does not exist yet writes the caller's current value to it, so the first
//!   run of an application leaves a config file with the defaults behind.
//! - **`duration`** – [`Duration`], a time span stored as `"1h30m0s"`.
//!
//! ```rust
//! use confstore::{store, Duration, FormatRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Network {
//!     port: u16,
//!     timeout: Duration,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("network.yaml");
//! let registry = FormatRegistry::new();
//!
//! let mut network = Network { port: 24800, timeout: Duration::from_secs(90) };
//! store::load(&registry, &path, &mut network).unwrap();
//!
//! let text = std::fs::read_to_string(&path).unwrap();
//! assert_eq!(text, "port: 24800\ntimeout: 1m30s\n");
//! ```
//!
//! Paths with an extension that has no registered format make [`store::load`]
//! and [`store::save`] panic.  Every other failure is a [`StoreError`].

pub mod duration;
pub mod error;
pub mod format;
pub mod registry;
pub mod store;

pub use duration::{Duration, DurationParseError};
pub use error::{BoxError, FormatError, StoreError};
pub use format::{Document, Format};
pub use registry::FormatRegistry;
