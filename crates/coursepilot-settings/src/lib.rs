//! # CoursePilot Settings
//!
//! Namespaced, async key-value settings storage. This is the one piece of
//! state that survives process restarts: everything else the system holds is
//! re-derived from a fresh page snapshot on the next load.
//!
//! ## Key Components
//!
//! - [`SettingsStore`]: the storage trait
//! - [`MemorySettingsStore`]: in-memory store for tests and embedding
//! - [`FileSettingsStore`]: JSON-document store for persistence
//! - [`SettingsHandle`]: typed convenience layer over a store
//! - [`Settings`]: the typed document of known keys

pub mod error;
pub mod settings;
pub mod store;

pub use error::SettingsError;
pub use settings::{MenuPosition, Settings, keys};
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsHandle, SettingsStore};
