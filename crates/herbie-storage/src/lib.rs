//! Herbie Storage Library
//!
//! This crate owns the media archive: a single flat directory that receives
//! staged downloads and publishes them under canonical, collision-free names.
//!
//! # Name format
//!
//! Published files are named `<capture-time>_<sender><ext>` where the capture
//! time is `YYYY-MM-DD_HH-MM-SS` taken from metadata, or
//! `META_UNKNOWN_<now>` when the metadata has no usable timestamp. Collisions
//! are resolved by inserting hyphens before the extension.
//!
//! Publishing never overwrites. The check for a free name and the publish are
//! not atomic together; two concurrent intakes racing for the same name end
//! with one of them failing, never with a lost file.

pub mod archive;
pub mod error;
pub mod naming;
pub mod staging;

// Re-export commonly used types
pub use archive::MediaArchive;
pub use error::{StorageError, StorageResult};
pub use naming::{canonical_stem, normalize_extension, MAX_COLLISION_PROBES};
pub use staging::StagedFile;
