/* src/lock/mod.rs */

//!
//! Mutual exclusion over logical keys.
//!
//! - [`KeyLocks`] - per-category locks plus one document lock for a single backing file
//! - [`LockRegistry`] - one shared [`KeyLocks`] per absolute file path

mod error;
mod keys;
mod registry;

pub use error::LockError;
pub use keys::{DOCUMENT_KEY, DocumentGuard, KeyGuard, KeyLocks};
pub use registry::LockRegistry;
