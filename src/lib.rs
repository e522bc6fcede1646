/* src/lib.rs */

//!
//! A concurrent, file-persisted record store for disease metadata and
//! medicine recommendations.
//!
//! Each collection is one document on disk: a mapping of category key to an
//! ordered sequence of records. Many callers may read and mutate it at once:
//!
//! - **codec**: Deterministic encode/decode of collection documents.
//! - **atomic**: Temp-file + rename replacement; readers see old or new, never partial.
//! - **lock**: Per-key locks, shared between stores on the same file.
//! - **store**: `CollectionStore` with list/get/insert/update/delete by index.
//! - **config**: `StoreConfig` and the two-document `Catalog`.
//!
//! ## Feature Flags
//!
//! - `logging` (default): Emits `log` records for seeds, commits and lock timeouts.
//! - `events`: Broadcasts `StoreEvent`s for committed changes.
//! - `yaml`: YAML documents alongside JSON.
//! - `full`: Enables all features.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use paddy_store::{CollectionStore, Medicine};
//!
//! # async fn demo() -> Result<(), paddy_store::StoreError> {
//! let store = CollectionStore::<Medicine>::open("data/disease_medicines.json").await?;
//! let index = store
//! 	.insert_record("blast", Medicine::named("Tricyclazole 75% WP").with_priority(1))
//! 	.await?;
//! let removed = store.delete_record("blast", index).await?;
//! assert_eq!(removed.name, "Tricyclazole 75% WP");
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod codec;
pub mod config;
mod error;
pub mod lock;
pub mod record;
pub mod store;

pub use codec::{AnyFormat, Codec, CodecError, Collection};
pub use config::{Catalog, StoreConfig};
pub use error::{ErrorKind, StoreError};
pub use lock::{KeyLocks, LockError, LockRegistry};
pub use record::{DiseaseInfo, Indexed, Medicine, Record};
pub use store::CollectionStore;
#[cfg(feature = "events")]
pub use store::StoreEvent;
