/* src/store/event.rs */

use std::sync::Arc;

/// Events emitted by the store after a change is persisted.
///
/// `version` is the committing store's counter after the change.
#[derive(Debug, Clone)]
pub enum StoreEvent<R> {
	/// A record was appended to a category.
	Inserted {
		key: String,
		index: usize,
		record: Arc<R>,
		version: u64,
	},
	/// A record was replaced in place.
	Updated {
		key: String,
		index: usize,
		old: Arc<R>,
		new: Arc<R>,
		version: u64,
	},
	/// A record was removed; later indices shifted down by one.
	Deleted {
		key: String,
		index: usize,
		record: Arc<R>,
		version: u64,
	},
	/// A whole category was removed.
	CategoryDeleted {
		key: String,
		records: Arc<Vec<R>>,
		version: u64,
	},
}

impl<R> StoreEvent<R> {
	pub fn key(&self) -> &str {
		match self {
			Self::Inserted { key, .. }
			| Self::Updated { key, .. }
			| Self::Deleted { key, .. }
			| Self::CategoryDeleted { key, .. } => key,
		}
	}

	pub fn version(&self) -> u64 {
		match self {
			Self::Inserted { version, .. }
			| Self::Updated { version, .. }
			| Self::Deleted { version, .. }
			| Self::CategoryDeleted { version, .. } => *version,
		}
	}
}
