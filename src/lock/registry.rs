/* src/lock/registry.rs */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::KeyLocks;

static GLOBAL: OnceLock<Arc<LockRegistry>> = OnceLock::new();

/// Maps a backing file to its locks.
///
/// Store instances opened on the same file must share one [`KeyLocks`] for
/// the per-key ordering guarantees to hold between them. Paths are expected
/// to be absolute and normalized by the caller.
///
/// Coordination is in-process only; separate OS processes sharing a file are
/// not serialized against each other.
pub struct LockRegistry {
	entries: ArcSwap<HashMap<PathBuf, Arc<KeyLocks>>>,
}

impl LockRegistry {
	pub fn new() -> Self {
		Self {
			entries: ArcSwap::from_pointee(HashMap::new()),
		}
	}

	/// The registry used by stores that were not given one explicitly.
	pub fn global() -> Arc<LockRegistry> {
		Arc::clone(GLOBAL.get_or_init(|| Arc::new(LockRegistry::new())))
	}

	/// Returns the locks for `path`, creating them on first use.
	pub fn locks_for(&self, path: &Path) -> Arc<KeyLocks> {
		if let Some(locks) = self.entries.load().get(path) {
			return Arc::clone(locks);
		}

		let candidate = Arc::new(KeyLocks::new());
		self.entries.rcu(|map| {
			if map.contains_key(path) {
				return Arc::clone(map);
			}
			let mut next = (**map).clone();
			next.insert(path.to_path_buf(), Arc::clone(&candidate));
			Arc::new(next)
		});

		self.entries
			.load()
			.get(path)
			.map(Arc::clone)
			.unwrap_or(candidate)
	}

	/// Number of files with registered locks.
	pub fn len(&self) -> usize {
		self.entries.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.load().is_empty()
	}
}

impl Default for LockRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for LockRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LockRegistry")
			.field("files", &self.len())
			.finish()
	}
}
