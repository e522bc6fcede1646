/* src/lock/keys.rs */

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::LockError;

/// Name reported for the document lock in errors and logs.
pub const DOCUMENT_KEY: &str = "<document>";

/// Locks for one backing file.
///
/// Category locks are created lazily on first use and kept for the life of
/// the value; the key set is the small, static set of categories. Lookups are
/// lock-free reads of an `ArcSwap` snapshot, and creation goes through `rcu`
/// so two racing callers always end up sharing one lock.
///
/// Waiters queue in FIFO order. A pending acquisition can be abandoned by
/// dropping its future or by giving it a timeout.
pub struct KeyLocks {
	keys: ArcSwap<HashMap<String, Arc<Mutex<()>>>>,
	document: Arc<Mutex<()>>,
}

/// Exclusive possession of one category key. Released on drop.
#[derive(Debug)]
pub struct KeyGuard {
	key: String,
	_guard: OwnedMutexGuard<()>,
}

impl KeyGuard {
	pub fn key(&self) -> &str {
		&self.key
	}
}

/// Exclusive possession of the whole backing file. Released on drop.
#[derive(Debug)]
pub struct DocumentGuard {
	_guard: OwnedMutexGuard<()>,
}

impl KeyLocks {
	pub fn new() -> Self {
		Self {
			keys: ArcSwap::from_pointee(HashMap::new()),
			document: Arc::new(Mutex::new(())),
		}
	}

	/// Waits for the lock on `key`, up to `timeout` if given.
	pub async fn acquire(&self, key: &str, timeout: Option<Duration>) -> Result<KeyGuard, LockError> {
		let lock = self.handle(key);
		let guard = wait(lock.lock_owned(), key, timeout).await?;
		Ok(KeyGuard {
			key: key.to_string(),
			_guard: guard,
		})
	}

	/// Takes the lock on `key` only if it is free right now.
	pub fn try_acquire(&self, key: &str) -> Option<KeyGuard> {
		let lock = self.handle(key);
		lock.try_lock_owned().ok().map(|guard| KeyGuard {
			key: key.to_string(),
			_guard: guard,
		})
	}

	/// Waits for the document lock, up to `timeout` if given.
	pub async fn acquire_document(&self, timeout: Option<Duration>) -> Result<DocumentGuard, LockError> {
		let guard = wait(Arc::clone(&self.document).lock_owned(), DOCUMENT_KEY, timeout).await?;
		Ok(DocumentGuard { _guard: guard })
	}

	/// Runs `f` while holding the lock on `key`.
	///
	/// The lock is released when `f` completes, returns an error, or panics.
	pub async fn with_lock<F, Fut, T>(
		&self,
		key: &str,
		timeout: Option<Duration>,
		f: F,
	) -> Result<T, LockError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = T>,
	{
		let _guard = self.acquire(key, timeout).await?;
		Ok(f().await)
	}

	/// Returns true if some caller currently holds the lock on `key`.
	pub fn is_locked(&self, key: &str) -> bool {
		self.keys
			.load()
			.get(key)
			.is_some_and(|lock| lock.try_lock().is_err())
	}

	/// Keys that have had a lock created.
	pub fn keys(&self) -> Vec<String> {
		self.keys.load().keys().cloned().collect()
	}

	fn handle(&self, key: &str) -> Arc<Mutex<()>> {
		if let Some(lock) = self.keys.load().get(key) {
			return Arc::clone(lock);
		}

		let candidate = Arc::new(Mutex::new(()));
		self.keys.rcu(|map| {
			if map.contains_key(key) {
				return Arc::clone(map);
			}
			let mut next = (**map).clone();
			next.insert(key.to_string(), Arc::clone(&candidate));
			Arc::new(next)
		});

		// Entries are never removed, so whichever lock won the race is present.
		self.keys
			.load()
			.get(key)
			.map(Arc::clone)
			.unwrap_or(candidate)
	}
}

impl Default for KeyLocks {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for KeyLocks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("KeyLocks")
			.field("keys", &self.keys.load().len())
			.finish_non_exhaustive()
	}
}

async fn wait<F>(
	acquire: F,
	key: &str,
	timeout: Option<Duration>,
) -> Result<OwnedMutexGuard<()>, LockError>
where
	F: Future<Output = OwnedMutexGuard<()>>,
{
	match timeout {
		None => Ok(acquire.await),
		Some(limit) => tokio::time::timeout(limit, acquire).await.map_err(|_| {
			#[cfg(feature = "logging")]
			log::warn!("lock wait on '{}' timed out after {:?}", key, limit);
			LockError::Timeout {
				key: key.to_string(),
				waited: limit,
			}
		}),
	}
}
