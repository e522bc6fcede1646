/* src/store/builder.rs */

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use tokio::fs;

use crate::StoreError;
use crate::codec::{AnyFormat, Codec, Collection};
use crate::lock::LockRegistry;
use crate::record::Record;

use super::{CollectionStore, Document};

/// Lock wait limit used when none is configured.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for [`CollectionStore`].
pub struct CollectionStoreBuilder<R> {
	path: Option<PathBuf>,
	format: Option<AnyFormat>,
	lock_timeout: Option<Duration>,
	seed: Collection<R>,
	registry: Option<Arc<LockRegistry>>,
	#[cfg(feature = "events")]
	event_capacity: usize,
}

impl<R: Record> CollectionStoreBuilder<R> {
	pub fn new() -> Self {
		Self {
			path: None,
			format: None,
			lock_timeout: Some(DEFAULT_LOCK_TIMEOUT),
			seed: Collection::new(),
			registry: None,
			#[cfg(feature = "events")]
			event_capacity: super::DEFAULT_EVENT_CAPACITY,
		}
	}

	pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Document format. Defaults to the one matching the path's extension, else JSON.
	pub fn format(mut self, format: AnyFormat) -> Self {
		self.format = Some(format);
		self
	}

	/// Limits how long a mutation waits for its locks.
	pub fn lock_timeout(mut self, timeout: Duration) -> Self {
		self.lock_timeout = Some(timeout);
		self
	}

	/// Lets mutations wait for their locks indefinitely.
	pub fn no_lock_timeout(mut self) -> Self {
		self.lock_timeout = None;
		self
	}

	/// Document written when the backing file does not exist yet.
	pub fn seed(mut self, seed: Collection<R>) -> Self {
		self.seed = seed;
		self
	}

	/// Lock registry to share locks through. Defaults to [`LockRegistry::global`].
	pub fn locks(mut self, registry: Arc<LockRegistry>) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Set the event channel capacity.
	///
	/// Note: Events may be dropped if subscribers process slower than
	/// the write rate and the channel fills up.
	#[cfg(feature = "events")]
	pub fn event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity;
		self
	}

	/// Resolves the path, registers its locks and seeds the document.
	pub async fn open(self) -> Result<CollectionStore<R>, StoreError> {
		let path = self
			.path
			.ok_or_else(|| StoreError::Builder("path is required".to_string()))?;
		let file_name = path
			.file_name()
			.map(|name| name.to_os_string())
			.ok_or_else(|| StoreError::Builder(format!("{} has no file name", path.display())))?;

		let dir = match path.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
			_ => PathBuf::from("."),
		};
		fs::create_dir_all(&dir)
			.await
			.map_err(|e| StoreError::io(&dir, e))?;
		let dir = fs::canonicalize(&dir)
			.await
			.map_err(|e| StoreError::io(&dir, e))?;
		let path = dir.join(file_name);

		let format = self
			.format
			.or_else(|| AnyFormat::from_path(&path))
			.unwrap_or_default();
		let registry = self.registry.unwrap_or_else(LockRegistry::global);

		let doc = Document {
			locks: registry.locks_for(&path),
			path,
			codec: Codec::new(format),
			lock_timeout: self.lock_timeout,
		};
		doc.seed(&self.seed).await?;

		#[cfg(feature = "logging")]
		log::info!("opened {} as {:?}", doc.path.display(), format);

		Ok(CollectionStore {
			doc: Arc::new(doc),
			version: Arc::new(AtomicU64::new(0)),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(self.event_capacity).0,
			#[cfg(not(feature = "events"))]
			_record: std::marker::PhantomData,
		})
	}
}

impl<R: Record> Default for CollectionStoreBuilder<R> {
	fn default() -> Self {
		Self::new()
	}
}
