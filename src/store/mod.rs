/* src/store/mod.rs */

//!
//! Collection store: file-backed categories of ordered records.
//!
//! Every read decodes a fresh snapshot of the backing file. Every mutation
//! runs inside one change session: lock the category, lock the document,
//! re-read the file, apply the mutation, atomically replace the file, unlock.

mod builder;
mod document;
#[cfg(feature = "events")]
mod event;
mod read;
mod session;
mod write;

pub use builder::{CollectionStoreBuilder, DEFAULT_LOCK_TIMEOUT};
#[cfg(feature = "events")]
pub use event::StoreEvent;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::StoreError;
use crate::lock::KeyLocks;
use crate::record::Record;

use document::Document;

/// Default event channel capacity.
#[cfg(feature = "events")]
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// One collection document and the operations over it.
///
/// Cloning is cheap and clones share locks, version counter and event channel.
pub struct CollectionStore<R> {
	pub(crate) doc: Arc<Document>,
	pub(crate) version: Arc<AtomicU64>,
	#[cfg(feature = "events")]
	pub(crate) events: tokio::sync::broadcast::Sender<StoreEvent<R>>,
	#[cfg(not(feature = "events"))]
	pub(crate) _record: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> CollectionStore<R> {
	pub fn builder() -> CollectionStoreBuilder<R> {
		CollectionStoreBuilder::new()
	}

	/// Opens the document at `path` with default settings, seeding it if absent.
	pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		Self::builder().path(path).open().await
	}

	/// The absolute path of the backing file.
	pub fn path(&self) -> &Path {
		&self.doc.path
	}

	/// The locks guarding the backing file, shared with every store on the same path.
	pub fn locks(&self) -> &Arc<KeyLocks> {
		&self.doc.locks
	}

	/// Number of changes committed through this store and its clones.
	pub fn version(&self) -> u64 {
		self.version.load(Ordering::SeqCst)
	}

	/// Subscribes to committed change events.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<StoreEvent<R>> {
		self.events.subscribe()
	}
}

impl<R> Clone for CollectionStore<R> {
	fn clone(&self) -> Self {
		Self {
			doc: Arc::clone(&self.doc),
			version: Arc::clone(&self.version),
			#[cfg(feature = "events")]
			events: self.events.clone(),
			#[cfg(not(feature = "events"))]
			_record: std::marker::PhantomData,
		}
	}
}

impl<R> std::fmt::Debug for CollectionStore<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CollectionStore")
			.field("path", &self.doc.path)
			.field("format", &self.doc.codec.format())
			.field("lock_timeout", &self.doc.lock_timeout)
			.field("version", &self.version.load(Ordering::SeqCst))
			.finish_non_exhaustive()
	}
}
