/* src/store/document.rs */

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::fs;

use crate::StoreError;
use crate::atomic;
use crate::codec::{Codec, Collection};
use crate::lock::KeyLocks;
use crate::record::Record;

/// The backing file of one collection and how to read and replace it.
#[derive(Debug)]
pub(crate) struct Document {
	pub(crate) path: PathBuf,
	pub(crate) codec: Codec,
	pub(crate) locks: Arc<KeyLocks>,
	pub(crate) lock_timeout: Option<Duration>,
}

impl Document {
	/// Decodes the current file. A missing file reads as an empty collection.
	pub(crate) async fn load<R: Record>(&self) -> Result<Collection<R>, StoreError> {
		match fs::read(&self.path).await {
			Ok(bytes) => self
				.codec
				.decode(&bytes)
				.map_err(|e| StoreError::codec(&self.path, e)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Collection::new()),
			Err(e) => Err(StoreError::io(&self.path, e)),
		}
	}

	/// Encodes the full collection and atomically replaces the file.
	pub(crate) async fn persist<R: Record>(&self, collection: &Collection<R>) -> Result<(), StoreError> {
		let bytes = self
			.codec
			.encode(collection)
			.map_err(|e| StoreError::codec(&self.path, e))?;
		atomic::write_atomic(&self.path, &bytes).await
	}

	/// Writes `seed` if the file is absent, or an empty collection if the file
	/// cannot be decoded. A readable file is left as it is.
	pub(crate) async fn seed<R: Record>(&self, seed: &Collection<R>) -> Result<(), StoreError> {
		let _guard = self.locks.acquire_document(self.lock_timeout).await?;

		match fs::read(&self.path).await {
			Ok(bytes) => match self.codec.decode::<R>(&bytes) {
				Ok(_) => Ok(()),
				Err(_e) => {
					#[cfg(feature = "logging")]
					log::warn!(
						"replacing undecodable document {} with an empty collection: {}",
						self.path.display(),
						_e
					);
					self.persist(&Collection::<R>::new()).await
				}
			},
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				#[cfg(feature = "logging")]
				log::info!(
					"seeding {} with {} categories",
					self.path.display(),
					seed.len()
				);
				self.persist(seed).await
			}
			Err(e) => Err(StoreError::io(&self.path, e)),
		}
	}
}
