/* src/store/write.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::StoreError;
use crate::codec::Collection;
use crate::record::Record;

#[cfg(feature = "events")]
use super::StoreEvent;
use super::session::ChangeSession;
use super::{CollectionStore, Document};

impl<R: Record> CollectionStore<R> {
	/// Appends `record` to `key`, creating the category if absent.
	///
	/// Returns the new record's index, the category's previous length.
	pub async fn insert_record(&self, key: &str, record: R) -> Result<usize, StoreError> {
		record.validate_record()?;

		#[cfg(feature = "events")]
		let inserted = Arc::new(record.clone());

		let category = key.to_string();
		let committer = self.committer(key);
		self.session(key)
			.run(
				move |collection: &mut Collection<R>| {
					let records = collection.entry(category).or_default();
					records.push(record);
					Ok(records.len() - 1)
				},
				move |_index: &usize| {
					let _version = committer.commit("insert");
					#[cfg(feature = "events")]
					committer.send(StoreEvent::Inserted {
						key: committer.key.clone(),
						index: *_index,
						record: inserted,
						version: _version,
					});
				},
			)
			.await
	}

	/// Replaces the record at `index` wholesale and returns the stored record.
	pub async fn update_record(&self, key: &str, index: usize, record: R) -> Result<R, StoreError> {
		record.validate_record()?;

		let category = key.to_string();
		let (_old, new) = self
			.session(key)
			.run(
				move |collection: &mut Collection<R>| {
					let slot = slot(collection, &category, index)?;
					let old = std::mem::replace(slot, record);
					Ok((old, slot.clone()))
				},
				self.committer(key).on_update(index),
			)
			.await?;

		Ok(new)
	}

	/// Applies `change` to the record at `index` in a single change session.
	///
	/// The read, the change and the write happen under the category lock, so
	/// concurrent calls on the same record each see the previous call's result.
	/// The changed record is validated before anything is written.
	pub async fn modify_record<F>(&self, key: &str, index: usize, change: F) -> Result<R, StoreError>
	where
		F: FnOnce(&mut R) + Send + 'static,
	{
		let category = key.to_string();
		let (_old, new) = self
			.session(key)
			.run(
				move |collection: &mut Collection<R>| {
					let slot = slot(collection, &category, index)?;
					let old = slot.clone();
					change(slot);
					slot.validate_record()?;
					Ok((old, slot.clone()))
				},
				self.committer(key).on_update(index),
			)
			.await?;

		Ok(new)
	}

	/// Removes and returns the record at `index`. Later records shift down by one.
	///
	/// Removing the last record leaves an empty category behind.
	pub async fn delete_record(&self, key: &str, index: usize) -> Result<R, StoreError> {
		let category = key.to_string();
		let committer = self.committer(key);
		self.session(key)
			.run(
				move |collection: &mut Collection<R>| {
					let records = records(collection, &category)?;
					check_index(&category, index, records.len())?;
					Ok(records.remove(index))
				},
				move |_removed: &R| {
					let _version = committer.commit("delete");
					#[cfg(feature = "events")]
					committer.send(StoreEvent::Deleted {
						key: committer.key.clone(),
						index,
						record: Arc::new(_removed.clone()),
						version: _version,
					});
				},
			)
			.await
	}

	/// Removes `key` and all of its records.
	pub async fn delete_category(&self, key: &str) -> Result<(), StoreError> {
		let category = key.to_string();
		let committer = self.committer(key);
		self.session(key)
			.run(
				move |collection: &mut Collection<R>| {
					collection
						.remove(&category)
						.ok_or(StoreError::NotFound { key: category })
				},
				move |_removed: &Vec<R>| {
					let _version = committer.commit("delete category");
					#[cfg(feature = "events")]
					committer.send(StoreEvent::CategoryDeleted {
						key: committer.key.clone(),
						records: Arc::new(_removed.clone()),
						version: _version,
					});
				},
			)
			.await?;

		Ok(())
	}

	fn session(&self, key: &str) -> ChangeSession {
		ChangeSession::new(Arc::clone(&self.doc), key)
	}

	fn committer(&self, key: &str) -> Committer<R> {
		Committer {
			key: key.to_string(),
			doc: Arc::clone(&self.doc),
			version: Arc::clone(&self.version),
			#[cfg(feature = "events")]
			events: self.events.clone(),
			#[cfg(not(feature = "events"))]
			_record: std::marker::PhantomData,
		}
	}
}

/// Accounts for one persisted change: bumps the store version, logs the
/// commit and, with `events`, broadcasts it. Runs inside the change session.
struct Committer<R> {
	#[cfg_attr(not(any(feature = "logging", feature = "events")), allow(dead_code))]
	key: String,
	#[cfg_attr(not(feature = "logging"), allow(dead_code))]
	doc: Arc<Document>,
	version: Arc<AtomicU64>,
	#[cfg(feature = "events")]
	events: tokio::sync::broadcast::Sender<StoreEvent<R>>,
	#[cfg(not(feature = "events"))]
	_record: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> Committer<R> {
	fn commit(&self, _operation: &str) -> u64 {
		let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
		#[cfg(feature = "logging")]
		log::debug!(
			"{} on '{}' committed to {} (version {})",
			_operation,
			self.key,
			self.doc.path.display(),
			version
		);
		version
	}

	#[cfg(feature = "events")]
	fn send(&self, event: StoreEvent<R>) {
		let _ = self.events.send(event);
	}

	fn on_update(self, _index: usize) -> impl FnOnce(&(R, R)) + Send + 'static {
		move |_change: &(R, R)| {
			let _version = self.commit("update");
			#[cfg(feature = "events")]
			{
				let (old, new) = _change;
				self.send(StoreEvent::Updated {
					key: self.key.clone(),
					index: _index,
					old: Arc::new(old.clone()),
					new: Arc::new(new.clone()),
					version: _version,
				});
			}
		}
	}
}

fn records<'a, R>(collection: &'a mut Collection<R>, key: &str) -> Result<&'a mut Vec<R>, StoreError> {
	collection.get_mut(key).ok_or_else(|| StoreError::NotFound {
		key: key.to_string(),
	})
}

fn slot<'a, R>(collection: &'a mut Collection<R>, key: &str, index: usize) -> Result<&'a mut R, StoreError> {
	let records = records(collection, key)?;
	check_index(key, index, records.len())?;
	Ok(&mut records[index])
}

fn check_index(key: &str, index: usize, len: usize) -> Result<(), StoreError> {
	if index < len {
		Ok(())
	} else {
		Err(StoreError::IndexOutOfRange {
			key: key.to_string(),
			index,
			len,
		})
	}
}
