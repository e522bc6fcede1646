/* src/store/read.rs */

use crate::StoreError;
use crate::codec::Collection;
use crate::record::{Indexed, Record, by_priority};

use super::CollectionStore;

impl<R: Record> CollectionStore<R> {
	/// Returns a freshly decoded copy of the whole collection.
	pub async fn snapshot(&self) -> Result<Collection<R>, StoreError> {
		self.doc.load().await
	}

	/// Category keys in sorted order.
	pub async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
		Ok(self.snapshot().await?.into_keys().collect())
	}

	/// Records of `key` in storage order.
	///
	/// An absent category is `NotFound`; an emptied one is an empty sequence.
	pub async fn list_records(&self, key: &str) -> Result<Vec<R>, StoreError> {
		self.snapshot()
			.await?
			.remove(key)
			.ok_or_else(|| StoreError::NotFound {
				key: key.to_string(),
			})
	}

	/// Records of `key` ordered for display by ascending priority.
	///
	/// Each entry carries its storage index, which is what update and delete take.
	pub async fn list_by_priority(&self, key: &str) -> Result<Vec<Indexed<R>>, StoreError> {
		Ok(by_priority(self.list_records(key).await?))
	}

	/// The record at `index` within `key`.
	pub async fn get_record(&self, key: &str, index: usize) -> Result<R, StoreError> {
		let mut records = self.list_records(key).await?;
		let len = records.len();
		if index >= len {
			return Err(StoreError::IndexOutOfRange {
				key: key.to_string(),
				index,
				len,
			});
		}
		Ok(records.swap_remove(index))
	}
}
