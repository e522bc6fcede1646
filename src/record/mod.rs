/* src/record/mod.rs */

//!
//! Record types held in a collection.

mod disease;
mod medicine;

pub use disease::DiseaseInfo;
pub use medicine::Medicine;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::StoreError;

/// Priority assumed for records that carry none, when ordering for display.
pub const DEFAULT_PRIORITY: u32 = 999;

/// A fixed-shape record stored in a category sequence.
///
/// Validation runs on every insert and update; decoding a document does not
/// validate, so records written by other tools are still readable.
pub trait Record:
	Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq + Send + Sync + 'static
{
	/// The required identifying field.
	fn name(&self) -> &str;

	/// Display priority, lower first. Never affects storage order.
	fn priority(&self) -> Option<u32> {
		None
	}

	fn validate_record(&self) -> Result<(), StoreError> {
		self.validate().map_err(StoreError::Validation)
	}
}

/// A record paired with its position in the category at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<R> {
	pub index: usize,
	pub record: R,
}

/// Orders records for display by ascending priority, keeping storage order on ties.
pub fn by_priority<R: Record>(records: Vec<R>) -> Vec<Indexed<R>> {
	let mut indexed: Vec<Indexed<R>> = records
		.into_iter()
		.enumerate()
		.map(|(index, record)| Indexed { index, record })
		.collect();
	indexed.sort_by_key(|entry| entry.record.priority().unwrap_or(DEFAULT_PRIORITY));
	indexed
}

/// Reads an explicit `null` as the field's empty value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
