/* src/record/medicine.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{Record, null_as_default};

/// A recommended treatment product for one disease category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Medicine {
	#[validate(length(min = 1))]
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub brand: String,
	#[serde(default, rename = "type", deserialize_with = "null_as_default")]
	pub kind: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub active_ingredient: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub pack_size: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub price: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub image_url: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub application_rate: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub method: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub frequency: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub availability: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	#[validate(range(min = 1))]
	pub priority: Option<u32>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub note: String,
	/// Fields written by other tools, kept as-is across rewrites.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

impl Medicine {
	/// A medicine with only its name set.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			brand: String::new(),
			kind: String::new(),
			active_ingredient: String::new(),
			pack_size: String::new(),
			price: String::new(),
			image_url: String::new(),
			application_rate: String::new(),
			method: String::new(),
			frequency: String::new(),
			availability: String::new(),
			priority: None,
			note: String::new(),
			extra: BTreeMap::new(),
		}
	}

	pub fn with_priority(mut self, priority: u32) -> Self {
		self.priority = Some(priority);
		self
	}
}

impl Record for Medicine {
	fn name(&self) -> &str {
		&self.name
	}

	fn priority(&self) -> Option<u32> {
		self.priority
	}
}
