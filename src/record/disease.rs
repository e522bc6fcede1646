/* src/record/disease.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{Record, null_as_default};

/// Descriptive metadata for a disease category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DiseaseInfo {
	#[validate(length(min = 1))]
	pub disease_name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub caused_by: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub description: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub symptoms: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub factors: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub prevention: Vec<String>,
	/// Care steps, used for the healthy-plant category.
	#[serde(default, deserialize_with = "null_as_default")]
	pub care: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub treatment: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub note: String,
	/// Fields written by other tools, kept as-is across rewrites.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

impl DiseaseInfo {
	pub fn named(disease_name: impl Into<String>) -> Self {
		Self {
			disease_name: disease_name.into(),
			caused_by: String::new(),
			description: String::new(),
			symptoms: Vec::new(),
			factors: Vec::new(),
			prevention: Vec::new(),
			care: Vec::new(),
			treatment: String::new(),
			note: String::new(),
			extra: BTreeMap::new(),
		}
	}
}

impl Record for DiseaseInfo {
	fn name(&self) -> &str {
		&self.disease_name
	}
}
