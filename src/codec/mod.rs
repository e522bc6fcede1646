/* src/codec/mod.rs */

//!
//! Record codec: collection documents to and from their textual form.
//!
//! A document is a mapping of category key to an ordered sequence of records.
//! Encoding is deterministic: categories are emitted in key order and record
//! fields in declaration order, so decoding a previously encoded document and
//! encoding it again yields the same bytes.

mod error;
mod json;
#[cfg(feature = "yaml")]
mod yaml;

pub use error::CodecError;
pub use json::Json;
#[cfg(feature = "yaml")]
pub use yaml::Yaml;

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category key to ordered records.
pub type Collection<R> = BTreeMap<String, Vec<R>>;

/// Abstract text format that converts bytes to a structured value and back.
pub trait Format: Send + Sync {
	/// List of supported extensions.
	fn extensions(&self) -> &'static [&'static str];

	/// Parse the raw bytes into the target type.
	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, CodecError>;

	/// Render a value into bytes.
	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;
}

/// An enum wrapper for all supported formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnyFormat {
	#[default]
	Json,
	#[cfg(feature = "yaml")]
	Yaml,
}

impl AnyFormat {
	/// Picks the format whose extension list contains `ext`.
	pub fn from_extension(ext: &str) -> Option<Self> {
		let ext = ext.trim_start_matches('.');
		[
			Self::Json,
			#[cfg(feature = "yaml")]
			Self::Yaml,
		]
		.into_iter()
		.find(|format| format.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
	}

	/// Picks the format from a file path's extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json => Json.extensions(),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.extensions(),
		}
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, CodecError> {
		match self {
			Self::Json => Json.parse(input),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.parse(input),
		}
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
		match self {
			Self::Json => Json.render(value),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.render(value),
		}
	}
}

/// Decodes and encodes whole collections in one format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
	format: AnyFormat,
}

impl Codec {
	pub const fn new(format: AnyFormat) -> Self {
		Self { format }
	}

	pub fn format(&self) -> AnyFormat {
		self.format
	}

	/// Parses a document and checks it is a mapping of key to sequence-of-mapping.
	pub fn decode<R: DeserializeOwned>(&self, input: &[u8]) -> Result<Collection<R>, CodecError> {
		let value: Value = self.format.parse(input)?;
		check_shape(&value)?;
		serde_json::from_value(value).map_err(|e| CodecError::ShapeMismatch(e.to_string()))
	}

	/// Renders a collection. Same collection, same bytes.
	pub fn encode<R: Serialize>(&self, collection: &Collection<R>) -> Result<Vec<u8>, CodecError> {
		self.format.render(collection)
	}
}

fn check_shape(value: &Value) -> Result<(), CodecError> {
	let Value::Object(categories) = value else {
		return Err(CodecError::ShapeMismatch(format!(
			"top-level value must be a mapping, found {}",
			type_name(value)
		)));
	};

	for (key, records) in categories {
		let Value::Array(records) = records else {
			return Err(CodecError::ShapeMismatch(format!(
				"category '{}' must be a sequence, found {}",
				key,
				type_name(records)
			)));
		};
		if let Some((index, record)) = records.iter().enumerate().find(|(_, r)| !r.is_object()) {
			return Err(CodecError::ShapeMismatch(format!(
				"record {} of category '{}' must be a mapping, found {}",
				index,
				key,
				type_name(record)
			)));
		}
	}

	Ok(())
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "sequence",
		Value::Object(_) => "mapping",
	}
}
