/* src/codec/yaml.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CodecError, Format};

/// YAML format using `serde_yaml`.
pub struct Yaml;

impl Format for Yaml {
	fn extensions(&self) -> &'static [&'static str] {
		&["yaml", "yml"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, CodecError> {
		serde_yaml::from_slice(input).map_err(|e| CodecError::MalformedSyntax(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
		serde_yaml::to_string(value)
			.map(String::into_bytes)
			.map_err(|e| CodecError::Encode(e.to_string()))
	}
}
