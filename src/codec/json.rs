/* src/codec/json.rs */

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CodecError, Format};

/// JSON format using `serde_json`, rendered with a four-space indent.
pub struct Json;

impl Format for Json {
	fn extensions(&self) -> &'static [&'static str] {
		&["json"]
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, CodecError> {
		serde_json::from_slice(input).map_err(|e| CodecError::MalformedSyntax(e.to_string()))
	}

	fn render<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
		let mut out = Vec::with_capacity(512);
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
		let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
		value
			.serialize(&mut serializer)
			.map_err(|e| CodecError::Encode(e.to_string()))?;
		out.push(b'\n');
		Ok(out)
	}
}
