/* src/codec/error.rs */

/// Errors raised while turning a document into a collection or back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
	/// The input is not well-formed structured text.
	#[error("malformed syntax: {0}")]
	MalformedSyntax(String),

	/// The input parsed, but is not a mapping of key to sequence-of-mapping,
	/// or a record inside it has the wrong field types.
	#[error("shape mismatch: {0}")]
	ShapeMismatch(String),

	/// The collection could not be rendered.
	#[error("encode error: {0}")]
	Encode(String),
}
