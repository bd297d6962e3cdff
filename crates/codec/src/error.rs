//! Error types for value conversion.

use thiserror::Error;

/// Errors raised while converting between strings, [`Value`](crate::Value)s and native types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	/// The text could not be parsed as the declared type.
	#[error("invalid {ty} value '{input}': {reason}")]
	Invalid {
		/// Declared type name.
		ty: &'static str,
		/// The rejected input.
		input: String,
		/// Human-readable reason.
		reason: String,
	},

	/// The value kind does not match the declared type.
	#[error("type mismatch: expected {expected}, got {got}")]
	Mismatch {
		/// Declared type name.
		expected: &'static str,
		/// Kind of the provided value.
		got: &'static str,
	},

	/// The value does not fit the native type.
	#[error("value {value} is out of range for {ty}")]
	OutOfRange {
		/// Native type name.
		ty: &'static str,
		/// The offending value.
		value: String,
	},
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
