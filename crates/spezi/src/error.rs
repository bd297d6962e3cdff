//! Error types for field access and apply.
//!
//! These never escape discovery, ingestion or apply; the engine logs them per
//! field and moves on.

use spezi_codec::CodecError;
use thiserror::Error;

/// Errors raised by a [`FieldAccess`](crate::FieldAccess) capability.
#[derive(Debug, Error)]
pub enum AccessError {
	/// The field is a constant and cannot be written.
	#[error("field is immutable")]
	Immutable,

	/// An instance-scoped field was accessed without a target object.
	#[error("instance field accessed without a target object")]
	MissingInstance,

	/// The target part is not of the declaring type.
	#[error("target part is not a {expected}")]
	WrongPart {
		/// Rust type name the accessor expected.
		expected: &'static str,
	},

	/// The value does not fit the native field type.
	#[error(transparent)]
	Codec(#[from] CodecError),
}

/// Errors raised while applying one index entry to its field.
#[derive(Debug, Error)]
pub enum ApplyError {
	/// The owner type no longer resolves.
	#[error("unknown type {0}")]
	UnknownType(String),

	/// The owner type no longer declares the field.
	#[error("type {type_name} has no configurable field {field}")]
	UnknownField {
		/// Owner type id.
		type_name: String,
		/// Field name.
		field: String,
	},

	/// The target object has no part of the owner type.
	#[error("{target} has no part of type {owner}")]
	MissingPart {
		/// Runtime type id of the target object.
		target: String,
		/// Owner type id of the field.
		owner: String,
	},

	/// The stored string could not be decoded.
	#[error("cannot decode '{value}': {source}")]
	Decode {
		/// The stored string.
		value: String,
		/// The codec failure.
		#[source]
		source: CodecError,
	},

	/// A value read from a field could not be formatted.
	#[error("cannot encode field value: {0}")]
	Encode(#[source] CodecError),

	/// The decoded value could not be written.
	#[error(transparent)]
	Access(#[from] AccessError),
}

/// Result type for accessor operations.
pub type Result<T> = std::result::Result<T, AccessError>;
