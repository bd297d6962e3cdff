//! Typed scalar values for spezi and their string form.
//!
//! Every configurable field is declared with a [`ValueType`] and holds a
//! [`Value`]. Config trees store values as strings; a [`ValueCodec`] converts
//! between the two. [`CodecRegistry`] bundles the built-in codecs per
//! [`ValueKind`] with optional custom codecs keyed by type tag.
//!
//! Native Rust types implement [`ConfigValue`] to be usable as field types.
//! Fieldless enums opt in through [`config_enum!`].

mod codec;
mod error;
mod macros;
mod value;

pub use codec::{
	BoolCodec, CodecRegistry, EnumCodec, FloatCodec, IntCodec, StringCodec, ValueCodec, parse_bool,
};
pub use error::{CodecError, Result};
pub use value::{ConfigValue, Value, ValueKind, ValueType};
