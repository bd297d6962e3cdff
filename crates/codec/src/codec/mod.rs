//! String codecs for scalar values.
//!
//! A [`ValueCodec`] turns the string form stored in config trees into a
//! [`Value`] of the declared [`ValueType`] and back. The [`CodecRegistry`]
//! dispatches on the type tag first, so a custom codec can be registered for
//! a single named type, and falls back to the built-in codec of the type's
//! [`ValueKind`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CodecError, Result};
use crate::value::{Value, ValueKind, ValueType};


/// Converts between a declared type's string form and its [`Value`].
pub trait ValueCodec: Send + Sync {
	/// Parses `text` as a value of type `ty`.
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value>;

	/// Formats `value` as the string form of type `ty`.
	fn format(&self, ty: &ValueType, value: &Value) -> Result<String>;
}

fn invalid(ty: &ValueType, input: &str, reason: impl Into<String>) -> CodecError {
	CodecError::Invalid {
		ty: ty.name(),
		input: input.to_string(),
		reason: reason.into(),
	}
}

fn mismatch(ty: &ValueType, value: &Value) -> CodecError {
	CodecError::Mismatch {
		expected: ty.name(),
		got: value.type_name(),
	}
}

/// Parse a boolean value from common string representations.
pub fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Built-in codec for [`ValueKind::Bool`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolCodec;

impl ValueCodec for BoolCodec {
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value> {
		parse_bool(text).map(Value::Bool).ok_or_else(|| {
			invalid(ty, text, "expected true/false, yes/no, on/off, 1/0")
		})
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		match value {
			Value::Bool(v) => Ok(v.to_string()),
			other => Err(mismatch(ty, other)),
		}
	}
}

/// Built-in codec for [`ValueKind::Int`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IntCodec;

impl ValueCodec for IntCodec {
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value> {
		text.trim()
			.parse::<i64>()
			.map(Value::Int)
			.map_err(|e| invalid(ty, text, e.to_string()))
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		match value {
			Value::Int(v) => Ok(v.to_string()),
			other => Err(mismatch(ty, other)),
		}
	}
}

/// Built-in codec for [`ValueKind::Float`].
///
/// `f32` fields are formatted at single precision so that values such as
/// `0.1` do not gain widening noise in the stored text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatCodec;

impl ValueCodec for FloatCodec {
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value> {
		text.trim()
			.parse::<f64>()
			.map(Value::Float)
			.map_err(|e| invalid(ty, text, e.to_string()))
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		let v = match value {
			Value::Float(v) => *v,
			Value::Int(v) => *v as f64,
			other => return Err(mismatch(ty, other)),
		};
		if ty.name() == "f32" {
			Ok((v as f32).to_string())
		} else {
			Ok(v.to_string())
		}
	}
}

/// Built-in codec for [`ValueKind::String`]; the text is taken verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringCodec;

impl ValueCodec for StringCodec {
	fn parse(&self, _ty: &ValueType, text: &str) -> Result<Value> {
		Ok(Value::String(text.to_string()))
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		match value {
			Value::String(v) => Ok(v.clone()),
			other => Err(mismatch(ty, other)),
		}
	}
}

/// Built-in codec for [`ValueKind::Enum`].
///
/// Variant names are matched exactly. A type declared without variant names
/// accepts any non-empty name.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumCodec;

impl ValueCodec for EnumCodec {
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value> {
		let name = text.trim();
		if name.is_empty() {
			return Err(invalid(ty, text, "empty variant name"));
		}
		let variants = ty.variants();
		if !variants.is_empty() && !variants.contains(&name) {
			return Err(invalid(
				ty,
				text,
				format!("expected one of {}", variants.join(", ")),
			));
		}
		Ok(Value::Enum(name.to_string()))
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		match value {
			Value::Enum(v) | Value::String(v) => Ok(v.clone()),
			other => Err(mismatch(ty, other)),
		}
	}
}

/// Codec table keyed by type tag, with built-in codecs per [`ValueKind`].
#[derive(Clone, Default)]
pub struct CodecRegistry {
	by_name: HashMap<Box<str>, Arc<dyn ValueCodec>>,
}

impl CodecRegistry {
	/// Creates a registry with only the built-in codecs.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a codec for the type tag `name`, replacing any previous one.
	pub fn register(&mut self, name: impl Into<Box<str>>, codec: Arc<dyn ValueCodec>) {
		self.by_name.insert(name.into(), codec);
	}

	/// Builder form of [`CodecRegistry::register`].
	pub fn with(mut self, name: impl Into<Box<str>>, codec: Arc<dyn ValueCodec>) -> Self {
		self.register(name, codec);
		self
	}

	/// Returns true if a custom codec is registered for `name`.
	pub fn has_custom(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	fn builtin(kind: ValueKind) -> &'static dyn ValueCodec {
		match kind {
			ValueKind::Bool => &BoolCodec,
			ValueKind::Int => &IntCodec,
			ValueKind::Float => &FloatCodec,
			ValueKind::String => &StringCodec,
			ValueKind::Enum => &EnumCodec,
		}
	}

	fn codec_for(&self, ty: &ValueType) -> &dyn ValueCodec {
		match self.by_name.get(ty.name()) {
			Some(codec) => codec.as_ref(),
			None => Self::builtin(ty.kind()),
		}
	}
}

impl core::fmt::Debug for CodecRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("CodecRegistry")
			.field("custom", &self.by_name.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl ValueCodec for CodecRegistry {
	fn parse(&self, ty: &ValueType, text: &str) -> Result<Value> {
		self.codec_for(ty).parse(ty, text)
	}

	fn format(&self, ty: &ValueType, value: &Value) -> Result<String> {
		self.codec_for(ty).format(ty, value)
	}
}
