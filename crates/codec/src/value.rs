//! Typed scalar values and the native conversions into them.

use crate::error::CodecError;

/// A scalar configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	String(String),
	/// Name of an enum-like variant.
	Enum(String),
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			Value::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the variant name if this is an `Enum` variant.
	pub fn as_enum(&self) -> Option<&str> {
		match self {
			Value::Enum(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the kind of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Bool(_) => ValueKind::Bool,
			Value::Int(_) => ValueKind::Int,
			Value::Float(_) => ValueKind::Float,
			Value::String(_) => ValueKind::String,
			Value::Enum(_) => ValueKind::Enum,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		self.kind().as_str()
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::String(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(v.to_string())
	}
}

/// The scalar kind behind a [`ValueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Boolean type.
	Bool,
	/// Integer type.
	Int,
	/// Floating point type.
	Float,
	/// String type.
	String,
	/// Enum-like type with a closed set of variant names.
	Enum,
}

impl ValueKind {
	/// Returns a lowercase name for diagnostics.
	pub fn as_str(self) -> &'static str {
		match self {
			ValueKind::Bool => "bool",
			ValueKind::Int => "int",
			ValueKind::Float => "float",
			ValueKind::String => "string",
			ValueKind::Enum => "enum",
		}
	}
}

/// Declared type of a configurable field.
///
/// The `name` is the type tag: it is written to the `class` attribute of the
/// effective config and is the key custom codecs are registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueType {
	kind: ValueKind,
	name: &'static str,
	variants: &'static [&'static str],
}

impl ValueType {
	/// `bool`.
	pub const BOOL: ValueType = ValueType::new(ValueKind::Bool, "bool");
	/// `String`.
	pub const STRING: ValueType = ValueType::new(ValueKind::String, "String");

	/// Creates a type tag of the given kind.
	pub const fn new(kind: ValueKind, name: &'static str) -> Self {
		Self {
			kind,
			name,
			variants: &[],
		}
	}

	/// Integer type tag (e.g. `i32`).
	pub const fn int(name: &'static str) -> Self {
		Self::new(ValueKind::Int, name)
	}

	/// Float type tag (e.g. `f64`).
	pub const fn float(name: &'static str) -> Self {
		Self::new(ValueKind::Float, name)
	}

	/// Enum-like type tag with its closed set of variant names.
	pub const fn enumeration(name: &'static str, variants: &'static [&'static str]) -> Self {
		Self {
			kind: ValueKind::Enum,
			name,
			variants,
		}
	}

	pub fn kind(&self) -> ValueKind {
		self.kind
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Variant names of an enum-like type; empty for every other kind.
	pub fn variants(&self) -> &'static [&'static str] {
		self.variants
	}
}

/// Native Rust types that can back a configurable field.
pub trait ConfigValue: Sized + Send + Sync + 'static {
	/// Returns the declared type of this Rust type.
	fn value_type() -> ValueType;

	/// Converts the native value into a [`Value`]. Fails when the value has
	/// no exact representation.
	fn to_value(&self) -> Result<Value, CodecError>;

	/// Converts a decoded [`Value`] back into the native type.
	fn from_value(value: Value) -> Result<Self, CodecError>;
}

fn mismatch(expected: ValueType, value: &Value) -> CodecError {
	CodecError::Mismatch {
		expected: expected.name(),
		got: value.type_name(),
	}
}

impl ConfigValue for bool {
	fn value_type() -> ValueType {
		ValueType::BOOL
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		Ok(Value::Bool(*self))
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		value.as_bool().ok_or_else(|| mismatch(Self::value_type(), &value))
	}
}

impl ConfigValue for String {
	fn value_type() -> ValueType {
		ValueType::STRING
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		Ok(Value::String(self.clone()))
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		match value {
			Value::String(s) => Ok(s),
			other => Err(mismatch(Self::value_type(), &other)),
		}
	}
}

macro_rules! impl_int_value {
	($($ty:ty),+ $(,)?) => {
		$(
			impl ConfigValue for $ty {
				fn value_type() -> ValueType {
					ValueType::int(stringify!($ty))
				}

				fn to_value(&self) -> Result<Value, CodecError> {
					Ok(Value::Int(i64::from(*self)))
				}

				fn from_value(value: Value) -> Result<Self, CodecError> {
					let raw = value.as_int().ok_or_else(|| mismatch(Self::value_type(), &value))?;
					<$ty>::try_from(raw).map_err(|_| CodecError::OutOfRange {
						ty: stringify!($ty),
						value: raw.to_string(),
					})
				}
			}
		)+
	};
}

impl_int_value!(i8, i16, i32, i64, u8, u16, u32);

/// Integers wider than [`Value::Int`] fail instead of saturating.
fn wide_int<T>(ty: &'static str, value: T) -> Result<Value, CodecError>
where
	T: Copy + TryInto<i64> + ToString,
{
	value.try_into().map(Value::Int).map_err(|_| CodecError::OutOfRange {
		ty,
		value: value.to_string(),
	})
}

impl ConfigValue for isize {
	fn value_type() -> ValueType {
		ValueType::int("isize")
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		wide_int("isize", *self)
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		let raw = value
			.as_int()
			.ok_or_else(|| mismatch(Self::value_type(), &value))?;
		isize::try_from(raw).map_err(|_| CodecError::OutOfRange {
			ty: "isize",
			value: raw.to_string(),
		})
	}
}

impl ConfigValue for u64 {
	fn value_type() -> ValueType {
		ValueType::int("u64")
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		wide_int("u64", *self)
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		let raw = value
			.as_int()
			.ok_or_else(|| mismatch(Self::value_type(), &value))?;
		u64::try_from(raw).map_err(|_| CodecError::OutOfRange {
			ty: "u64",
			value: raw.to_string(),
		})
	}
}

impl ConfigValue for usize {
	fn value_type() -> ValueType {
		ValueType::int("usize")
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		wide_int("usize", *self)
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		let raw = value
			.as_int()
			.ok_or_else(|| mismatch(Self::value_type(), &value))?;
		usize::try_from(raw).map_err(|_| CodecError::OutOfRange {
			ty: "usize",
			value: raw.to_string(),
		})
	}
}

impl ConfigValue for f64 {
	fn value_type() -> ValueType {
		ValueType::float("f64")
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		Ok(Value::Float(*self))
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		value
			.as_float()
			.ok_or_else(|| mismatch(Self::value_type(), &value))
	}
}

impl ConfigValue for f32 {
	fn value_type() -> ValueType {
		ValueType::float("f32")
	}

	fn to_value(&self) -> Result<Value, CodecError> {
		Ok(Value::Float(f64::from(*self)))
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		value
			.as_float()
			.map(|v| v as f32)
			.ok_or_else(|| mismatch(Self::value_type(), &value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn narrow_integers_reject_out_of_range_values() {
		assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
		assert!(matches!(
			u8::from_value(Value::Int(256)),
			Err(CodecError::OutOfRange { ty: "u8", .. })
		));
		assert!(matches!(
			u32::from_value(Value::Int(-1)),
			Err(CodecError::OutOfRange { ty: "u32", .. })
		));
	}

	#[test]
	fn wide_integers_refuse_to_saturate() {
		assert_eq!(u64::from(u32::MAX).to_value(), Ok(Value::Int(i64::from(u32::MAX))));
		assert_eq!(
			u64::MAX.to_value(),
			Err(CodecError::OutOfRange {
				ty: "u64",
				value: u64::MAX.to_string(),
			})
		);
		if cfg!(target_pointer_width = "64") {
			assert!(matches!(
				usize::MAX.to_value(),
				Err(CodecError::OutOfRange { ty: "usize", .. })
			));
		}
		assert_eq!(isize::MIN.to_value(), Ok(Value::Int(isize::MIN as i64)));
	}

	#[test]
	fn floats_accept_integer_values() {
		assert_eq!(f64::from_value(Value::Int(5)), Ok(5.0));
		assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
	}

	#[test]
	fn kind_mismatch_is_reported() {
		assert_eq!(
			bool::from_value(Value::String("yes".into())),
			Err(CodecError::Mismatch {
				expected: "bool",
				got: "string",
			})
		);
	}

	#[test]
	fn value_types_carry_native_names() {
		assert_eq!(i32::value_type(), ValueType::int("i32"));
		assert_eq!(f64::value_type().kind(), ValueKind::Float);
		assert_eq!(String::value_type().name(), "String");
	}
}
