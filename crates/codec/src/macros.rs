//! Helper macros for enum-like field types.

/// Implements [`ConfigValue`](crate::ConfigValue) for a fieldless enum.
///
/// The variant identifiers are the stored names, and `$name` is the type tag
/// written to the effective config.
///
/// # Example
///
/// ```
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode {
/// 	Idle,
/// 	Run,
/// }
///
/// spezi_codec::config_enum!(Mode, "plant.Mode", { Idle, Run });
///
/// use spezi_codec::{ConfigValue, Value};
/// assert_eq!(Mode::Run.to_value(), Ok(Value::Enum("Run".into())));
/// assert_eq!(Mode::from_value(Value::Enum("Idle".into())), Ok(Mode::Idle));
/// ```
#[macro_export]
macro_rules! config_enum {
	($ty:ty, $name:expr, { $($variant:ident),+ $(,)? }) => {
		impl $crate::ConfigValue for $ty {
			fn value_type() -> $crate::ValueType {
				$crate::ValueType::enumeration($name, &[$(stringify!($variant)),+])
			}

			fn to_value(&self) -> ::core::result::Result<$crate::Value, $crate::CodecError> {
				let name = match self {
					$(Self::$variant => stringify!($variant),)+
				};
				Ok($crate::Value::Enum(name.to_string()))
			}

			fn from_value(
				value: $crate::Value,
			) -> ::core::result::Result<Self, $crate::CodecError> {
				let name = match &value {
					$crate::Value::Enum(name) | $crate::Value::String(name) => name.as_str(),
					other => {
						return Err($crate::CodecError::Mismatch {
							expected: $name,
							got: other.type_name(),
						});
					}
				};
				$(
					if name == stringify!($variant) {
						return Ok(Self::$variant);
					}
				)+
				Err($crate::CodecError::Invalid {
					ty: $name,
					input: name.to_string(),
					reason: "unknown variant".to_string(),
				})
			}
		}
	};
}
