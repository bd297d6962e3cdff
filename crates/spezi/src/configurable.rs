//! Objects that instance-scoped fields are applied to.

use std::any::Any;

/// A live object that can receive instance-scoped values.
///
/// Fields inherited from an ancestor type live in a sub-object, so the engine
/// asks for the part that physically holds the fields of each type in the
/// chain.
pub trait Configurable: Any {
	/// Runtime type id, matching a registered [`TypeDescriptor`](crate::TypeDescriptor).
	fn type_name(&self) -> &str;

	/// Returns the part holding the fields declared on `type_name`.
	fn declaring_part(&mut self, type_name: &str) -> Option<&mut dyn Any>;
}

/// Implements [`Configurable`] for a struct.
///
/// The plain form makes the struct itself the declaring part of `$name`. The
/// `base:` form additionally delegates ancestor types to the named member.
///
/// ```
/// struct Machine {
/// 	hours: u32,
/// }
/// spezi::impl_configurable!(Machine, "plant.Machine");
///
/// struct Pump {
/// 	machine: Machine,
/// 	rpm: u32,
/// }
/// spezi::impl_configurable!(Pump, "plant.Pump", base: machine);
///
/// use spezi::Configurable;
/// let mut pump = Pump { machine: Machine { hours: 0 }, rpm: 0 };
/// assert_eq!(pump.type_name(), "plant.Pump");
/// assert!(pump.declaring_part("plant.Machine").is_some_and(|p| p.is::<Machine>()));
/// assert!(pump.declaring_part("plant.Valve").is_none());
/// ```
#[macro_export]
macro_rules! impl_configurable {
	($ty:ty, $name:expr) => {
		impl $crate::Configurable for $ty {
			fn type_name(&self) -> &str {
				$name
			}

			fn declaring_part(&mut self, type_name: &str) -> Option<&mut dyn ::core::any::Any> {
				if type_name == $name { Some(self) } else { None }
			}
		}
	};
	($ty:ty, $name:expr, base: $base:ident) => {
		impl $crate::Configurable for $ty {
			fn type_name(&self) -> &str {
				$name
			}

			fn declaring_part(&mut self, type_name: &str) -> Option<&mut dyn ::core::any::Any> {
				if type_name == $name {
					Some(self)
				} else {
					$crate::Configurable::declaring_part(&mut self.$base, type_name)
				}
			}
		}
	};
}
