//! Read/write capabilities bound to a field's storage.
//!
//! Every configurable field is reached through a [`FieldAccess`]. The apply
//! algorithm only ever calls [`FieldAccess::read`] and [`FieldAccess::write`];
//! static accessors ignore the instance part they are handed.

use std::any::{Any, type_name};

use parking_lot::RwLock;
use spezi_codec::{ConfigValue, Value};

use crate::error::{AccessError, Result};

/// Where a field's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
	/// Process-wide storage, written without a target object.
	Static,
	/// A member of each object of the declaring type.
	Instance,
}

/// Capability pair bound to one field's storage.
pub trait FieldAccess: Send + Sync {
	fn scope(&self) -> FieldScope;

	/// Constants return false and are rejected by discovery.
	fn is_mutable(&self) -> bool {
		true
	}

	/// Reads the current value. `part` is the declaring part of the target
	/// object for instance fields and ignored otherwise.
	fn read(&self, part: Option<&dyn Any>) -> Result<Value>;

	/// Writes `value` into the field.
	fn write(&self, part: Option<&mut dyn Any>, value: Value) -> Result<()>;
}

/// Accessor for a process-wide `static` behind a [`RwLock`].
pub struct GlobalSlot<T: 'static> {
	cell: &'static RwLock<T>,
}

impl<T> GlobalSlot<T> {
	pub fn new(cell: &'static RwLock<T>) -> Self {
		Self { cell }
	}
}

impl<T: ConfigValue> FieldAccess for GlobalSlot<T> {
	fn scope(&self) -> FieldScope {
		FieldScope::Static
	}

	fn read(&self, _part: Option<&dyn Any>) -> Result<Value> {
		Ok(self.cell.read().to_value()?)
	}

	fn write(&self, _part: Option<&mut dyn Any>, value: Value) -> Result<()> {
		let value = T::from_value(value)?;
		*self.cell.write() = value;
		Ok(())
	}
}

/// Accessor for a member of the declaring type `S`.
pub struct MemberSlot<S, T> {
	get: fn(&S) -> &T,
	get_mut: fn(&mut S) -> &mut T,
}

impl<S, T> MemberSlot<S, T> {
	pub fn new(get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self {
		Self { get, get_mut }
	}
}

impl<S: Any, T: ConfigValue> FieldAccess for MemberSlot<S, T> {
	fn scope(&self) -> FieldScope {
		FieldScope::Instance
	}

	fn read(&self, part: Option<&dyn Any>) -> Result<Value> {
		let part = part.ok_or(AccessError::MissingInstance)?;
		let owner = part.downcast_ref::<S>().ok_or(AccessError::WrongPart {
			expected: type_name::<S>(),
		})?;
		Ok((self.get)(owner).to_value()?)
	}

	fn write(&self, part: Option<&mut dyn Any>, value: Value) -> Result<()> {
		let part = part.ok_or(AccessError::MissingInstance)?;
		let owner = part.downcast_mut::<S>().ok_or(AccessError::WrongPart {
			expected: type_name::<S>(),
		})?;
		*(self.get_mut)(owner) = T::from_value(value)?;
		Ok(())
	}
}

/// Accessor for a constant. Readable, never writable.
pub struct ConstSlot<T: 'static> {
	value: &'static T,
}

impl<T> ConstSlot<T> {
	pub fn new(value: &'static T) -> Self {
		Self { value }
	}
}

impl<T: ConfigValue> FieldAccess for ConstSlot<T> {
	fn scope(&self) -> FieldScope {
		FieldScope::Static
	}

	fn is_mutable(&self) -> bool {
		false
	}

	fn read(&self, _part: Option<&dyn Any>) -> Result<Value> {
		Ok(self.value.to_value()?)
	}

	fn write(&self, _part: Option<&mut dyn Any>, _value: Value) -> Result<()> {
		Err(AccessError::Immutable)
	}
}
