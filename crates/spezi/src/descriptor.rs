//! Registration-time descriptions of configurable types and fields.

use std::any::Any;
use std::fmt;

use parking_lot::RwLock;
use spezi_codec::{ConfigValue, ValueType};

use crate::access::{ConstSlot, FieldAccess, FieldScope, GlobalSlot, MemberSlot};

/// One configurable field declared on a type.
///
/// # Example
///
/// ```
/// use spezi::{FieldDescriptor, RwLock};
///
/// static RPM: RwLock<u32> = RwLock::new(900);
///
/// let field = FieldDescriptor::global("rpm", &RPM)
/// 	.comment("Target speed")
/// 	.default_value("900")
/// 	.variant("eco", "600");
/// assert_eq!(field.declared_variants(), vec![("eco".to_string(), "600".to_string())]);
/// ```
pub struct FieldDescriptor {
	name: String,
	value_type: ValueType,
	comment: String,
	category: String,
	default_value: String,
	variants: Vec<(String, Option<String>)>,
	access: Box<dyn FieldAccess>,
}

impl FieldDescriptor {
	/// Field backed by custom storage.
	pub fn with_access(
		name: impl Into<String>,
		value_type: ValueType,
		access: impl FieldAccess + 'static,
	) -> Self {
		Self {
			name: name.into(),
			value_type,
			comment: String::new(),
			category: String::new(),
			default_value: String::new(),
			variants: Vec::new(),
			access: Box::new(access),
		}
	}

	/// Process-wide field stored in a `static` lock.
	pub fn global<T: ConfigValue>(name: impl Into<String>, cell: &'static RwLock<T>) -> Self {
		Self::with_access(name, T::value_type(), GlobalSlot::new(cell))
	}

	/// Instance-scoped field stored in a member of the declaring type `S`.
	pub fn member<S: Any, T: ConfigValue>(
		name: impl Into<String>,
		get: fn(&S) -> &T,
		get_mut: fn(&mut S) -> &mut T,
	) -> Self {
		Self::with_access(name, T::value_type(), MemberSlot::new(get, get_mut))
	}

	/// A constant. Discovery rejects it.
	pub fn constant<T: ConfigValue>(name: impl Into<String>, value: &'static T) -> Self {
		Self::with_access(name, T::value_type(), ConstSlot::new(value))
	}

	/// Free-text documentation written to the effective config.
	pub fn comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = comment.into();
		self
	}

	/// Declared default of the default variant, and of variants without their own.
	pub fn default_value(mut self, value: impl Into<String>) -> Self {
		self.default_value = value.into();
		self
	}

	/// Restricts the field to one category. Empty means any category.
	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = category.into();
		self
	}

	/// Declares a variant with its own default.
	pub fn variant(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
		self.variants.push((name.into(), Some(default.into())));
		self
	}

	/// Declares a variant that falls back to the field's default value.
	pub fn variant_name(mut self, name: impl Into<String>) -> Self {
		self.variants.push((name.into(), None));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value_type(&self) -> ValueType {
		self.value_type
	}

	pub fn description(&self) -> &str {
		&self.comment
	}

	pub fn category_restriction(&self) -> &str {
		&self.category
	}

	pub fn declared_default(&self) -> &str {
		&self.default_value
	}

	pub fn scope(&self) -> FieldScope {
		self.access.scope()
	}

	pub fn access(&self) -> &dyn FieldAccess {
		self.access.as_ref()
	}

	/// `(variant, default)` pairs in declaration order.
	///
	/// A field without declared variants has the single default variant `""`.
	pub fn declared_variants(&self) -> Vec<(String, String)> {
		if self.variants.is_empty() {
			return vec![(String::new(), self.default_value.clone())];
		}
		self.variants
			.iter()
			.map(|(name, default)| {
				let default = default.clone().unwrap_or_else(|| self.default_value.clone());
				(name.clone(), default)
			})
			.collect()
	}
}

impl fmt::Debug for FieldDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("name", &self.name)
			.field("value_type", &self.value_type.name())
			.field("scope", &self.scope())
			.field("category", &self.category)
			.field("default_value", &self.default_value)
			.field("variants", &self.variants)
			.finish_non_exhaustive()
	}
}

/// A declaring type: its id, optional ancestor and the fields declared on it.
///
/// Ids are dot separated (`plant.pumps.Pump`). Only fields physically held
/// by this type are listed; inherited ones belong to the ancestor.
#[derive(Debug)]
pub struct TypeDescriptor {
	name: String,
	parent: Option<String>,
	fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			parent: None,
			fields: Vec::new(),
		}
	}

	/// Sets the ancestor type id.
	pub fn extends(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn with_field(mut self, field: FieldDescriptor) -> Self {
		self.fields.push(field);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Looks up a field declared on this type.
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}
}
