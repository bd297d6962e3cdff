use tracing::{error, trace, warn};

use super::{FieldEntry, FieldKey, FieldRegistry};
use crate::access::FieldScope;
use crate::configurable::Configurable;
use crate::error::ApplyError;

impl FieldRegistry {
	/// Applies the entries of `variant`.
	///
	/// Without a target only static fields are written and the variant is
	/// recorded as known. With a target, the entries of its runtime type and
	/// every ancestor are written, instance fields into the declaring part.
	pub fn apply_variant(&mut self, variant: &str, target: Option<&mut dyn Configurable>) {
		match target {
			None => {
				self.add_variant(variant);
				for entry in self.entries.values().filter(|e| e.variant == variant) {
					self.apply_entry(entry, None);
				}
			}
			Some(obj) => {
				let owners = self.chain_names(obj.type_name());
				for entry in self
					.entries
					.values()
					.filter(|e| e.variant == variant && owners.contains(&e.owner_type))
				{
					self.apply_entry(entry, Some(&mut *obj));
				}
			}
		}
	}

	/// Applies `""` as the base layer, then every named variant in order of
	/// first sight. Later layers win for the fields they define.
	pub fn apply_all(&mut self, target: Option<&mut dyn Configurable>) {
		let variants: Vec<String> = self.variants.iter().cloned().collect();
		match target {
			None => {
				self.apply_variant("", None);
				for variant in &variants {
					self.apply_variant(variant, None);
				}
			}
			Some(obj) => {
				self.apply_variant("", Some(&mut *obj));
				for variant in &variants {
					self.apply_variant(variant, Some(&mut *obj));
				}
			}
		}
	}

	/// Applies the static entries of `variant` for one type chain only.
	pub fn apply_type(&self, type_name: &str, variant: &str) {
		let owners = self.chain_names(type_name);
		for entry in self
			.entries
			.values()
			.filter(|e| e.variant == variant && owners.contains(&e.owner_type))
		{
			self.apply_entry(entry, None);
		}
	}

	/// Sets `field` of `type_name` or an ancestor to `literal` under every
	/// variant and applies it to static storage. Returns the number of
	/// entries overridden.
	pub fn override_type(&mut self, type_name: &str, field: &str, literal: &str) -> usize {
		let owners = self.chain_names(type_name);
		let keys = self.set_matching(&owners, field, literal);
		if keys.is_empty() {
			warn!(category = %self.category, type_name, field, "no field to override");
		}
		for key in &keys {
			self.apply_key(key, None);
		}
		keys.len()
	}

	/// Like [`FieldRegistry::override_type`] for the runtime type of `obj`,
	/// applying to `obj` as well as to static storage.
	pub fn override_instance(
		&mut self,
		obj: &mut dyn Configurable,
		field: &str,
		literal: &str,
	) -> usize {
		let owners = self.chain_names(obj.type_name());
		let keys = self.set_matching(&owners, field, literal);
		if keys.is_empty() {
			warn!(
				category = %self.category,
				type_name = obj.type_name(),
				field,
				"no field to override"
			);
		}
		for key in &keys {
			self.apply_key(key, Some(&mut *obj));
		}
		keys.len()
	}

	fn set_matching(&mut self, owners: &[String], field: &str, literal: &str) -> Vec<FieldKey> {
		let mut keys = Vec::new();
		for entry in self
			.entries
			.values_mut()
			.filter(|e| e.field_name == field && owners.contains(&e.owner_type))
		{
			entry.current_value = literal.to_string();
			keys.push(entry.key());
		}
		keys
	}

	pub(super) fn apply_key(&self, key: &FieldKey, target: Option<&mut dyn Configurable>) {
		if let Some(entry) = self.entries.get(key) {
			self.apply_entry(entry, target);
		}
	}

	fn apply_entry(&self, entry: &FieldEntry, target: Option<&mut dyn Configurable>) {
		match self.write_entry(entry, target) {
			Ok(true) => trace!(
				category = %self.category,
				type_name = %entry.owner_type,
				field = %entry.field_name,
				variant = %entry.variant,
				value = %entry.current_value,
				"applied field"
			),
			Ok(false) => {}
			Err(e @ ApplyError::Decode { .. }) => warn!(
				category = %self.category,
				type_name = %entry.owner_type,
				field = %entry.field_name,
				error = %e,
				"stored value not applied, field left unchanged"
			),
			Err(e) => error!(
				category = %self.category,
				type_name = %entry.owner_type,
				field = %entry.field_name,
				error = %e,
				"could not apply field"
			),
		}
	}

	/// Returns false when an instance field is skipped for lack of a target.
	fn write_entry(
		&self,
		entry: &FieldEntry,
		target: Option<&mut dyn Configurable>,
	) -> Result<bool, ApplyError> {
		let ty = self
			.resolver
			.resolve(&entry.owner_type)
			.ok_or_else(|| ApplyError::UnknownType(entry.owner_type.clone()))?;
		let field = ty
			.field(&entry.field_name)
			.ok_or_else(|| ApplyError::UnknownField {
				type_name: entry.owner_type.clone(),
				field: entry.field_name.clone(),
			})?;

		let part = match (field.scope(), target) {
			(FieldScope::Static, _) => None,
			(FieldScope::Instance, None) => return Ok(false),
			(FieldScope::Instance, Some(obj)) => {
				let target_name = obj.type_name().to_string();
				let part = obj
					.declaring_part(&entry.owner_type)
					.ok_or_else(|| ApplyError::MissingPart {
						target: target_name,
						owner: entry.owner_type.clone(),
					})?;
				Some(part)
			}
		};

		let value = self
			.codec
			.parse(&field.value_type(), &entry.current_value)
			.map_err(|source| ApplyError::Decode {
				value: entry.current_value.clone(),
				source,
			})?;
		field.access().write(part, value)?;
		Ok(true)
	}
}
