use tracing::{error, trace, warn};

use super::{FieldEntry, FieldRegistry};
use crate::access::FieldScope;
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::error::ApplyError;

impl FieldRegistry {
	/// Discovers the configurable fields of `type_name` and every ancestor and
	/// merges them into the index. Returns the resulting index entries.
	///
	/// Without `overwrite`, existing entries only receive fresh metadata and
	/// keep their value. New entries take the declared default as current
	/// value when one is declared. With `overwrite`, every discovered entry
	/// replaces the indexed one, capturing the value static fields hold now.
	/// Freshly installed default-variant entries are applied process-wide.
	pub fn discover(&mut self, type_name: &str, overwrite: bool) -> Vec<FieldEntry> {
		let chain = self.type_chain(type_name);
		if chain.is_empty() {
			warn!(category = %self.category, type_name, "cannot discover unknown type");
			return Vec::new();
		}

		let mut found = Vec::new();
		for ty in &chain {
			for field in ty.fields() {
				for entry in self.read_field(ty, field) {
					let key = entry.key();
					self.add_variant(&entry.variant);
					self.merge_discovered(entry, overwrite);
					if let Some(merged) = self.entries.get(&key) {
						found.push(merged.clone());
					}
				}
			}
		}
		found
	}

	/// Builds one entry per variant of `field`, seeded per the field's scope.
	fn read_field(&self, ty: &TypeDescriptor, field: &FieldDescriptor) -> Vec<FieldEntry> {
		let type_name = ty.name();
		if !field.access().is_mutable() {
			error!(
				category = %self.category,
				type_name,
				field = field.name(),
				"configurable field must not be a constant"
			);
			return Vec::new();
		}
		let restriction = field.category_restriction();
		if !restriction.is_empty() && restriction != self.category {
			return Vec::new();
		}

		let mut entries = Vec::new();
		for (variant, default) in field.declared_variants() {
			let seeded = if field.scope() == FieldScope::Instance
				|| (!variant.is_empty() && !default.is_empty())
			{
				default.clone()
			} else {
				match self.capture_static(field) {
					Ok(text) => text,
					Err(e) => {
						error!(
							category = %self.category,
							type_name,
							field = field.name(),
							error = %e,
							"could not read field value"
						);
						continue;
					}
				}
			};
			entries.push(FieldEntry {
				owner_type: type_name.to_string(),
				field_name: field.name().to_string(),
				variant,
				value_type: Some(field.value_type()),
				current_value: seeded,
				default_value: default,
				comment: field.description().to_string(),
			});
		}
		entries
	}

	/// Reads a static field and formats it through the codec.
	fn capture_static(&self, field: &FieldDescriptor) -> Result<String, ApplyError> {
		let value = field.access().read(None)?;
		self.codec
			.format(&field.value_type(), &value)
			.map_err(ApplyError::Encode)
	}

	fn merge_discovered(&mut self, mut entry: FieldEntry, overwrite: bool) {
		let key = entry.key();
		if !overwrite && let Some(existing) = self.entries.get_mut(&key) {
			existing.comment = entry.comment;
			existing.default_value = entry.default_value;
			existing.value_type = entry.value_type;
			trace!(category = %self.category, field = %key, "refreshed field metadata");
			return;
		}

		if !overwrite && !entry.default_value.is_empty() {
			entry.current_value = entry.default_value.clone();
		}
		let apply_now = entry.variant.is_empty();
		self.entries.insert(key.clone(), entry);
		trace!(category = %self.category, field = %key, overwrite, "installed field");
		if apply_now {
			self.apply_key(&key, None);
		}
	}
}
