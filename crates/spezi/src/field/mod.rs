//! The field index of one category.
//!
//! A [`FieldRegistry`] holds one [`FieldEntry`] per `(owner type, field,
//! variant)` key. Entries are created by discovery from registered
//! descriptors or by ingestion of a stored tree, merged in place on every
//! later pass, and applied back to static storage or live objects.
//!
//! Every pass is best effort: a field that cannot be read, decoded or written
//! is logged and skipped, and the rest of the pass continues.

mod apply;
mod discover;
mod ingest;
mod render;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use spezi_codec::{ValueCodec, ValueType};
use tracing::warn;

use crate::catalog::TypeResolver;
use crate::descriptor::TypeDescriptor;

/// Primary key of a [`FieldEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
	pub owner_type: String,
	pub field_name: String,
	/// `""` is the default variant.
	pub variant: String,
}

impl FieldKey {
	pub fn new(
		owner_type: impl Into<String>,
		field_name: impl Into<String>,
		variant: impl Into<String>,
	) -> Self {
		Self {
			owner_type: owner_type.into(),
			field_name: field_name.into(),
			variant: variant.into(),
		}
	}
}

impl fmt::Display for FieldKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.owner_type, self.field_name)?;
		if !self.variant.is_empty() {
			write!(f, ":{}", self.variant)?;
		}
		Ok(())
	}
}

/// One configurable field under one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
	/// Declaring type id.
	pub owner_type: String,
	pub field_name: String,
	pub variant: String,
	/// Declared type; `None` until discovery has seen the field.
	pub value_type: Option<ValueType>,
	/// String form of the value to apply.
	pub current_value: String,
	/// String form of the compiled-in default of this variant.
	pub default_value: String,
	pub comment: String,
}

impl FieldEntry {
	pub fn key(&self) -> FieldKey {
		FieldKey::new(&self.owner_type, &self.field_name, &self.variant)
	}

	/// True if the current value equals the declared default.
	pub fn is_default(&self) -> bool {
		self.current_value == self.default_value
	}
}

/// Discovery, ingestion, rendering and apply for one category.
pub struct FieldRegistry {
	category: String,
	entries: IndexMap<FieldKey, FieldEntry>,
	variants: IndexSet<String>,
	resolver: Arc<dyn TypeResolver>,
	codec: Arc<dyn ValueCodec>,
}

impl FieldRegistry {
	pub fn new(
		category: impl Into<String>,
		resolver: Arc<dyn TypeResolver>,
		codec: Arc<dyn ValueCodec>,
	) -> Self {
		Self {
			category: category.into(),
			entries: IndexMap::new(),
			variants: IndexSet::new(),
			resolver,
			codec,
		}
	}

	pub fn category(&self) -> &str {
		&self.category
	}

	/// Entries in index order.
	pub fn entries(&self) -> impl Iterator<Item = &FieldEntry> {
		self.entries.values()
	}

	pub fn entry(&self, key: &FieldKey) -> Option<&FieldEntry> {
		self.entries.get(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Known variants, `""` first, then in order of first sight.
	pub fn variants(&self) -> Vec<&str> {
		std::iter::once("")
			.chain(self.variants.iter().map(String::as_str))
			.collect()
	}

	/// Records a variant. `""` is always known and never stored.
	pub fn add_variant(&mut self, variant: &str) {
		if !variant.is_empty() && !self.variants.contains(variant) {
			self.variants.insert(variant.to_string());
		}
	}

	/// Forgets a named variant; its entries stay in the index.
	pub fn remove_variant(&mut self, variant: &str) -> bool {
		self.variants.shift_remove(variant)
	}

	/// Drops every entry and named variant.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.variants.clear();
	}

	/// Resolves `type_name` and its ancestors, innermost first.
	///
	/// Resolution stops at the first unknown ancestor or at a repeated id.
	pub(crate) fn type_chain(&self, type_name: &str) -> Vec<Arc<TypeDescriptor>> {
		let mut chain = Vec::new();
		let mut seen = HashSet::new();
		let mut next = Some(type_name.to_string());
		while let Some(name) = next.take() {
			if !seen.insert(name.clone()) {
				warn!(category = %self.category, type_name = %name, "cycle in type ancestry");
				break;
			}
			let Some(ty) = self.resolver.resolve(&name) else {
				if !chain.is_empty() {
					warn!(category = %self.category, type_name = %name, "unknown ancestor type");
				}
				break;
			};
			next = ty.parent().map(str::to_string);
			chain.push(ty);
		}
		chain
	}

	/// Ids of `type_name` and its resolvable ancestors.
	pub(crate) fn chain_names(&self, type_name: &str) -> Vec<String> {
		self.type_chain(type_name)
			.iter()
			.map(|t| t.name().to_string())
			.collect()
	}
}

impl fmt::Debug for FieldRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldRegistry")
			.field("category", &self.category)
			.field("entries", &self.entries.len())
			.field("variants", &self.variants)
			.finish_non_exhaustive()
	}
}
