use spezi_tree::escape::unescape_text;
use spezi_tree::{ConfigNode, ConfigTree};
use tracing::{info, trace};

use super::{FieldEntry, FieldKey, FieldRegistry};
use crate::descriptor::TypeDescriptor;

impl FieldRegistry {
	/// Merges the values of a stored tree into the index.
	///
	/// The root's `base` attribute is the common type prefix the tree was
	/// compacted with. Nodes are probed from there: a path that resolves to a
	/// type holds that type's fields as leaves, any other path is a namespace
	/// segment. Existing entries get their current value replaced; unknown
	/// ones are added without a default or declared type. Fields and types
	/// that no longer exist are logged and skipped.
	pub fn ingest(&mut self, tree: &ConfigTree) {
		let root = tree.root();
		let base = root.attribute("base").unwrap_or_default().to_string();
		self.ingest_node(&base, root);
	}

	fn ingest_node(&mut self, path: &str, node: &ConfigNode) {
		if !path.is_empty()
			&& let Some(ty) = self.resolver.resolve(path)
		{
			for child in node.children() {
				if child.is_leaf() {
					self.ingest_leaf(&ty, child);
					continue;
				}
				// A field named like a nested type shares its node.
				let field_name = child.name().split_once(':').map_or(child.name(), |(f, _)| f);
				if child.value().is_some() && ty.field(field_name).is_some() {
					self.ingest_leaf(&ty, child);
				}
				self.ingest_node(&join(path, child.name()), child);
			}
			return;
		}

		for child in node.children() {
			if child.is_leaf() {
				info!(
					category = %self.category,
					type_name = path,
					field = child.name(),
					"type vanished"
				);
				continue;
			}
			self.ingest_node(&join(path, child.name()), child);
		}
	}

	fn ingest_leaf(&mut self, ty: &TypeDescriptor, node: &ConfigNode) {
		let (field_name, variant) = node.name().split_once(':').unwrap_or((node.name(), ""));
		if ty.field(field_name).is_none() {
			info!(
				category = %self.category,
				type_name = ty.name(),
				field = field_name,
				"field vanished"
			);
			return;
		}

		let value = node.value().map(unescape_text).unwrap_or_default();
		let key = FieldKey::new(ty.name(), field_name, variant);
		self.add_variant(variant);
		trace!(category = %self.category, field = %key, value = %value, "ingested value");
		match self.entries.get_mut(&key) {
			Some(existing) => existing.current_value = value,
			None => {
				let entry = FieldEntry {
					owner_type: key.owner_type.clone(),
					field_name: key.field_name.clone(),
					variant: key.variant.clone(),
					value_type: None,
					current_value: value,
					default_value: String::new(),
					comment: node.attribute("comment").map(unescape_text).unwrap_or_default(),
				};
				self.entries.insert(key, entry);
			}
		}
	}
}

fn join(path: &str, segment: &str) -> String {
	if path.is_empty() {
		segment.to_string()
	} else {
		format!("{path}.{segment}")
	}
}
