use std::cmp::Ordering;

use spezi_tree::escape::escape_text;
use spezi_tree::{ConfigNode, ConfigTree};

use super::{FieldEntry, FieldRegistry};

impl FieldRegistry {
	/// Renders every typed entry with its comment and declared type.
	pub fn render_effective(&self) -> ConfigTree {
		self.render(|_| true, true)
	}

	/// Renders only typed entries whose value differs from their default.
	pub fn render_minimal(&self) -> ConfigTree {
		self.render(|e| !e.is_default(), false)
	}

	fn render(&self, select: impl Fn(&FieldEntry) -> bool, metadata: bool) -> ConfigTree {
		let mut selected: Vec<&FieldEntry> = self
			.entries
			.values()
			.filter(|e| e.value_type.is_some() && select(e))
			.collect();
		let Some(first) = selected.first() else {
			return ConfigTree::new();
		};

		let base = selected[1..]
			.iter()
			.fold(first.owner_type.clone(), |base, e| common_prefix(&base, &e.owner_type));
		selected.sort_by(|a, b| {
			cmp_ignore_case(&a.owner_type, &b.owner_type)
				.then_with(|| cmp_ignore_case(&a.field_name, &b.field_name))
		});

		let mut tree = ConfigTree::from_root(ConfigNode::new(&base).with_attribute("base", &base));
		for entry in selected {
			let leaf_name = match entry.variant.as_str() {
				"" => entry.field_name.clone(),
				variant => format!("{}:{variant}", entry.field_name),
			};
			let path = strip_base(&entry.owner_type, &base)
				.split('.')
				.filter(|s| !s.is_empty())
				.chain(std::iter::once(leaf_name.as_str()));
			let leaf = tree.add_value(path, escape_text(&entry.current_value));
			if metadata {
				leaf.set_attribute("comment", escape_text(&entry.comment));
				if let Some(ty) = entry.value_type {
					leaf.set_attribute("class", ty.name());
				}
			}
		}
		tree
	}
}

/// Longest common prefix of two dotted ids, compared segment by segment.
pub(super) fn common_prefix(a: &str, b: &str) -> String {
	a.split('.')
		.zip(b.split('.'))
		.take_while(|(x, y)| x == y)
		.map(|(x, _)| x)
		.collect::<Vec<_>>()
		.join(".")
}

fn strip_base<'a>(owner: &'a str, base: &str) -> &'a str {
	if base.is_empty() {
		return owner;
	}
	match owner.strip_prefix(base) {
		Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
		None => owner,
	}
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
	a.chars()
		.flat_map(char::to_lowercase)
		.cmp(b.chars().flat_map(char::to_lowercase))
}
