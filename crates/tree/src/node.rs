use indexmap::IndexMap;

/// A named node of a [`ConfigTree`](crate::ConfigTree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
	name: String,
	value: Option<String>,
	attributes: IndexMap<String, String>,
	children: Vec<ConfigNode>,
}

impl ConfigNode {
	/// Creates an empty node called `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Builder form of [`ConfigNode::set_value`].
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Builder form of [`ConfigNode::set_attribute`].
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_attribute(name, value);
		self
	}

	/// Builder form of [`ConfigNode::push_child`].
	pub fn with_child(mut self, child: ConfigNode) -> Self {
		self.children.push(child);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}

	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	pub fn set_value(&mut self, value: impl Into<String>) {
		self.value = Some(value.into());
	}

	pub fn clear_value(&mut self) {
		self.value = None;
	}

	/// Returns the attribute `name`, if present.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	/// Sets an attribute, keeping its original position when it already exists.
	pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.attributes.insert(name.into(), value.into());
	}

	/// Iterates attributes in insertion order.
	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn children(&self) -> &[ConfigNode] {
		&self.children
	}

	pub fn children_mut(&mut self) -> &mut Vec<ConfigNode> {
		&mut self.children
	}

	/// Returns the first child called `name`.
	pub fn child(&self, name: &str) -> Option<&ConfigNode> {
		self.children.iter().find(|c| c.name == name)
	}

	pub fn child_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
		self.children.iter_mut().find(|c| c.name == name)
	}

	/// Returns the first child called `name`, appending an empty one if absent.
	pub fn get_or_insert_child(&mut self, name: &str) -> &mut ConfigNode {
		let idx = match self.children.iter().position(|c| c.name == name) {
			Some(idx) => idx,
			None => {
				self.children.push(ConfigNode::new(name));
				self.children.len() - 1
			}
		};
		&mut self.children[idx]
	}

	pub fn push_child(&mut self, child: ConfigNode) {
		self.children.push(child);
	}

	/// A leaf has no children. Its value may still be absent.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	/// Merges `other` into this node.
	///
	/// Attributes and a present value of `other` win. Children are matched by
	/// name and merged recursively; unmatched children are appended in order.
	pub fn merge(&mut self, other: &ConfigNode) {
		if let Some(value) = &other.value {
			self.value = Some(value.clone());
		}
		for (k, v) in &other.attributes {
			self.attributes.insert(k.clone(), v.clone());
		}
		for child in &other.children {
			match self.child_mut(&child.name) {
				Some(existing) => existing.merge(child),
				None => self.children.push(child.clone()),
			}
		}
	}

	pub(crate) fn collect_leaves(&self, prefix: &mut Vec<String>, out: &mut Vec<(String, String)>) {
		if self.is_leaf() {
			if let Some(value) = &self.value {
				out.push((prefix.join("."), value.clone()));
			}
			return;
		}
		for child in &self.children {
			prefix.push(child.name.clone());
			child.collect_leaves(prefix, out);
			prefix.pop();
		}
	}
}
