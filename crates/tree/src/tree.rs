use crate::node::ConfigNode;


/// An ordered config tree with a single root node.
///
/// The root's name and attributes are tree-level metadata; the content lives
/// in its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
	root: ConfigNode,
}

impl ConfigTree {
	/// Creates an empty tree with an unnamed root.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a tree from an existing root node.
	pub fn from_root(root: ConfigNode) -> Self {
		Self { root }
	}

	pub fn root(&self) -> &ConfigNode {
		&self.root
	}

	pub fn root_mut(&mut self) -> &mut ConfigNode {
		&mut self.root
	}

	pub fn into_root(self) -> ConfigNode {
		self.root
	}

	/// True if the root carries neither children, a value nor attributes.
	pub fn is_empty(&self) -> bool {
		self.root.children().is_empty()
			&& self.root.value().is_none()
			&& self.root.attributes().next().is_none()
	}

	/// Inserts `value` at `path` below the root and returns the leaf node.
	///
	/// Existing nodes along the path are reused, so entries sharing a prefix
	/// end up under the same parent. An empty path addresses the root.
	pub fn add_value<'a, I>(&mut self, path: I, value: impl Into<String>) -> &mut ConfigNode
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut node = &mut self.root;
		for segment in path {
			node = node.get_or_insert_child(segment);
		}
		node.set_value(value);
		node
	}

	/// Merges `other` into this tree; values and attributes of `other` win.
	///
	/// An unnamed root adopts the name of `other`'s root.
	pub fn merge(&mut self, other: &ConfigTree) {
		if self.root.name().is_empty() {
			self.root.set_name(other.root.name());
		}
		self.root.merge(&other.root);
	}

	/// Looks up the node at `path` below the root.
	pub fn find<'a, I>(&self, path: I) -> Option<&ConfigNode>
	where
		I: IntoIterator<Item = &'a str>,
	{
		path
			.into_iter()
			.try_fold(&self.root, |node, segment| node.child(segment))
	}

	/// Lists every valued leaf as `(dotted path below the root, value)`.
	pub fn leaf_values(&self) -> Vec<(String, String)> {
		let mut out = Vec::new();
		let mut prefix = Vec::new();
		for child in self.root.children() {
			prefix.push(child.name().to_string());
			child.collect_leaves(&mut prefix, &mut out);
			prefix.pop();
		}
		out
	}
}
