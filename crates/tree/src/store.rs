//! KDL persistence for config trees.
//!
//! A tree is stored as a document with a single top-level node: the root. Its
//! attributes are properties, and each child maps to a KDL node whose first
//! argument is the value and whose properties are the attributes. A document
//! with several top-level nodes loads as their unnamed parent.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use tracing::{debug, trace};

use crate::error::{Result, TreeError};
use crate::node::ConfigNode;
use crate::tree::ConfigTree;


/// File extension of stored trees.
pub const FILE_EXTENSION: &str = "kdl";

/// Returns the storage file of `category` below `dir`.
pub fn category_path(dir: impl AsRef<Path>, category: &str) -> PathBuf {
	dir.as_ref().join(format!("{category}.{FILE_EXTENSION}"))
}

/// Loads a tree from `path`. A missing file yields an empty tree.
pub fn load(path: impl AsRef<Path>) -> Result<ConfigTree> {
	let path = path.as_ref();
	let content = match fs::read_to_string(path) {
		Ok(content) => content,
		Err(e) if e.kind() == ErrorKind::NotFound => {
			debug!(path = %path.display(), "no stored config, starting empty");
			return Ok(ConfigTree::new());
		}
		Err(e) => {
			return Err(TreeError::Io {
				path: path.to_path_buf(),
				error: e,
			});
		}
	};
	let tree = parse(&content)?;
	debug!(path = %path.display(), leaves = tree.leaf_values().len(), "loaded config");
	Ok(tree)
}

/// Saves `tree` to `path`, creating parent directories and replacing any
/// existing file.
pub fn save(tree: &ConfigTree, path: impl AsRef<Path>) -> Result<()> {
	let path = path.as_ref();
	let io_err = |error| TreeError::Io {
		path: path.to_path_buf(),
		error,
	};
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(io_err)?;
	}
	fs::write(path, to_string(tree)).map_err(io_err)?;
	debug!(path = %path.display(), "saved config");
	Ok(())
}

/// Parses KDL text into a tree.
pub fn parse(text: &str) -> Result<ConfigTree> {
	let doc: KdlDocument = text.parse()?;
	Ok(from_kdl(&doc))
}

/// Formats a tree as KDL text.
pub fn to_string(tree: &ConfigTree) -> String {
	let mut doc = to_kdl(tree);
	doc.autoformat();
	doc.to_string()
}

/// Converts a KDL document into a tree.
pub fn from_kdl(doc: &KdlDocument) -> ConfigTree {
	match doc.nodes() {
		[] => ConfigTree::new(),
		[root] => ConfigTree::from_root(node_from_kdl(root)),
		nodes => {
			let mut root = ConfigNode::new("");
			for node in nodes {
				root.push_child(node_from_kdl(node));
			}
			ConfigTree::from_root(root)
		}
	}
}

/// Converts a tree into a KDL document. An empty tree yields an empty document.
pub fn to_kdl(tree: &ConfigTree) -> KdlDocument {
	let mut doc = KdlDocument::new();
	if !tree.is_empty() {
		doc.nodes_mut().push(node_to_kdl(tree.root()));
	}
	doc
}

fn node_to_kdl(node: &ConfigNode) -> KdlNode {
	let mut out = KdlNode::new(node.name());
	if let Some(value) = node.value() {
		out.push(KdlEntry::new(KdlValue::String(value.to_string())));
	}
	for (name, value) in node.attributes() {
		out.push(KdlEntry::new_prop(name, KdlValue::String(value.to_string())));
	}
	if !node.is_leaf() {
		let mut children = KdlDocument::new();
		for child in node.children() {
			children.nodes_mut().push(node_to_kdl(child));
		}
		out.set_children(children);
	}
	out
}

fn node_from_kdl(node: &KdlNode) -> ConfigNode {
	let mut out = ConfigNode::new(node.name().value());
	for entry in node.entries() {
		let Some(text) = value_text(entry.value()) else {
			continue;
		};
		match entry.name() {
			Some(name) => out.set_attribute(name.value(), text),
			None if out.value().is_none() => out.set_value(text),
			None => trace!(node = node.name().value(), "ignoring extra argument"),
		}
	}
	if let Some(children) = node.children() {
		for child in children.nodes() {
			out.push_child(node_from_kdl(child));
		}
	}
	out
}

/// Textual form of a scalar; hand-written non-string values are accepted.
fn value_text(value: &KdlValue) -> Option<String> {
	match value {
		KdlValue::String(s) => Some(s.clone()),
		KdlValue::Integer(i) => Some(i.to_string()),
		KdlValue::Float(f) => Some(f.to_string()),
		KdlValue::Bool(b) => Some(b.to_string()),
		KdlValue::Null => None,
	}
}
