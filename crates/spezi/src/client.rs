//! One category's configuration lifecycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexSet;
use spezi_codec::ValueCodec;
use spezi_tree::{ConfigTree, TreeError, store};
use tracing::{debug, error};

use crate::catalog::TypeResolver;
use crate::field::FieldRegistry;


/// Lifecycle notifications of a [`ConfigClient`].
///
/// Observers run while the owning registry is locked and must not call back
/// into it.
pub trait ConfigObserver: Send + Sync {
	/// Called after stored values were loaded.
	fn on_load(&self, _client: &ConfigClient) {}

	/// Called after values were applied.
	fn after_apply(&self, _client: &ConfigClient) {}
}

/// Where a client is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
	Unloaded,
	Loaded,
	Applied,
}

/// Registered types, field index and storage of one category.
pub struct ConfigClient {
	name: String,
	path: PathBuf,
	fields: FieldRegistry,
	types: IndexSet<String>,
	observers: ArcSwap<Vec<Arc<dyn ConfigObserver>>>,
	config: ConfigTree,
	state: ClientState,
}

impl ConfigClient {
	/// Creates an unloaded client storing into `<dir>/<name>.kdl`.
	pub fn new(
		name: impl Into<String>,
		dir: impl Into<PathBuf>,
		resolver: Arc<dyn TypeResolver>,
		codec: Arc<dyn ValueCodec>,
	) -> Self {
		let name = name.into();
		Self {
			fields: FieldRegistry::new(name.clone(), resolver, codec),
			name,
			path: dir.into(),
			types: IndexSet::new(),
			observers: ArcSwap::from_pointee(Vec::new()),
			config: ConfigTree::new(),
			state: ClientState::Unloaded,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Storage directory.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Storage file of this category.
	pub fn file_path(&self) -> PathBuf {
		store::category_path(&self.path, &self.name)
	}

	pub fn state(&self) -> ClientState {
		self.state
	}

	pub fn fields(&self) -> &FieldRegistry {
		&self.fields
	}

	pub fn fields_mut(&mut self) -> &mut FieldRegistry {
		&mut self.fields
	}

	/// Registered type ids in registration order.
	pub fn types(&self) -> impl Iterator<Item = &str> {
		self.types.iter().map(String::as_str)
	}

	/// Registers a type and discovers it without overwriting loaded values.
	///
	/// A client that already applied its config also applies the type's
	/// default variant, so a late type picks up stored values.
	pub fn put_type(&mut self, type_name: &str) {
		self.types.insert(type_name.to_string());
		self.fields.discover(type_name, false);
		if self.state == ClientState::Applied {
			self.fields.apply_type(type_name, "");
		}
	}

	/// Re-discovers every registered type, capturing live static values.
	pub fn read_types(&mut self) {
		for type_name in &self.types {
			self.fields.discover(type_name, true);
		}
	}

	/// Ingests the stored tree only.
	pub fn load_file_config(&mut self) {
		let tree = self.file_config();
		self.fields.ingest(&tree);
		self.config = tree;
		self.state = ClientState::Loaded;
		self.notify_load();
	}

	/// Ingests the stored tree, discovers every registered type and returns
	/// the effective tree.
	pub fn load_config(&mut self) -> ConfigTree {
		let tree = self.file_config();
		self.fields.ingest(&tree);
		for type_name in &self.types {
			self.fields.discover(type_name, false);
		}
		self.config = self.fields.render_effective();
		self.state = ClientState::Loaded;
		self.notify_load();
		self.config.clone()
	}

	/// Applies every layer to static storage, loading first if needed.
	///
	/// The last loaded snapshot is not ingested again, so values captured by
	/// [`ConfigClient::read_types`] or set by overrides since then are kept.
	pub fn apply_config(&mut self) {
		if self.state == ClientState::Unloaded {
			self.load_config();
		}
		self.fields.apply_all(None);
		self.state = ClientState::Applied;
		debug!(category = %self.name, entries = self.fields.len(), "applied config");
		for observer in self.observers.load().iter() {
			observer.after_apply(self);
		}
	}

	/// Persists the minimal tree. Failures are logged and return false.
	pub fn save_current_config(&self) -> bool {
		match self.try_save_current_config() {
			Ok(()) => true,
			Err(e) => {
				error!(category = %self.name, error = %e, "unable to save config");
				false
			}
		}
	}

	pub fn try_save_current_config(&self) -> Result<(), TreeError> {
		store::save(&self.fields.render_minimal(), self.file_path())
	}

	/// The tree captured by the last load.
	pub fn config(&self) -> &ConfigTree {
		&self.config
	}

	pub fn effective_config(&self) -> ConfigTree {
		self.fields.render_effective()
	}

	pub fn minimal_config(&self) -> ConfigTree {
		self.fields.render_minimal()
	}

	/// The stored tree. A missing or unreadable file yields an empty tree.
	pub fn file_config(&self) -> ConfigTree {
		let path = self.file_path();
		match store::load(&path) {
			Ok(tree) => tree,
			Err(e) => {
				error!(
					category = %self.name,
					path = %path.display(),
					error = %e,
					"unable to load config"
				);
				ConfigTree::new()
			}
		}
	}

	/// The effective tree with the stored tree merged over it.
	pub fn combined_config(&self) -> ConfigTree {
		let mut tree = self.effective_config();
		tree.merge(&self.file_config());
		tree
	}

	pub fn add_observer(&self, observer: Arc<dyn ConfigObserver>) {
		self.observers.rcu(|cur| {
			let mut next = (**cur).clone();
			next.push(observer.clone());
			next
		});
	}

	/// Removes `observer`, comparing by pointer.
	pub fn remove_observer(&self, observer: &Arc<dyn ConfigObserver>) {
		self.observers.rcu(|cur| {
			let mut next = (**cur).clone();
			next.retain(|o| !Arc::ptr_eq(o, observer));
			next
		});
	}

	fn notify_load(&self) {
		for observer in self.observers.load().iter() {
			observer.on_load(self);
		}
	}
}

impl std::fmt::Debug for ConfigClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ConfigClient")
			.field("name", &self.name)
			.field("path", &self.path)
			.field("state", &self.state)
			.field("types", &self.types)
			.field("fields", &self.fields)
			.finish_non_exhaustive()
	}
}
