//! Category-keyed table of config clients.
//!
//! [`ConfigRegistry`] is an owned service. Every operation takes its single
//! lock, resolves the category to a client and delegates. Resolving an
//! unknown category creates its client: the client is registered, registry
//! observers are told, its stored tree is ingested and its config applied.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::Mutex;
use spezi_codec::{CodecRegistry, ValueCodec};
use spezi_tree::ConfigTree;
use tracing::{debug, error, warn};

use crate::catalog::{TypeCatalog, TypeResolver};
use crate::client::{ConfigClient, ConfigObserver};
use crate::configurable::Configurable;


/// Default storage directory, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = "config";

/// Notified when a category's client is first created.
pub trait RegistryObserver: Send + Sync {
	fn on_new_client(&self, category: &str);
}

type Observers = ArcSwap<Vec<Arc<dyn RegistryObserver>>>;

struct RegistryInner {
	clients: IndexMap<String, ConfigClient>,
	storage_path: PathBuf,
	resolver: Arc<dyn TypeResolver>,
	codec: Arc<dyn ValueCodec>,
}

impl RegistryInner {
	fn client(&mut self, category: &str, observers: &Observers) -> &mut ConfigClient {
		match self.clients.entry(category.to_string()) {
			Entry::Occupied(e) => e.into_mut(),
			Entry::Vacant(e) => {
				let client = e.insert(ConfigClient::new(
					category,
					self.storage_path.clone(),
					self.resolver.clone(),
					self.codec.clone(),
				));
				debug!(category, path = %client.file_path().display(), "created config client");
				for observer in observers.load().iter() {
					observer.on_new_client(category);
				}
				client.load_file_config();
				client.apply_config();
				client
			}
		}
	}
}

/// Builder for [`ConfigRegistry`].
pub struct RegistryBuilder {
	storage_path: PathBuf,
	resolver: Option<Arc<dyn TypeResolver>>,
	codec: Arc<dyn ValueCodec>,
}

impl Default for RegistryBuilder {
	fn default() -> Self {
		Self {
			storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
			resolver: None,
			codec: Arc::new(CodecRegistry::new()),
		}
	}
}

impl RegistryBuilder {
	/// Directory holding one `<category>.kdl` file per category.
	pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.storage_path = path.into();
		self
	}

	/// Type resolver. Defaults to [`TypeCatalog::from_inventory`].
	pub fn resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
		self.resolver = Some(resolver);
		self
	}

	/// Value codec. Defaults to the built-in [`CodecRegistry`].
	pub fn codec(mut self, codec: Arc<dyn ValueCodec>) -> Self {
		self.codec = codec;
		self
	}

	pub fn build(self) -> ConfigRegistry {
		let resolver = self
			.resolver
			.unwrap_or_else(|| Arc::new(TypeCatalog::from_inventory()));
		ConfigRegistry {
			inner: Mutex::new(RegistryInner {
				clients: IndexMap::new(),
				storage_path: self.storage_path,
				resolver,
				codec: self.codec,
			}),
			observers: ArcSwap::from_pointee(Vec::new()),
		}
	}
}

/// Process-wide table of config clients, one per category.
pub struct ConfigRegistry {
	inner: Mutex<RegistryInner>,
	observers: Observers,
}

impl ConfigRegistry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::default()
	}

	/// Creates a registry with the default storage path and codec.
	pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
		Self::builder().resolver(resolver).build()
	}

	/// Creates the storage directory. Failure is logged.
	pub fn init(&self) {
		let path = self.storage_path();
		match fs::create_dir_all(&path) {
			Ok(()) => debug!(path = %path.display(), "config storage ready"),
			Err(e) => error!(path = %path.display(), error = %e, "could not create config storage"),
		}
	}

	/// Drops every client. Later calls create fresh clients.
	pub fn shutdown(&self) {
		let mut inner = self.inner.lock();
		debug!(clients = inner.clients.len(), "shutting down config registry");
		inner.clients.clear();
	}

	pub fn storage_path(&self) -> PathBuf {
		self.inner.lock().storage_path.clone()
	}

	/// Changes the storage directory. Ignored once any client exists.
	pub fn set_default_storage_path(&self, path: impl AsRef<Path>) {
		let mut inner = self.inner.lock();
		if !inner.clients.is_empty() {
			warn!(
				path = %path.as_ref().display(),
				"storage path must be set before the first category is used"
			);
			return;
		}
		inner.storage_path = path.as_ref().to_path_buf();
	}

	/// Runs `f` on the client of `category`, creating it if needed.
	pub fn with_client<R>(&self, category: &str, f: impl FnOnce(&mut ConfigClient) -> R) -> R {
		let mut inner = self.inner.lock();
		f(inner.client(category, &self.observers))
	}

	/// Registers types under `category` and discovers them.
	pub fn register_types(&self, category: &str, types: &[&str]) {
		self.with_client(category, |client| {
			for type_name in types {
				client.put_type(type_name);
			}
		});
	}

	/// Persists the minimal config of `category`.
	pub fn save(&self, category: &str) -> bool {
		self.with_client(category, |client| client.save_current_config())
	}

	pub fn register_observer(&self, category: &str, observer: Arc<dyn ConfigObserver>) {
		self.with_client(category, |client| client.add_observer(observer));
	}

	pub fn unregister_observer(&self, category: &str, observer: &Arc<dyn ConfigObserver>) {
		self.with_client(category, |client| client.remove_observer(observer));
	}

	/// Applies `variant` to static storage.
	pub fn apply_variant(&self, category: &str, variant: &str) {
		self.with_client(category, |client| client.fields_mut().apply_variant(variant, None));
	}

	/// Applies the default variant and then `variant` to one object.
	pub fn apply_variant_to(&self, obj: &mut dyn Configurable, category: &str, variant: &str) {
		self.with_client(category, |client| {
			let fields = client.fields_mut();
			fields.apply_variant("", Some(&mut *obj));
			if !variant.is_empty() {
				fields.apply_variant(variant, Some(&mut *obj));
			}
		});
	}

	/// Applies `variant` to static storage in every existing category.
	pub fn apply_global_variant(&self, variant: &str) {
		let mut inner = self.inner.lock();
		for client in inner.clients.values_mut() {
			client.fields_mut().apply_variant(variant, None);
		}
	}

	pub fn apply_config(&self, category: &str) {
		self.with_client(category, ConfigClient::apply_config);
	}

	/// Overrides `field` of `type_name` or an ancestor under every variant.
	pub fn override_type(&self, type_name: &str, category: &str, field: &str, literal: &str) {
		self.with_client(category, |client| {
			client.fields_mut().override_type(type_name, field, literal);
		});
	}

	/// Overrides `field` for `obj`'s type chain and applies it to `obj`.
	pub fn override_instance(
		&self,
		obj: &mut dyn Configurable,
		category: &str,
		field: &str,
		literal: &str,
	) {
		self.with_client(category, |client| {
			client.fields_mut().override_instance(obj, field, literal);
		});
	}

	/// The tree captured by the last load of `category`.
	pub fn config(&self, category: &str) -> ConfigTree {
		self.with_client(category, |client| client.config().clone())
	}

	pub fn load_config(&self, category: &str) -> ConfigTree {
		self.with_client(category, ConfigClient::load_config)
	}

	/// Re-discovers the registered types of `category`, capturing live values.
	pub fn read_types(&self, category: &str) {
		self.with_client(category, ConfigClient::read_types);
	}

	/// Category names in creation order.
	pub fn categories(&self) -> Vec<String> {
		self.inner.lock().clients.keys().cloned().collect()
	}

	pub fn add_registry_observer(&self, observer: Arc<dyn RegistryObserver>) {
		let _guard = self.inner.lock();
		self.observers.rcu(|cur| {
			let mut next = (**cur).clone();
			next.push(observer.clone());
			next
		});
	}

	pub fn remove_registry_observer(&self, observer: &Arc<dyn RegistryObserver>) {
		let _guard = self.inner.lock();
		self.observers.rcu(|cur| {
			let mut next = (**cur).clone();
			next.retain(|o| !Arc::ptr_eq(o, observer));
			next
		});
	}
}

impl Default for ConfigRegistry {
	fn default() -> Self {
		Self::builder().build()
	}
}
