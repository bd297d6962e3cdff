//! Type resolution for discovery and ingestion.
//!
//! The engine never inspects types at runtime. It asks a [`TypeResolver`]
//! whether a dotted id names a declaring type. [`TypeCatalog`] is the default
//! resolver: an [`ArcSwap`] snapshot fed by explicit registration and by
//! [`register_type!`](crate::register_type) submissions collected at link time.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::TypeDescriptor;

/// Resolves a type id to its descriptor.
pub trait TypeResolver: Send + Sync {
	fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

/// Link-time registration of a type descriptor.
pub struct TypeRegistration {
	pub build: fn() -> TypeDescriptor,
}

impl TypeRegistration {
	pub const fn new(build: fn() -> TypeDescriptor) -> Self {
		Self { build }
	}
}

inventory::collect!(TypeRegistration);

/// Submits a descriptor builder to every [`TypeCatalog::from_inventory`].
///
/// ```
/// fn pump() -> spezi::TypeDescriptor {
/// 	spezi::TypeDescriptor::new("plant.Pump")
/// }
/// spezi::register_type!(pump);
///
/// # fn main() {
/// let catalog = spezi::TypeCatalog::from_inventory();
/// assert!(catalog.get("plant.Pump").is_some());
/// # }
/// ```
#[macro_export]
macro_rules! register_type {
	($build:path) => {
		$crate::__private::inventory::submit! {
			$crate::TypeRegistration::new($build)
		}
	};
}

#[derive(Clone, Default)]
struct CatalogSnapshot {
	types: IndexMap<Box<str>, Arc<TypeDescriptor>>,
}

/// Copy-on-write table of type descriptors keyed by id.
pub struct TypeCatalog {
	snap: ArcSwap<CatalogSnapshot>,
}

impl Default for TypeCatalog {
	fn default() -> Self {
		Self::new()
	}
}

impl TypeCatalog {
	/// Creates an empty catalog.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(CatalogSnapshot::default()),
		}
	}

	/// Creates a catalog holding every [`register_type!`](crate::register_type) submission.
	pub fn from_inventory() -> Self {
		let catalog = Self::new();
		for reg in inventory::iter::<TypeRegistration> {
			catalog.register((reg.build)());
		}
		catalog
	}

	/// Registers a descriptor, returning the one it replaced.
	pub fn register(&self, ty: TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
		let ty = Arc::new(ty);
		let name: Box<str> = ty.name().into();
		let prev = self.snap.rcu(|cur| {
			let mut next = (**cur).clone();
			next.types.insert(name.clone(), ty.clone());
			next
		});
		debug!(type_name = %name, "registered configurable type");
		prev.types.get(&name).cloned()
	}

	pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
		self.snap.load().types.get(name).cloned()
	}

	/// Registered ids in registration order.
	pub fn names(&self) -> Vec<String> {
		self.snap.load().types.keys().map(|k| k.to_string()).collect()
	}

	pub fn len(&self) -> usize {
		self.snap.load().types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl TypeResolver for TypeCatalog {
	fn resolve(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
		self.get(name)
	}
}
