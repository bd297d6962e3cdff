//! Runtime configuration binding.
//!
//! Types declare configurable fields through [`TypeDescriptor`]s. A
//! [`FieldRegistry`] discovers those fields, ingests stored trees, layers
//! named variants over the default variant and writes the resulting values
//! into static storage or into live [`Configurable`] objects. A
//! [`ConfigClient`] drives that lifecycle for one category backed by
//! `<category>.kdl`, and the [`ConfigRegistry`] owns one client per category.
//!
//! ```
//! use std::sync::Arc;
//!
//! use spezi::{ConfigRegistry, FieldDescriptor, RwLock, TypeCatalog, TypeDescriptor};
//!
//! static RPM: RwLock<u32> = RwLock::new(0);
//!
//! let catalog = TypeCatalog::new();
//! catalog.register(
//! 	TypeDescriptor::new("plant.Pump").with_field(
//! 		FieldDescriptor::global("rpm", &RPM)
//! 			.comment("Nominal speed")
//! 			.variant("", "1200")
//! 			.variant("boost", "1800"),
//! 	),
//! );
//!
//! let dir = std::env::temp_dir().join("spezi-doc-example");
//! let registry = ConfigRegistry::builder()
//! 	.storage_path(&dir)
//! 	.resolver(Arc::new(catalog))
//! 	.build();
//! registry.register_types("plant", &["plant.Pump"]);
//! assert_eq!(*RPM.read(), 1200);
//!
//! registry.apply_variant("plant", "boost");
//! assert_eq!(*RPM.read(), 1800);
//! ```

mod access;
mod catalog;
mod client;
mod configurable;
mod descriptor;
mod error;
mod field;
mod registry;

pub use access::{ConstSlot, FieldAccess, FieldScope, GlobalSlot, MemberSlot};
pub use catalog::{TypeCatalog, TypeRegistration, TypeResolver};
pub use client::{ClientState, ConfigClient, ConfigObserver};
pub use configurable::Configurable;
pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use error::{AccessError, ApplyError, Result};
pub use field::{FieldEntry, FieldKey, FieldRegistry};
pub use parking_lot::RwLock;
pub use registry::{ConfigRegistry, DEFAULT_STORAGE_PATH, RegistryBuilder, RegistryObserver};
pub use spezi_codec::{
	CodecError, CodecRegistry, ConfigValue, Value, ValueCodec, ValueKind, ValueType, config_enum,
};
pub use spezi_tree::{ConfigNode, ConfigTree, TreeError};

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}
