//! Ordered config trees for spezi.
//!
//! A [`ConfigTree`] is a named hierarchy of [`ConfigNode`]s. Each node has a
//! name, an optional scalar value, ordered string attributes and ordered
//! children. Trees are built by path insertion, merged structurally and
//! persisted as KDL through the [`store`] module:
//!
//! ```kdl
//! plant base=plant {
//!     pumps {
//!         Pump {
//!             "rpm:eco" "900"
//!         }
//!     }
//! }
//! ```
//!
//! The root node carries the tree's attributes as properties, leaf values are
//! the first argument of a node, and other attributes are properties.

pub mod escape;
mod error;
mod node;
pub mod store;
mod tree;

pub use error::{Result, TreeError};
pub use node::ConfigNode;
pub use tree::ConfigTree;
