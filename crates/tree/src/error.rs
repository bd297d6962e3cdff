//! Error types for tree persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving a config tree.
#[derive(Debug, Error)]
pub enum TreeError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading or writing a tree file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
