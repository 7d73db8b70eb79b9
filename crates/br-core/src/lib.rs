/// Bit-indexed tables, configuration and shared errors for brascii.
///
/// This crate holds the binary trie every conversion table is built on,
/// plus the configuration and error types shared across the workspace.

pub mod bits;
pub mod config;
pub mod error;
pub mod table;

pub use config::TablesConfig;
pub use error::TableError;
pub use table::{BitIndexedTable, ImportReport};
