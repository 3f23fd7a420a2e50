//! Signal definitions and the message catalog
//!
//! This module contains the declarative definition types every message table
//! is written in, and the immutable catalog that registers them by ID.

pub mod catalog;
pub mod definition;

// Re-export key types for convenience
pub use catalog::{CatalogStats, MessageCatalog};
pub use definition::{
    ByteOrder, Conversion, IdKind, MessageDefinition, SignalDefinition, ValueLookup, ValueType,
};
