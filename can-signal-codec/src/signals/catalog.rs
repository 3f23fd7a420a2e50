//! Message catalog
//!
//! The registry mapping message IDs to their static definitions. A catalog is
//! built once and never mutated afterwards; the built-in catalog is shared by
//! the whole process through `MessageCatalog::standard()`.

use super::definition::{MessageDefinition, SignalDefinition};
use crate::types::{CodecError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Immutable registry of message definitions
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    /// All message definitions by ID (PGN or CAN ID)
    messages: HashMap<u32, &'static MessageDefinition>,

    /// Message name lookup
    message_lookup: HashMap<&'static str, u32>,

    /// Signal name lookup for quick access
    /// Key: Signal name, Value: List of (message ID, signal index) tuples
    signal_lookup: HashMap<&'static str, Vec<(u32, usize)>>,
}

impl MessageCatalog {
    /// Build a catalog from definitions.
    ///
    /// Fails if two definitions share an ID or a definition has a signal
    /// that does not fit its payload.
    pub fn new<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'static MessageDefinition>,
    {
        let mut catalog = Self::default();

        for message in definitions {
            message.validate()?;

            if catalog.messages.contains_key(&message.id) {
                return Err(CodecError::DuplicateMessage(message.id));
            }

            for (sig_idx, signal) in message.signals.iter().enumerate() {
                catalog
                    .signal_lookup
                    .entry(signal.name)
                    .or_insert_with(Vec::new)
                    .push((message.id, sig_idx));
            }
            catalog.message_lookup.insert(message.name, message.id);
            catalog.messages.insert(message.id, message);
        }

        let stats = catalog.stats();
        log::info!(
            "Message catalog built: {} messages, {} signals",
            stats.num_messages,
            stats.num_signals
        );
        Ok(catalog)
    }

    /// Build a fresh catalog of every message this crate knows
    pub fn builtin() -> Result<Self> {
        Self::new(crate::messages::all())
    }

    /// The built-in catalog, shared by the whole process
    ///
    /// # Panics
    /// If the built-in tables are inconsistent (a duplicate ID or a signal
    /// outside its payload). `builtin()` reports the same condition as an error.
    pub fn standard() -> &'static MessageCatalog {
        static CATALOG: OnceLock<MessageCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::builtin().expect("built-in message tables have unique IDs and fit their payloads")
        })
    }

    /// Get the message definition registered under an ID
    pub fn get_message(&self, id: u32) -> Option<&'static MessageDefinition> {
        self.messages.get(&id).copied()
    }

    /// Get message definition by name
    pub fn get_message_by_name(&self, message_name: &str) -> Option<&'static MessageDefinition> {
        self.message_lookup
            .get(message_name)
            .and_then(|id| self.get_message(*id))
    }

    /// Find all messages containing a specific signal name
    pub fn find_signal(&self, signal_name: &str) -> Vec<(u32, &'static SignalDefinition)> {
        let mut found: Vec<(u32, &'static SignalDefinition)> = self
            .signal_lookup
            .get(signal_name)
            .map(|locations| {
                locations
                    .iter()
                    .filter_map(|(id, sig_idx)| {
                        self.get_message(*id)
                            .and_then(|msg| msg.signals.get(*sig_idx))
                            .map(|sig| (*id, sig))
                    })
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|(id, _)| *id);
        found
    }

    /// Iterate over all definitions, in no particular order
    pub fn definitions(&self) -> impl Iterator<Item = &'static MessageDefinition> + '_ {
        self.messages.values().copied()
    }

    /// Get catalog statistics
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            num_messages: self.messages.len(),
            num_signals: self.messages.values().map(|msg| msg.signals.len()).sum(),
            num_multiplexed: self.messages.values().filter(|msg| msg.is_multiplexed()).count(),
        }
    }

    /// Get all IDs in the catalog, sorted
    pub fn get_all_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.messages.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    /// Total number of message definitions
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
    /// Messages carrying a multiplexer signal
    pub num_multiplexed: usize,
}
