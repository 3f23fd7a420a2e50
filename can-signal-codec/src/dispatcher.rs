//! Main dispatch API
//!
//! This module provides the primary interface for the codec library.
//! The Dispatcher routes a message ID to its catalog definition and runs the
//! generic message codec on it, in both directions. It also resolves raw bus
//! frames, where J1939 messages arrive under a 29-bit identifier that carries
//! the PGN together with priority and source address.

use crate::config::CodecConfig;
use crate::j1939;
use crate::message_codec::MessageCodec;
use crate::signals::{CatalogStats, IdKind, MessageCatalog, MessageDefinition};
use crate::types::{CanFrame, CodecError, DecodeError, DecodedFrame, DecodedMessage, EncodeError};

/// The dispatcher - entry point for all decode and encode operations
#[derive(Debug, Clone)]
pub struct Dispatcher<'c> {
    /// Message definitions, keyed by PGN or CAN ID
    catalog: &'c MessageCatalog,

    /// Frame filters and ID resolution settings
    config: CodecConfig,
}

impl Dispatcher<'static> {
    /// Create a dispatcher over the built-in catalog
    pub fn new() -> Self {
        Self::with_catalog(MessageCatalog::standard())
    }
}

impl<'c> Dispatcher<'c> {
    /// Create a dispatcher over a custom catalog
    pub fn with_catalog(catalog: &'c MessageCatalog) -> Self {
        Self {
            catalog,
            config: CodecConfig::default(),
        }
    }

    /// Builder method: replace the configuration
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Get statistics about the loaded catalog
    pub fn catalog_stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    /// Definition registered under an ID (PGN or CAN ID)
    pub fn definition(&self, id: u32) -> Option<&'static MessageDefinition> {
        self.catalog.get_message(id)
    }

    /// Decode a payload received under a message ID
    ///
    /// # Arguments
    /// * `id` - PGN or CAN ID as registered in the catalog
    /// * `payload` - Frame data bytes
    ///
    /// # Returns
    /// * `Ok(DecodedMessage)` - every signal active for the payload
    /// * `Err(DecodeError::UnknownMessage)` - no definition for the ID, or a
    ///   multiplexed message whose selector names no channel
    /// * `Err(DecodeError::Malformed)` - wrong length or a bad payload
    ///
    /// # Example
    /// ```
    /// use can_signal_codec::{Dispatcher, SignalValue};
    ///
    /// let dispatcher = Dispatcher::new();
    /// let message = dispatcher
    ///     .decode(0x521, &[0x00, 0x12, 0x00, 0x00, 0x03, 0xE8])
    ///     .unwrap();
    /// assert_eq!(message.value("Current"), Some(&SignalValue::Integer(1000)));
    /// ```
    pub fn decode(&self, id: u32, payload: &[u8]) -> Result<DecodedMessage, DecodeError> {
        let message_def = self.catalog.get_message(id).ok_or_else(|| {
            log::trace!("Unknown message ID 0x{:X}, skipping", id);
            DecodeError::UnknownMessage {
                id,
                multiplexer: None,
            }
        })?;

        log::debug!("Decoding message: {} (ID 0x{:X})", message_def.name, id);

        MessageCodec::decode(message_def, payload).map_err(|e| match e {
            CodecError::UnknownMultiplexer { value, .. } => {
                log::trace!(
                    "Unknown multiplexer 0x{:02X} in {} (ID 0x{:X})",
                    value,
                    message_def.name,
                    id
                );
                DecodeError::UnknownMessage {
                    id,
                    multiplexer: Some(value),
                }
            }
            source => {
                log::warn!("Malformed {} (ID 0x{:X}): {}", message_def.name, id, source);
                DecodeError::Malformed { id, source }
            }
        })
    }

    /// Alias of [`Dispatcher::decode`]
    pub fn decode_message(&self, id: u32, payload: &[u8]) -> Result<DecodedMessage, DecodeError> {
        self.decode(id, payload)
    }

    /// Encode a message record into its payload
    ///
    /// The record's `id` selects the definition. Values outside a signal's
    /// range are rejected, never clamped.
    pub fn encode(&self, message: &DecodedMessage) -> Result<Vec<u8>, EncodeError> {
        let message_def = self
            .catalog
            .get_message(message.id)
            .ok_or(EncodeError::UnknownMessage(message.id))?;

        log::debug!("Encoding message: {} (ID 0x{:X})", message_def.name, message.id);

        MessageCodec::encode(message_def, message).map_err(|source| {
            log::warn!(
                "Rejected {} (ID 0x{:X}): {}",
                message_def.name,
                message.id,
                source
            );
            EncodeError::Rejected {
                id: message.id,
                source,
            }
        })
    }

    /// Decode a raw bus frame
    ///
    /// The exact arbitration ID is looked up first among CAN-ID-keyed
    /// messages. Extended frames without an exact match fall back to their
    /// J1939 PGN when `resolve_pgn` is set.
    ///
    /// # Returns
    /// * `Ok(Some(DecodedFrame))` - the frame decoded
    /// * `Ok(None)` - the frame was filtered out by the configuration
    /// * `Err(DecodeError)` - as for [`Dispatcher::decode`]
    pub fn decode_frame(&self, frame: &CanFrame) -> Result<Option<DecodedFrame>, DecodeError> {
        if !self.config.should_process_channel(frame.channel) {
            return Ok(None);
        }

        let Some((id, message_def)) = self.resolve(frame) else {
            if !self.config.should_process_message(frame.can_id) {
                return Ok(None);
            }
            log::trace!("Unknown CAN ID 0x{:X} on channel {}", frame.can_id, frame.channel);
            return Err(DecodeError::UnknownMessage {
                id: frame.can_id,
                multiplexer: None,
            });
        };

        if !self.config.should_process_message(id) {
            return Ok(None);
        }

        let source_address = frame
            .is_extended
            .then(|| j1939::source_address(frame.can_id));
        if let Some(address) = source_address {
            if !self.config.should_process_source_address(address) {
                return Ok(None);
            }
        }

        let message = self.decode(id, &frame.data)?;

        Ok(Some(DecodedFrame {
            timestamp: frame.timestamp(),
            channel: frame.channel,
            can_id: frame.can_id,
            pgn: (message_def.id_kind == IdKind::Pgn).then_some(id),
            source_address,
            message,
        }))
    }

    /// Encode a message record into a bus frame
    ///
    /// PGN-keyed messages get a priority 6 J1939 identifier carrying
    /// `source_address`; CAN-ID-keyed messages are sent under their own ID
    /// and ignore it.
    pub fn encode_frame(
        &self,
        message: &DecodedMessage,
        source_address: u8,
    ) -> Result<CanFrame, EncodeError> {
        let data = self.encode(message)?;
        let message_def = self
            .catalog
            .get_message(message.id)
            .ok_or(EncodeError::UnknownMessage(message.id))?;

        let frame = match message_def.id_kind {
            IdKind::Pgn => {
                let can_id = j1939::can_id_from_pgn(
                    message_def.id,
                    j1939::DEFAULT_PRIORITY,
                    source_address,
                );
                CanFrame {
                    is_extended: true,
                    ..CanFrame::new(can_id, data)
                }
            }
            IdKind::CanId => CanFrame::new(message_def.id, data),
        };
        Ok(frame)
    }

    /// Find the catalog entry for a frame, returning the ID it matched under
    ///
    /// PGN-keyed entries are reached only through the PGN of an extended
    /// identifier, never by comparing the raw arbitration ID with the PGN.
    fn resolve(&self, frame: &CanFrame) -> Option<(u32, &'static MessageDefinition)> {
        let exact = self
            .catalog
            .get_message(frame.can_id)
            .filter(|message_def| message_def.id_kind == IdKind::CanId);
        if let Some(message_def) = exact {
            return Some((frame.can_id, message_def));
        }

        if !(frame.is_extended && self.config.resolve_pgn) {
            return None;
        }

        let pgn = j1939::pgn_from_can_id(frame.can_id)?;
        self.catalog
            .get_message(pgn)
            .filter(|message_def| message_def.id_kind == IdKind::Pgn)
            .map(|message_def| (pgn, message_def))
    }
}

impl Default for Dispatcher<'static> {
    fn default() -> Self {
        Self::new()
    }
}
