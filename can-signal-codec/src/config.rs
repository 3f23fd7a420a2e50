//! Dispatcher configuration
//!
//! Frame filters and identifier resolution switches for the dispatcher.
//! The codec itself has no tunables; everything here decides which frames
//! reach it and how an arbitration ID is matched against the catalog.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Optional: only decode frames from these CAN channels
    #[serde(default)]
    pub channel_filter: Option<Vec<u8>>,

    /// Optional: only decode these message IDs (CAN ID or PGN)
    #[serde(default)]
    pub message_filter: Option<Vec<u32>>,

    /// Optional: only decode extended frames sent by these J1939 source addresses
    #[serde(default)]
    pub source_address_filter: Option<Vec<u8>>,

    /// Fall back to the J1939 PGN when an extended ID has no exact match
    #[serde(default = "default_true")]
    pub resolve_pgn: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            channel_filter: None,
            message_filter: None,
            source_address_filter: None,
            resolve_pgn: true,
        }
    }
}

impl CodecConfig {
    /// Create a configuration that lets every frame through
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str(content).context("Failed to parse codec configuration")?;
        Ok(config)
    }

    /// Builder method: set channel filter
    pub fn with_channel_filter(mut self, channels: Vec<u8>) -> Self {
        self.channel_filter = Some(channels);
        self
    }

    /// Builder method: set message filter
    pub fn with_message_filter(mut self, messages: Vec<u32>) -> Self {
        self.message_filter = Some(messages);
        self
    }

    /// Builder method: set source address filter
    pub fn with_source_address_filter(mut self, addresses: Vec<u8>) -> Self {
        self.source_address_filter = Some(addresses);
        self
    }

    /// Builder method: enable or disable PGN resolution
    pub fn with_pgn_resolution(mut self, enabled: bool) -> Self {
        self.resolve_pgn = enabled;
        self
    }

    /// Check if a channel should be processed
    pub fn should_process_channel(&self, channel: u8) -> bool {
        match &self.channel_filter {
            Some(channels) => channels.contains(&channel),
            None => true,
        }
    }

    /// Check if a message ID should be processed
    pub fn should_process_message(&self, id: u32) -> bool {
        match &self.message_filter {
            Some(messages) => messages.contains(&id),
            None => true,
        }
    }

    /// Check if a source address should be processed
    pub fn should_process_source_address(&self, address: u8) -> bool {
        match &self.source_address_filter {
            Some(addresses) => addresses.contains(&address),
            None => true,
        }
    }

    /// Check if a frame should be processed based on channel and ID filters.
    ///
    /// The source address filter depends on how the ID resolves and is
    /// applied by the dispatcher.
    pub fn should_process_frame(&self, channel: u8, id: u32) -> bool {
        self.should_process_channel(channel) && self.should_process_message(id)
    }
}

/// Load a configuration file
pub fn load_config(path: &Path) -> anyhow::Result<CodecConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    CodecConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))
}
