//! Core types for the signal codec library
//!
//! This module defines the values the codec produces and consumes: raw CAN
//! frames, decoded message records, signal values, and the error enums
//! returned at the codec and dispatch boundaries. Decoded records are
//! short-lived value objects; they own no external resources.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Timestamp type used throughout the codec
pub type Timestamp = DateTime<Utc>;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Raw CAN frame as handed over by the bus layer
#[derive(Debug, Clone, PartialEq)]
pub struct CanFrame {
    /// Timestamp in nanoseconds since epoch
    pub timestamp_ns: u64,
    /// CAN channel number (e.g., 0, 1, 2...)
    pub channel: u8,
    /// CAN message ID (11-bit or 29-bit)
    pub can_id: u32,
    /// Frame data bytes
    pub data: Vec<u8>,
    /// True if this is an extended (29-bit) CAN ID
    pub is_extended: bool,
}

impl CanFrame {
    /// Create a frame on channel 0 with a zero timestamp.
    ///
    /// IDs above the 11-bit range are flagged as extended.
    pub fn new(can_id: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp_ns: 0,
            channel: 0,
            can_id,
            data: data.into(),
            is_extended: can_id > 0x7FF,
        }
    }

    /// Builder method: set the receive timestamp in nanoseconds
    pub fn with_timestamp_ns(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = timestamp_ns;
        self
    }

    /// Builder method: set the CAN channel
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Convert timestamp from nanoseconds to DateTime<Utc>
    ///
    /// Depends only on `timestamp_ns`; any u64 nanosecond count is within
    /// chrono's range, and the upper bound is returned if that ever changes.
    pub fn timestamp(&self) -> Timestamp {
        let secs = (self.timestamp_ns / 1_000_000_000) as i64;
        let nsecs = (self.timestamp_ns % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nsecs).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Errors raised by the scaling primitives and the generic message codec
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Format error in {message}: expected {expected} bytes, got {actual}")]
    Format {
        message: String,
        expected: usize,
        actual: usize,
    },

    #[error("Range error: {length} bytes at offset {offset} exceed buffer of {available} bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("Range error: {signal} = {value} outside [{min}, {max}]")]
    Range {
        signal: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Signal not provided: {signal} in {message}")]
    MissingSignal { message: String, signal: String },

    #[error("Signal {0} has no not-valid sentinel")]
    NoSentinel(String),

    #[error("Unknown multiplexer value {value} in {message}")]
    UnknownMultiplexer { message: String, value: u64 },

    #[error("Duplicate message ID 0x{0:X}")]
    DuplicateMessage(u32),

    #[error("Invalid signal definition: {0}")]
    InvalidSignalDefinition(String),
}

/// Errors reported by the dispatcher when decoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unknown message: ID 0x{id:X}{}", multiplexer_suffix(.multiplexer))]
    UnknownMessage { id: u32, multiplexer: Option<u64> },

    #[error("Malformed message 0x{id:X}: {source}")]
    Malformed { id: u32, source: CodecError },
}

/// Errors reported by the dispatcher when encoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown message: ID 0x{0:X}")]
    UnknownMessage(u32),

    #[error("Cannot encode message 0x{id:X}: {source}")]
    Rejected { id: u32, source: CodecError },
}

fn multiplexer_suffix(multiplexer: &Option<u64>) -> String {
    match multiplexer {
        Some(value) => format!(" (multiplexer 0x{:02X})", value),
        None => String::new(),
    }
}

impl DecodeError {
    /// CAN ID or PGN the error refers to
    pub fn id(&self) -> u32 {
        match self {
            DecodeError::UnknownMessage { id, .. } => *id,
            DecodeError::Malformed { id, .. } => *id,
        }
    }

    /// True when the payload length did not match the declared message size
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DecodeError::Malformed {
                source: CodecError::Format { .. },
                ..
            }
        )
    }
}

/// A decoded message: the record passed to and from the codec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedMessage {
    /// Message ID (PGN or CAN ID, as registered)
    pub id: u32,
    /// Message name from the catalog
    pub name: String,
    /// Active multiplexer value (if message is multiplexed)
    pub multiplexer_value: Option<u64>,
    /// All decoded signals in this message
    pub signals: Vec<DecodedSignal>,
}

impl DecodedMessage {
    /// Create an empty record, usually as input for encoding
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            multiplexer_value: None,
            signals: Vec::new(),
        }
    }

    /// Builder method: set a signal by name, replacing any earlier value
    pub fn with_signal(mut self, name: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.signals.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.value = value,
            None => self.signals.push(DecodedSignal {
                name,
                value,
                unit: None,
                value_description: None,
                raw_value: 0,
            }),
        }
        self
    }

    /// Builder method: select the multiplexed channel to encode
    pub fn with_multiplexer(mut self, value: u64) -> Self {
        self.multiplexer_value = Some(value);
        self
    }

    /// Look up a signal by name
    pub fn signal(&self, name: &str) -> Option<&DecodedSignal> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Look up a signal value by name
    pub fn value(&self, name: &str) -> Option<&SignalValue> {
        self.signal(name).map(|s| &s.value)
    }
}

/// A decoded signal with its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedSignal {
    /// Signal name from the catalog
    pub name: String,
    /// Decoded physical value, or the not-valid marker
    pub value: SignalValue,
    /// Engineering unit (e.g., "rpm", "°C", "V")
    pub unit: Option<String>,
    /// Status text from the signal's lookup table (e.g., "NORMAL OPERATION")
    pub value_description: Option<String>,
    /// Raw value before scaling (useful for debugging)
    pub raw_value: i64,
}

/// Signal value types supported by the codec
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// Signed integer value
    Integer(i64),
    /// Floating-point value (after scaling/offset)
    Float(f64),
    /// Single-bit flag
    Boolean(bool),
    /// Raw bits equal the field's "signal not valid" sentinel
    NotValid,
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Integer(v) => write!(f, "{}", v),
            SignalValue::Float(v) => write!(f, "{:.3}", v),
            SignalValue::Boolean(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            SignalValue::NotValid => write!(f, "SNV"),
        }
    }
}

impl SignalValue {
    /// Convert signal value to f64, `None` for the not-valid marker
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Integer(v) => Some(*v as f64),
            SignalValue::Float(v) => Some(*v),
            SignalValue::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            SignalValue::NotValid => None,
        }
    }

    /// Convert signal value to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SignalValue::Integer(v) => Some(*v),
            SignalValue::Float(v) => Some(*v as i64),
            SignalValue::Boolean(v) => Some(if *v { 1 } else { 0 }),
            SignalValue::NotValid => None,
        }
    }

    /// Check if this is a set flag
    pub fn as_bool(&self) -> bool {
        match self {
            SignalValue::Boolean(v) => *v,
            SignalValue::Integer(v) => *v != 0,
            SignalValue::Float(v) => *v != 0.0,
            SignalValue::NotValid => false,
        }
    }

    /// False when the field carried its not-valid sentinel
    pub fn is_valid(&self) -> bool {
        !matches!(self, SignalValue::NotValid)
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        SignalValue::Float(value)
    }
}

impl From<i64> for SignalValue {
    fn from(value: i64) -> Self {
        SignalValue::Integer(value)
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        SignalValue::Boolean(value)
    }
}

/// A decoded frame: the message plus where and when it was seen
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// Absolute receive timestamp
    pub timestamp: Timestamp,
    /// CAN channel number
    pub channel: u8,
    /// Arbitration ID as received
    pub can_id: u32,
    /// PGN the frame was resolved through (J1939 messages only)
    pub pgn: Option<u32>,
    /// Source address of an extended J1939 frame
    pub source_address: Option<u8>,
    /// Decoded signals
    pub message: DecodedMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_value_conversions() {
        let int_val = SignalValue::Integer(42);
        assert_eq!(int_val.as_f64(), Some(42.0));
        assert_eq!(int_val.as_i64(), Some(42));
        assert!(int_val.as_bool());

        let float_val = SignalValue::Float(3.25);
        assert_eq!(float_val.as_f64(), Some(3.25));
        assert_eq!(float_val.as_i64(), Some(3));

        let bool_val = SignalValue::Boolean(true);
        assert_eq!(bool_val.as_f64(), Some(1.0));
        assert!(bool_val.as_bool());

        let snv = SignalValue::NotValid;
        assert_eq!(snv.as_f64(), None);
        assert!(!snv.is_valid());
    }

    #[test]
    fn test_signal_value_display() {
        assert_eq!(format!("{}", SignalValue::Integer(42)), "42");
        assert_eq!(format!("{}", SignalValue::Float(3.14159)), "3.142");
        assert_eq!(format!("{}", SignalValue::Boolean(true)), "true");
        assert_eq!(format!("{}", SignalValue::NotValid), "SNV");
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::UnknownMessage {
            id: 0x521,
            multiplexer: Some(9),
        };
        assert_eq!(err.to_string(), "Unknown message: ID 0x521 (multiplexer 0x09)");

        let err = DecodeError::Malformed {
            id: 0xF004,
            source: CodecError::Format {
                message: "EEC1".to_string(),
                expected: 8,
                actual: 3,
            },
        };
        assert!(err.is_format_error());
        assert_eq!(err.id(), 0xF004);
        assert!(err.to_string().contains("expected 8 bytes, got 3"));
    }

    #[test]
    fn test_frame_timestamp() {
        let frame = CanFrame::new(0x18FEEE00, vec![0; 8]).with_timestamp_ns(1_500_000_000);
        assert!(frame.is_extended);
        assert_eq!(frame.timestamp().timestamp(), 1);
        assert_eq!(frame.timestamp().timestamp_subsec_millis(), 500);
        assert_eq!(frame.dlc(), 8);
    }

    #[test]
    fn test_frame_timestamp_is_deterministic() {
        let frame = CanFrame::new(0x521, vec![0; 6]).with_timestamp_ns(u64::MAX);
        let first = frame.timestamp();
        assert_eq!(first, frame.timestamp());
        assert_eq!(first.timestamp(), (u64::MAX / 1_000_000_000) as i64);
        assert_eq!(first.timestamp_subsec_nanos(), (u64::MAX % 1_000_000_000) as u32);

        let epoch = CanFrame::new(0x521, vec![0; 6]).timestamp();
        assert_eq!(epoch.timestamp(), 0);
        assert_eq!(epoch.timestamp_subsec_nanos(), 0);
    }
}
