//! Declarative message and signal definitions
//!
//! Every message in the catalog is a `static` table of `SignalDefinition`s.
//! The tables are built with `const fn` builder methods so that a layout
//! reads like a line of a signal database:
//!
//! ```
//! use can_signal_codec::signals::{ByteOrder, SignalDefinition};
//!
//! const ENGINE_SPEED: SignalDefinition =
//!     SignalDefinition::unsigned("EngineSpeed", 24, 16, ByteOrder::LittleEndian)
//!         .scale(0.125, 0.0)
//!         .range(0.0, 8031.875)
//!         .unit("rpm");
//! assert_eq!(ENGINE_SPEED.physical_range(), (0.0, 8031.875));
//! ```

use crate::scaling::{self, not_valid_sentinel};
use crate::types::CodecError;

/// Byte order for signal extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
}

/// Raw-to-physical conversion of a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `physical = raw * factor + offset`
    Linear { factor: f64, offset: f64 },
    /// `physical = (raw - raw_offset) * factor`
    OffsetFirst { raw_offset: i64, factor: f64 },
}

impl Conversion {
    /// No scaling, no offset
    pub const IDENTITY: Conversion = Conversion::Linear {
        factor: 1.0,
        offset: 0.0,
    };

    /// Physical size of one raw step
    pub fn factor(&self) -> f64 {
        match self {
            Conversion::Linear { factor, .. } => *factor,
            Conversion::OffsetFirst { factor, .. } => *factor,
        }
    }

    /// True when raw and physical values are the same number
    pub fn is_identity(&self) -> bool {
        *self == Conversion::IDENTITY
    }
}

/// How a message ID is matched against received arbitration IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// J1939 parameter group number, matched through the 29-bit identifier
    Pgn,
    /// Full arbitration ID (11-bit, or 29-bit with the extended flag removed)
    CanId,
}

/// Maps a raw enumerated value to its status text
pub type ValueLookup = fn(i64) -> &'static str;

/// A CAN signal definition
#[derive(Debug, Clone, Copy)]
pub struct SignalDefinition {
    /// Signal name
    pub name: &'static str,
    /// Start bit in the payload (LSB for little-endian, MSB for big-endian)
    pub start_bit: u16,
    /// Length in bits
    pub length: u16,
    /// Byte order
    pub byte_order: ByteOrder,
    /// Value type (signed/unsigned)
    pub value_type: ValueType,
    /// Raw-to-physical conversion
    pub conversion: Conversion,
    /// Valid physical range; the raw range of the field when not given
    pub range: Option<(f64, f64)>,
    /// Engineering unit (e.g., "km/h", "°C", "V")
    pub unit: Option<&'static str>,
    /// Whether the all-ones raw value means "signal not valid"
    pub has_not_valid: bool,
    /// Status text for enumerated values
    pub value_lookup: Option<ValueLookup>,
    /// Multiplexer values for which this signal is present
    pub multiplexer_values: Option<&'static [u64]>,
    /// True for the selector signal of a multiplexed message
    pub is_multiplexer: bool,
}

impl SignalDefinition {
    /// Unsigned, unscaled field
    pub const fn unsigned(name: &'static str, start_bit: u16, length: u16, byte_order: ByteOrder) -> Self {
        Self {
            name,
            start_bit,
            length,
            byte_order,
            value_type: ValueType::Unsigned,
            conversion: Conversion::IDENTITY,
            range: None,
            unit: None,
            has_not_valid: false,
            value_lookup: None,
            multiplexer_values: None,
            is_multiplexer: false,
        }
    }

    /// Two's-complement, unscaled field
    pub const fn signed(name: &'static str, start_bit: u16, length: u16, byte_order: ByteOrder) -> Self {
        let mut signal = Self::unsigned(name, start_bit, length, byte_order);
        signal.value_type = ValueType::Signed;
        signal
    }

    /// Single-bit flag
    pub const fn flag(name: &'static str, bit: u16, byte_order: ByteOrder) -> Self {
        Self::unsigned(name, bit, 1, byte_order)
    }

    /// Builder method: linear conversion `raw * factor + offset`
    pub const fn scale(mut self, factor: f64, offset: f64) -> Self {
        self.conversion = Conversion::Linear { factor, offset };
        self
    }

    /// Builder method: conversion `(raw - raw_offset) * factor`
    pub const fn offset_first(mut self, raw_offset: i64, factor: f64) -> Self {
        self.conversion = Conversion::OffsetFirst { raw_offset, factor };
        self
    }

    /// Builder method: valid physical range
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Builder method: engineering unit
    pub const fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Builder method: the all-ones raw value means "signal not valid"
    pub const fn not_valid(mut self) -> Self {
        self.has_not_valid = true;
        self
    }

    /// Builder method: status text lookup
    pub const fn lookup(mut self, lookup: ValueLookup) -> Self {
        self.value_lookup = Some(lookup);
        self
    }

    /// Builder method: present only for these multiplexer values
    pub const fn multiplexed(mut self, values: &'static [u64]) -> Self {
        self.multiplexer_values = Some(values);
        self
    }

    /// Builder method: this signal selects the multiplexed channel
    pub const fn multiplexer(mut self) -> Self {
        self.is_multiplexer = true;
        self
    }

    /// Raw integer bounds of the field
    pub fn raw_bounds(&self) -> (i64, i64) {
        let bits = self.length as u32;
        match self.value_type {
            ValueType::Signed => scaling::signed_bounds(bits),
            ValueType::Unsigned => (0, scaling::unsigned_max(bits).min(i64::MAX as u64) as i64),
        }
    }

    /// Valid physical range, `(min, max)`
    pub fn physical_range(&self) -> (f64, f64) {
        if let Some(range) = self.range {
            return range;
        }
        let (raw_min, raw_max) = self.raw_bounds();
        let a = scaling::apply_scale(raw_min, self.conversion);
        let b = scaling::apply_scale(raw_max, self.conversion);
        (a.min(b), a.max(b))
    }

    /// Raw sentinel meaning "signal not valid", if the field declares one
    pub fn sentinel(&self) -> Option<u64> {
        if self.has_not_valid {
            not_valid_sentinel(self.length)
        } else {
            None
        }
    }

    /// Single unscaled bit, decoded as a boolean
    pub fn is_flag(&self) -> bool {
        self.length == 1 && self.conversion.is_identity()
    }

    /// Check if this signal is present for the given multiplexer value
    pub fn is_active(&self, multiplexer_value: Option<u64>) -> bool {
        match (self.multiplexer_values, multiplexer_value) {
            (None, _) => true,
            (Some(values), Some(current)) => values.contains(&current),
            (Some(_), None) => false,
        }
    }

    /// One past the last bit of the field
    pub(crate) fn end_bit(&self) -> usize {
        self.start_bit as usize + self.length as usize
    }
}

/// A complete CAN message definition
#[derive(Debug)]
pub struct MessageDefinition {
    /// PGN or CAN ID, depending on `id_kind`
    pub id: u32,
    /// How `id` is matched
    pub id_kind: IdKind,
    /// Message name
    pub name: &'static str,
    /// Message size in bytes
    pub size: usize,
    /// Transmitting node
    pub sender: &'static str,
    /// All signals in this message
    pub signals: &'static [SignalDefinition],
}

impl MessageDefinition {
    /// Selector signal, if the message is multiplexed
    pub fn multiplexer(&self) -> Option<&SignalDefinition> {
        self.signals.iter().find(|s| s.is_multiplexer)
    }

    /// True if this message has multiplexed signals
    pub fn is_multiplexed(&self) -> bool {
        self.multiplexer().is_some()
    }

    /// Find a signal by name
    pub fn signal(&self, name: &str) -> Option<&SignalDefinition> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// All multiplexer values with at least one signal, in ascending order
    pub fn multiplexer_values(&self) -> Vec<u64> {
        let mut values: Vec<u64> = self
            .signals
            .iter()
            .filter_map(|s| s.multiplexer_values)
            .flatten()
            .copied()
            .collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Check that every signal fits in the payload and has a sane width
    pub fn validate(&self) -> Result<(), CodecError> {
        let invalid = |reason: String| Err(CodecError::InvalidSignalDefinition(reason));

        for signal in self.signals {
            if signal.length == 0 || signal.length > 64 {
                return invalid(format!(
                    "{}.{}: length {} out of range",
                    self.name, signal.name, signal.length
                ));
            }
            if signal.end_bit() > self.size * 8 {
                return invalid(format!(
                    "{}.{}: bits {}..{} exceed {} byte payload",
                    self.name,
                    signal.name,
                    signal.start_bit,
                    signal.end_bit(),
                    self.size
                ));
            }
            if signal.conversion.factor() == 0.0 {
                return invalid(format!("{}.{}: zero factor", self.name, signal.name));
            }
        }
        if self.signals.iter().any(|s| s.multiplexer_values.is_some()) && !self.is_multiplexed() {
            return invalid(format!("{}: multiplexed signals without a multiplexer", self.name));
        }
        Ok(())
    }
}
