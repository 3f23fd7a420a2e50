//! Message Codec Engine
//!
//! Interprets a message's signal table to turn a raw payload into a
//! `DecodedMessage` and back. Handles bit extraction and insertion,
//! endianness, multiplexing, sentinels and physical value conversion.

use crate::scaling;
use crate::signals::{ByteOrder, MessageDefinition, SignalDefinition, ValueType};
use crate::types::{CodecError, DecodedMessage, DecodedSignal, Result, SignalValue};

/// Message codec - the one routine every catalog entry goes through
pub struct MessageCodec;

impl MessageCodec {
    /// Decode a payload into a message record
    ///
    /// # Arguments
    /// * `message_def` - Message definition from the catalog
    /// * `data` - Payload bytes; must be exactly `message_def.size` long
    ///
    /// # Returns
    /// * `Ok(DecodedMessage)` with every signal active for the payload
    /// * `Err(CodecError::Format)` on a length mismatch
    /// * `Err(CodecError::UnknownMultiplexer)` if the selector names no channel
    pub fn decode(message_def: &MessageDefinition, data: &[u8]) -> Result<DecodedMessage> {
        Self::check_length(message_def, data.len())?;

        // For multiplexed messages, first extract the multiplexer signal value
        let mut multiplexer_value: Option<u64> = None;
        if let Some(mux_signal) = message_def.multiplexer() {
            let value = Self::extract_bits(data, mux_signal)?;
            if !Self::has_channel(message_def, value) {
                return Err(CodecError::UnknownMultiplexer {
                    message: message_def.name.to_string(),
                    value,
                });
            }
            multiplexer_value = Some(value);
        }

        let mut signals = Vec::with_capacity(message_def.signals.len());
        for signal in message_def.signals {
            if !signal.is_active(multiplexer_value) {
                continue;
            }
            signals.push(Self::decode_signal(data, signal)?);
        }

        log::trace!(
            "Decoded {} (ID 0x{:X}): {} signals",
            message_def.name,
            message_def.id,
            signals.len()
        );

        Ok(DecodedMessage {
            id: message_def.id,
            name: message_def.name.to_string(),
            multiplexer_value,
            signals,
        })
    }

    /// Encode a message record into a payload of `message_def.size` bytes
    ///
    /// Signals are looked up in the record by name. Bits not covered by an
    /// active signal are zero.
    pub fn encode(message_def: &MessageDefinition, message: &DecodedMessage) -> Result<Vec<u8>> {
        let mut data = vec![0u8; message_def.size];

        let multiplexer_value = match message_def.multiplexer() {
            Some(mux_signal) => {
                let value = message
                    .multiplexer_value
                    .or_else(|| {
                        message
                            .value(mux_signal.name)
                            .and_then(|v| v.as_i64())
                            .map(|v| v as u64)
                    })
                    .ok_or_else(|| CodecError::MissingSignal {
                        message: message_def.name.to_string(),
                        signal: mux_signal.name.to_string(),
                    })?;
                if !Self::has_channel(message_def, value) {
                    return Err(CodecError::UnknownMultiplexer {
                        message: message_def.name.to_string(),
                        value,
                    });
                }
                Some(value)
            }
            None => None,
        };

        for signal in message_def.signals {
            if !signal.is_active(multiplexer_value) {
                continue;
            }

            let raw = match (signal.is_multiplexer, multiplexer_value) {
                (true, Some(value)) => value,
                _ => {
                    let value = message.value(signal.name).ok_or_else(|| CodecError::MissingSignal {
                        message: message_def.name.to_string(),
                        signal: signal.name.to_string(),
                    })?;
                    Self::raw_from_value(signal, value)?
                }
            };

            Self::insert_bits(&mut data, signal, raw)?;
        }

        Ok(data)
    }

    fn check_length(message_def: &MessageDefinition, actual: usize) -> Result<()> {
        if actual != message_def.size {
            return Err(CodecError::Format {
                message: message_def.name.to_string(),
                expected: message_def.size,
                actual,
            });
        }
        Ok(())
    }

    fn has_channel(message_def: &MessageDefinition, value: u64) -> bool {
        message_def
            .signals
            .iter()
            .filter_map(|s| s.multiplexer_values)
            .any(|values| values.contains(&value))
    }

    /// Decode a single signal from payload data
    fn decode_signal(data: &[u8], signal: &SignalDefinition) -> Result<DecodedSignal> {
        let bits = Self::extract_bits(data, signal)?;

        let raw_value = match signal.value_type {
            ValueType::Unsigned => bits as i64,
            ValueType::Signed => Self::sign_extend(bits, signal.length as usize),
        };

        let value = if signal.sentinel() == Some(bits) {
            SignalValue::NotValid
        } else if signal.is_flag() {
            SignalValue::Boolean(raw_value != 0)
        } else if signal.conversion.is_identity() {
            SignalValue::Integer(raw_value)
        } else {
            SignalValue::Float(scaling::apply_scale(raw_value, signal.conversion))
        };

        let value_description = match (&value, signal.value_lookup) {
            (SignalValue::NotValid, _) | (_, None) => None,
            (_, Some(lookup)) => Some(lookup(raw_value).to_string()),
        };

        Ok(DecodedSignal {
            name: signal.name.to_string(),
            value,
            unit: signal.unit.map(str::to_string),
            value_description,
            raw_value,
        })
    }

    /// Convert a physical value into the raw bit pattern of a signal
    ///
    /// Rejects values outside the signal's range (half an LSB of slack for
    /// float rounding) and values that would collide with the sentinel.
    fn raw_from_value(signal: &SignalDefinition, value: &SignalValue) -> Result<u64> {
        let physical = match value {
            SignalValue::NotValid => {
                return signal
                    .sentinel()
                    .ok_or_else(|| CodecError::NoSentinel(signal.name.to_string()));
            }
            SignalValue::Boolean(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            SignalValue::Integer(v) => *v as f64,
            SignalValue::Float(v) => *v,
        };

        let (min, max) = signal.physical_range();
        let range_error = || CodecError::Range {
            signal: signal.name.to_string(),
            value: physical,
            min,
            max,
        };

        let slack = signal.conversion.factor().abs() / 2.0;
        if !physical.is_finite() || physical < min - slack || physical > max + slack {
            log::warn!(
                "Refusing to encode {} = {} (valid range [{}, {}])",
                signal.name,
                physical,
                min,
                max
            );
            return Err(range_error());
        }

        let raw = scaling::remove_scale(physical, signal.conversion).round();
        let (raw_min, raw_max) = signal.raw_bounds();
        if raw < raw_min as f64 || raw > raw_max as f64 {
            return Err(range_error());
        }

        let raw = raw as i64;
        let bits = match signal.value_type {
            ValueType::Unsigned => raw as u64,
            ValueType::Signed => (raw as u64) & scaling::unsigned_max(signal.length as u32),
        };

        if signal.sentinel() == Some(bits) {
            return Err(range_error());
        }
        Ok(bits)
    }

    /// Extract the raw (unsigned) bits of a signal
    ///
    /// Byte-aligned fields are read through the scaling primitives; anything
    /// else is walked bit by bit.
    fn extract_bits(data: &[u8], signal: &SignalDefinition) -> Result<u64> {
        let start_bit = signal.start_bit as usize;
        let length = signal.length as usize;

        if start_bit % 8 == 0 && length % 8 == 0 {
            return scaling::decode_unsigned(data, start_bit / 8, length / 8, signal.byte_order);
        }

        Self::check_fits(data.len(), signal)?;
        Ok(Self::extract_unaligned(data, signal.byte_order, start_bit, length))
    }

    /// Write the raw bits of a signal into the payload
    fn insert_bits(data: &mut [u8], signal: &SignalDefinition, value: u64) -> Result<()> {
        let start_bit = signal.start_bit as usize;
        let length = signal.length as usize;

        if start_bit % 8 == 0 && length % 8 == 0 {
            return scaling::encode_unsigned(data, start_bit / 8, length / 8, signal.byte_order, value);
        }

        Self::check_fits(data.len(), signal)?;
        Self::insert_unaligned(data, signal.byte_order, start_bit, length, value);
        Ok(())
    }

    fn check_fits(available: usize, signal: &SignalDefinition) -> Result<()> {
        let start_bit = signal.start_bit as usize;
        let required_bytes = (start_bit + signal.length as usize + 7) / 8;
        if required_bytes > available {
            log::warn!(
                "Signal '{}' requires {} bytes but frame only has {} bytes",
                signal.name,
                required_bytes,
                available
            );
            return Err(CodecError::OutOfBounds {
                offset: start_bit / 8,
                length: required_bytes - start_bit / 8,
                available,
            });
        }
        Ok(())
    }

    /// Payload position of the `n`-th bit of a signal, counted from its
    /// least significant bit, as `(byte index, shift within the byte)`.
    ///
    /// Intel signals number bits from the LSB of byte 0 and `start_bit` is
    /// the signal's LSB. Motorola signals number bits from the MSB of byte 0
    /// and `start_bit` is the signal's MSB, so the LSB sits `length - 1`
    /// positions further on.
    fn bit_location(
        byte_order: ByteOrder,
        start_bit: usize,
        length: usize,
        n: usize,
    ) -> (usize, u32) {
        match byte_order {
            ByteOrder::LittleEndian => {
                let pos = start_bit + n;
                (pos / 8, (pos % 8) as u32)
            }
            ByteOrder::BigEndian => {
                let pos = start_bit + (length - 1 - n);
                (pos / 8, 7 - (pos % 8) as u32)
            }
        }
    }

    /// Gather a non-aligned field; the caller has checked that it fits
    fn extract_unaligned(
        data: &[u8],
        byte_order: ByteOrder,
        start_bit: usize,
        length: usize,
    ) -> u64 {
        (0..length).fold(0u64, |acc, n| {
            let (byte_idx, shift) = Self::bit_location(byte_order, start_bit, length, n);
            acc | (u64::from((data[byte_idx] >> shift) & 0x01) << n)
        })
    }

    /// Scatter a non-aligned field, leaving every bit outside it untouched
    fn insert_unaligned(
        data: &mut [u8],
        byte_order: ByteOrder,
        start_bit: usize,
        length: usize,
        value: u64,
    ) {
        for n in 0..length {
            let (byte_idx, shift) = Self::bit_location(byte_order, start_bit, length, n);
            let mask = 1u8 << shift;
            if (value >> n) & 0x01 != 0 {
                data[byte_idx] |= mask;
            } else {
                data[byte_idx] &= !mask;
            }
        }
    }

    /// Interpret the low `bit_length` bits as a two's complement number
    fn sign_extend(value: u64, bit_length: usize) -> i64 {
        if bit_length == 0 || bit_length >= 64 {
            return value as i64;
        }
        let unused = 64 - bit_length as u32;
        ((value << unused) as i64) >> unused
    }
}
