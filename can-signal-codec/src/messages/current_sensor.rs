//! IVT-S current sensor
//!
//! The sensor reports every measurement channel on one 11-bit ID; the first
//! byte selects the channel. Commands go out on a second ID, again
//! multiplexed on the first byte. Values are big-endian.

use crate::signals::{ByteOrder, IdKind, MessageDefinition, SignalDefinition};

const BE: ByteOrder = ByteOrder::BigEndian;
const LE: ByteOrder = ByteOrder::LittleEndian;

/// Measurement results
pub const ID_RESULT: u32 = 0x521;
/// Commands to the sensor
pub const ID_COMMAND: u32 = 0x411;

status_enum! {
    /// Measurement channel carried by a result frame
    IvtChannel {
        Current = 0x00 => "CURRENT",
        VoltageU1 = 0x01 => "VOLTAGE U1",
        VoltageU2 = 0x02 => "VOLTAGE U2",
        VoltageU3 = 0x03 => "VOLTAGE U3",
        Temperature = 0x04 => "TEMPERATURE",
        Power = 0x05 => "POWER",
        CoulombCount = 0x06 => "COULOMB COUNT",
        EnergyCount = 0x07 => "ENERGY COUNT",
    }
    unknown => "UNKNOWN CHANNEL"
}

status_enum! {
    /// Command selector of a command frame
    IvtCommand {
        ResetErrors = 0x30 => "RESET ERRORS",
        TriggerMeasurement = 0x31 => "TRIGGER MEASUREMENT",
        SetMode = 0x34 => "SET MODE",
    }
    unknown => "UNKNOWN COMMAND"
}

status_enum! {
    /// Run mode requested by a set-mode command
    IvtRunMode {
        Stop = 0 => "STOP",
        Run = 1 => "RUN",
    }
    unknown => "UNKNOWN"
}

/// Selector value for resetting every error flag
pub const RESET_ALL_ERRORS: i64 = 0x03;

const fn result(name: &'static str, channel: &'static [u64], unit: &'static str) -> SignalDefinition {
    SignalDefinition::signed(name, 16, 32, BE)
        .unit(unit)
        .multiplexed(channel)
}

pub static RESULT: MessageDefinition = MessageDefinition {
    id: ID_RESULT,
    id_kind: IdKind::CanId,
    name: "IVT_RESULT",
    size: 6,
    sender: "IVT",
    signals: &[
        SignalDefinition::unsigned("Channel", 0, 8, BE)
            .multiplexer()
            .lookup(IvtChannel::text),
        SignalDefinition::unsigned("MessageCount", 8, 4, LE),
        SignalDefinition::unsigned("State", 12, 4, LE),
        result("Current", &[0x00], "mA"),
        result("VoltageU1", &[0x01], "mV"),
        result("VoltageU2", &[0x02], "mV"),
        result("VoltageU3", &[0x03], "mV"),
        result("Temperature", &[0x04], "°C").scale(0.1, 0.0),
        result("Power", &[0x05], "W"),
        result("CoulombCount", &[0x06], "As"),
        result("EnergyCount", &[0x07], "Wh"),
    ],
};

pub static COMMAND: MessageDefinition = MessageDefinition {
    id: ID_COMMAND,
    id_kind: IdKind::CanId,
    name: "IVT_COMMAND",
    size: 8,
    sender: "VMU",
    signals: &[
        SignalDefinition::unsigned("Command", 0, 8, BE)
            .multiplexer()
            .lookup(IvtCommand::text),
        SignalDefinition::unsigned("RunMode", 8, 8, BE)
            .lookup(IvtRunMode::text)
            .multiplexed(&[0x34]),
        SignalDefinition::unsigned("StartupFlag", 16, 8, BE).multiplexed(&[0x34]),
        SignalDefinition::unsigned("CycleTime", 32, 16, BE)
            .unit("ms")
            .multiplexed(&[0x34]),
        SignalDefinition::unsigned("ErrorSelector", 8, 8, BE).multiplexed(&[0x30]),
        SignalDefinition::unsigned("ChannelMask", 8, 16, BE).multiplexed(&[0x31]),
    ],
};

pub static MESSAGES: &[&MessageDefinition] = &[&RESULT, &COMMAND];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_codec::MessageCodec;
    use crate::types::{CodecError, DecodedMessage, SignalValue};

    #[test]
    fn test_decode_current() {
        // count 2, state 1, 1000 mA
        let data = [0x00, 0x12, 0x00, 0x00, 0x03, 0xE8];
        let message = MessageCodec::decode(&RESULT, &data).unwrap();

        assert_eq!(message.multiplexer_value, Some(0));
        assert_eq!(message.value("Current"), Some(&SignalValue::Integer(1000)));
        assert_eq!(message.signal("Current").unwrap().unit.as_deref(), Some("mA"));
        assert_eq!(message.value("MessageCount"), Some(&SignalValue::Integer(2)));
        assert_eq!(message.value("State"), Some(&SignalValue::Integer(1)));
        assert!(message.value("Temperature").is_none());
        assert_eq!(
            message.signal("Channel").and_then(|s| s.value_description.as_deref()),
            Some("CURRENT")
        );
    }

    #[test]
    fn test_decode_temperature_and_negative_values() {
        let data = [0x04, 0x00, 0x00, 0x00, 0x00, 0xFA];
        let message = MessageCodec::decode(&RESULT, &data).unwrap();
        assert_eq!(message.value("Temperature"), Some(&SignalValue::Float(25.0)));

        let data = [0x05, 0x00, 0xFF, 0xFF, 0xFF, 0x9C];
        let message = MessageCodec::decode(&RESULT, &data).unwrap();
        assert_eq!(message.value("Power"), Some(&SignalValue::Integer(-100)));
    }

    #[test]
    fn test_unknown_channel() {
        let err = MessageCodec::decode(&RESULT, &[0x09, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownMultiplexer {
                message: "IVT_RESULT".to_string(),
                value: 9
            }
        );
        assert_eq!(IvtChannel::from_raw(9).as_str(), "UNKNOWN CHANNEL");
    }

    #[test]
    fn test_result_length() {
        assert!(matches!(
            MessageCodec::decode(&RESULT, &[0x00, 0x12, 0x00, 0x00, 0x03, 0xE8, 0x00, 0x00]),
            Err(CodecError::Format { expected: 6, actual: 8, .. })
        ));
    }

    #[test]
    fn test_encode_commands() {
        let start = DecodedMessage::new(ID_COMMAND, "IVT_COMMAND")
            .with_multiplexer(IvtCommand::SetMode.raw() as u64)
            .with_signal("RunMode", IvtRunMode::Run.raw())
            .with_signal("StartupFlag", 1i64)
            .with_signal("CycleTime", 0i64);
        let data = MessageCodec::encode(&COMMAND, &start).unwrap();
        assert_eq!(data, vec![0x34, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let reset = DecodedMessage::new(ID_COMMAND, "IVT_COMMAND")
            .with_signal("Command", IvtCommand::ResetErrors.raw())
            .with_signal("ErrorSelector", RESET_ALL_ERRORS);
        let data = MessageCodec::encode(&COMMAND, &reset).unwrap();
        assert_eq!(data, vec![0x30, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let trigger = DecodedMessage::new(ID_COMMAND, "IVT_COMMAND")
            .with_multiplexer(0x31)
            .with_signal("ChannelMask", 0xFFi64);
        let data = MessageCodec::encode(&COMMAND, &trigger).unwrap();
        assert_eq!(data, vec![0x31, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let decoded = MessageCodec::decode(&COMMAND, &data).unwrap();
        assert_eq!(decoded.value("ChannelMask"), Some(&SignalValue::Integer(0xFF)));
        assert!(decoded.value("RunMode").is_none());
    }

    #[test]
    fn test_encode_unknown_command() {
        let record = DecodedMessage::new(ID_COMMAND, "IVT_COMMAND").with_multiplexer(0x40);
        assert!(matches!(
            MessageCodec::encode(&COMMAND, &record),
            Err(CodecError::UnknownMultiplexer { value: 0x40, .. })
        ));
    }
}
