//! Wattalps battery management system
//!
//! Messages exchanged between the BMS and the vehicle management unit (VMU).
//! IDs are 29-bit arbitration IDs. Multi-byte fields are sent most
//! significant byte first; the status messages pack sub-byte fields with
//! Intel bit numbering inside each byte.

use crate::signals::{ByteOrder, IdKind, MessageDefinition, SignalDefinition};

const BE: ByteOrder = ByteOrder::BigEndian;
const LE: ByteOrder = ByteOrder::LittleEndian;

pub const ID_SP_CHARGE: u32 = 0x18FF021E;
pub const ID_SP_DRIVE: u32 = 0x18FF031E;
pub const ID_CONF_VERSION: u32 = 0x18FF331E;
pub const ID_SP_DETAIL_2S: u32 = 0x18FF041E;
pub const ID_SP_DETAIL_5S: u32 = 0x18FF051E;
pub const ID_SP_DETAIL_10S: u32 = 0x18FF061E;
pub const ID_SP_DETAIL_30S: u32 = 0x18FF071E;
pub const ID_SP_DETAIL_60S: u32 = 0x18FF081E;
pub const ID_SP_DETAIL_RMS_1: u32 = 0x18FF091E;
pub const ID_SP_DETAIL_RMS_2: u32 = 0x18FF0A1E;
pub const ID_SP_DETAIL_RMS_3: u32 = 0x18FF0B1E;
pub const ID_SP_DETAIL_RMS_4: u32 = 0x18FF0C1E;
pub const ID_SP_DETAIL_RMS_5: u32 = 0x18FF0D1E;
pub const ID_VMU_BMS_STATUS: u32 = 0x01FF0000;
pub const ID_BMS_VMU_STATUS: u32 = 0x18FF011E;
pub const ID_INFO: u32 = 0x18FF201E;
pub const ID_INFO_CELLS: u32 = 0x18FF211E;
pub const ID_INFO_TEMPERATURE: u32 = 0x18FF221E;
pub const ID_INFO_INSULATION: u32 = 0x18FF231E;
pub const ID_INFO_JB_TEMPERATURE: u32 = 0x18FF241E;
pub const ID_VMU_STATS: u32 = 0x18FF401E;
pub const ID_FAILURE: u32 = 0x18FF101E;
pub const ID_FORCE_HEATING: u32 = 0x01FF1000;
pub const ID_FORCE_COOLING: u32 = 0x01FF1100;
pub const ID_FORCE_PUMPING: u32 = 0x01FF1200;
pub const ID_GEN_DATA_RECORD_1: u32 = 0x01FF2000;
pub const ID_GEN_DATA_RECORD_2: u32 = 0x01FF2100;
pub const ID_GEN_DATA_RECORD_3: u32 = 0x01FF2200;

status_enum! {
    /// Operating mode requested by the VMU
    AskMode {
        Standby = 0 => "STANDBY",
        Charge = 1 => "CHARGE",
        Drive = 2 => "DRIVE",
    }
    unknown => "UNKNOWN"
}

status_enum! {
    /// Operating mode reported by the BMS
    BmsMode {
        Standby = 0 => "STANDBY",
        Charge = 1 => "CHARGE",
        Drive = 2 => "DRIVE",
        Error = 3 => "ERROR",
    }
    unknown => "UNKNOWN"
}

status_enum! {
    /// Charge phase reported by the BMS
    ChargePhase {
        NotCharging = 0 => "NOT CHARGING",
        Preconditioning = 1 => "PRECONDITIONING",
        StandardCharge = 2 => "STANDARD CHARGE",
        WaitBalancing = 3 => "WAIT BALANCING",
        Balancing = 4 => "BALANCING",
        ComplementaryCharge = 5 => "COMPLEMENTARY CHARGE",
        ChargeEnded = 6 => "CHARGE ENDED",
    }
    unknown => "UNKNOWN"
}

/// 16-bit current field, 0.1 A per bit
const fn amps(name: &'static str, start_bit: u16) -> SignalDefinition {
    SignalDefinition::unsigned(name, start_bit, 16, BE)
        .scale(0.1, 0.0)
        .range(0.0, 6553.5)
        .unit("A")
}

/// 16-bit voltage field, 0.1 V per bit
const fn volts(name: &'static str, start_bit: u16) -> SignalDefinition {
    SignalDefinition::unsigned(name, start_bit, 16, BE)
        .scale(0.1, 0.0)
        .range(0.0, 6553.5)
        .unit("V")
}

/// Bit of the FAILURE word, numbered from the word's least significant bit
const fn failure_flag(name: &'static str, word_bit: u16) -> SignalDefinition {
    SignalDefinition::flag(name, 63 - word_bit, BE)
}

/// Field of the FAILURE word covering `length` bits upwards from `word_bit`
const fn failure_field(name: &'static str, word_bit: u16, length: u16) -> SignalDefinition {
    SignalDefinition::unsigned(name, 63 - (word_bit + length - 1), length, BE)
}

/// Message definition keyed by its 29-bit identifier
macro_rules! wattalps_message {
    ($id:expr, $name:literal, $size:literal, $sender:literal, [$($signal:expr),+ $(,)?]) => {
        MessageDefinition {
            id: $id,
            id_kind: IdKind::CanId,
            name: $name,
            size: $size,
            sender: $sender,
            signals: &[$($signal),+],
        }
    };
}

// Set points

pub static SP_CHARGE: MessageDefinition = wattalps_message!(
    ID_SP_CHARGE,
    "BMS_VMU_SP_CHARGE",
    4,
    "BMS",
    [
        volts("ChargeVoltage", 0),
        amps("MaxChargeCurrent", 16),
    ]
);

pub static SP_DRIVE: MessageDefinition = wattalps_message!(
    ID_SP_DRIVE,
    "BMS_VMU_SP_DRIVE",
    4,
    "BMS",
    [
        amps("MaxDischargeCurrent", 0),
        amps("MaxRegenCurrent", 16),
    ]
);

pub static CONF_VERSION: MessageDefinition = wattalps_message!(
    ID_CONF_VERSION,
    "BMS_VMU_CONF_VERSION",
    8,
    "BMS",
    [
        SignalDefinition::unsigned("SafetyConfVerChar0", 0, 8, BE),
        SignalDefinition::unsigned("SafetyConfVerChar1", 8, 8, BE),
        SignalDefinition::unsigned("SafetyConfVerChar2", 16, 8, BE),
        SignalDefinition::unsigned("SafetyConfVerChar3", 24, 8, BE),
        SignalDefinition::unsigned("ApplConfVerChar0", 32, 8, BE),
        SignalDefinition::unsigned("ApplConfVerChar1", 40, 8, BE),
        SignalDefinition::unsigned("ApplConfVerChar2", 48, 8, BE),
        SignalDefinition::unsigned("ApplConfVerChar3", 56, 8, BE),
    ]
);

pub static SP_DETAIL_2S: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_2S,
    "BMS_VMU_SP_DETAIL_2S",
    8,
    "BMS",
    [
        amps("ChargeMeasuredCurrent2s", 0),
        amps("ChargeAlertThreshold2s", 16),
        amps("DischargeMeasuredCurrent2s", 32),
        amps("DischargeAlertThreshold2s", 48),
    ]
);

pub static SP_DETAIL_5S: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_5S,
    "BMS_VMU_SP_DETAIL_5S",
    8,
    "BMS",
    [
        amps("ChargeMeasuredCurrent5s", 0),
        amps("ChargeAlertThreshold5s", 16),
        amps("DischargeMeasuredCurrent5s", 32),
        amps("DischargeAlertThreshold5s", 48),
    ]
);

pub static SP_DETAIL_10S: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_10S,
    "BMS_VMU_SP_DETAIL_10S",
    8,
    "BMS",
    [
        amps("ChargeMeasuredCurrent10s", 0),
        amps("ChargeAlertThreshold10s", 16),
        amps("DischargeMeasuredCurrent10s", 32),
        amps("DischargeAlertThreshold10s", 48),
    ]
);

pub static SP_DETAIL_30S: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_30S,
    "BMS_VMU_SP_DETAIL_30S",
    8,
    "BMS",
    [
        amps("ChargeMeasuredCurrent30s", 0),
        amps("ChargeAlertThreshold30s", 16),
        amps("DischargeMeasuredCurrent30s", 32),
        amps("DischargeAlertThreshold30s", 48),
    ]
);

pub static SP_DETAIL_60S: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_60S,
    "BMS_VMU_SP_DETAIL_60S",
    8,
    "BMS",
    [
        amps("ChargeMeasuredCurrent60s", 0),
        amps("ChargeAlertThreshold60s", 16),
        amps("DischargeMeasuredCurrent60s", 32),
        amps("DischargeAlertThreshold60s", 48),
    ]
);

pub static SP_DETAIL_RMS_1: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_RMS_1,
    "BMS_VMU_SP_DETAIL_RMS_1",
    8,
    "BMS",
    [
        amps("RmsMeasuredCurrent2s", 0),
        amps("RmsAlertThreshold2s", 16),
        amps("RmsMeasuredCurrent5s", 32),
        amps("RmsAlertThreshold5s", 48),
    ]
);

pub static SP_DETAIL_RMS_2: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_RMS_2,
    "BMS_VMU_SP_DETAIL_RMS_2",
    8,
    "BMS",
    [
        amps("RmsMeasuredCurrent10s", 0),
        amps("RmsAlertThreshold10s", 16),
        amps("RmsMeasuredCurrent30s", 32),
        amps("RmsAlertThreshold30s", 48),
    ]
);

pub static SP_DETAIL_RMS_3: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_RMS_3,
    "BMS_VMU_SP_DETAIL_RMS_3",
    8,
    "BMS",
    [
        amps("RmsMeasuredCurrent60s", 0),
        amps("RmsAlertThreshold60s", 16),
        amps("RmsMeasuredCurrent120s", 32),
        amps("RmsAlertThreshold120s", 48),
    ]
);

pub static SP_DETAIL_RMS_4: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_RMS_4,
    "BMS_VMU_SP_DETAIL_RMS_4",
    8,
    "BMS",
    [
        amps("RmsMeasuredCurrent240s", 0),
        amps("RmsAlertThreshold240s", 16),
        amps("RmsMeasuredCurrent480s", 32),
        amps("RmsAlertThreshold480s", 48),
    ]
);

pub static SP_DETAIL_RMS_5: MessageDefinition = wattalps_message!(
    ID_SP_DETAIL_RMS_5,
    "BMS_VMU_SP_DETAIL_RMS_5",
    4,
    "BMS",
    [
        amps("RmsMeasuredCurrent900s", 0),
        amps("RmsAlertThreshold900s", 16),
    ]
);

// Status

pub static VMU_BMS_STATUS: MessageDefinition = wattalps_message!(
    ID_VMU_BMS_STATUS,
    "VMU_BMS_STATUS",
    8,
    "VMU",
    [
        SignalDefinition::unsigned("AskMode", 0, 2, LE)
            .range(0.0, 2.0)
            .lookup(AskMode::text),
        SignalDefinition::flag("InsuResMeasEn", 4, LE),
        SignalDefinition::unsigned("BmsDestAddr", 8, 8, LE),
    ]
);

pub static BMS_VMU_STATUS: MessageDefinition = wattalps_message!(
    ID_BMS_VMU_STATUS,
    "BMS_VMU_STATUS",
    4,
    "BMS",
    [
        SignalDefinition::unsigned("Mode", 0, 3, LE).lookup(BmsMode::text),
        SignalDefinition::unsigned("Soc", 8, 8, LE)
            .range(0.0, 100.0)
            .unit("%"),
        SignalDefinition::flag("IsFailure", 16, LE),
        SignalDefinition::flag("IsWarning", 17, LE),
        SignalDefinition::flag("IsAlert", 18, LE),
        SignalDefinition::flag("IsBalancing", 19, LE),
        SignalDefinition::flag("IsEndOfCharge", 20, LE),
        SignalDefinition::flag("IsDcContactorClosed", 21, LE),
        SignalDefinition::flag("IsHeating", 22, LE),
        SignalDefinition::flag("IsPumping", 23, LE),
        SignalDefinition::flag("IsCooling", 24, LE),
        SignalDefinition::flag("IsThermalForcing", 25, LE),
        SignalDefinition::unsigned("ChargePhase", 28, 4, LE).lookup(ChargePhase::text),
    ]
);

// Measurements

pub static INFO: MessageDefinition = wattalps_message!(
    ID_INFO,
    "BMS_VMU_INFO",
    7,
    "BMS",
    [
        SignalDefinition::signed("Current", 0, 16, BE)
            .scale(0.1, 0.0)
            .range(-3276.8, 3276.7)
            .unit("A"),
        volts("UpStreamVoltage", 16),
        volts("DownStreamVoltage", 32),
        SignalDefinition::unsigned("SOH", 48, 8, BE)
            .range(0.0, 100.0)
            .unit("%"),
    ]
);

pub static INFO_CELLS: MessageDefinition = wattalps_message!(
    ID_INFO_CELLS,
    "BMS_VMU_INFO_CELLS",
    6,
    "BMS",
    [
        SignalDefinition::unsigned("MinimumCellVoltage", 0, 16, BE)
            .range(0.0, 5000.0)
            .unit("mV"),
        SignalDefinition::unsigned("AverageCellVoltage", 16, 16, BE)
            .range(0.0, 5000.0)
            .unit("mV"),
        SignalDefinition::unsigned("MaximumCellVoltage", 32, 16, BE)
            .range(0.0, 5000.0)
            .unit("mV"),
    ]
);

pub static INFO_TEMPERATURE: MessageDefinition = wattalps_message!(
    ID_INFO_TEMPERATURE,
    "BMS_VMU_INFO_TEMPERATURE",
    3,
    "BMS",
    [
        SignalDefinition::signed("MinimumCellTemperature", 0, 8, BE).unit("°C"),
        SignalDefinition::signed("AverageCellTemperature", 8, 8, BE).unit("°C"),
        SignalDefinition::signed("MaximumCellTemperature", 16, 8, BE).unit("°C"),
    ]
);

pub static INFO_INSULATION: MessageDefinition = wattalps_message!(
    ID_INFO_INSULATION,
    "BMS_VMU_INFO_INSULATION",
    4,
    "BMS",
    [
        SignalDefinition::unsigned("InsulationResistance", 0, 32, BE)
            .range(0.0, 1_000_000.0)
            .unit("kΩ"),
    ]
);

pub static INFO_JB_TEMPERATURE: MessageDefinition = wattalps_message!(
    ID_INFO_JB_TEMPERATURE,
    "BMS_VMU_INFO_JB_TEMPERATURE",
    8,
    "BMS",
    [
        SignalDefinition::signed("JunctionBoxShuntTempMeas", 0, 16, BE)
            .range(-128.0, 300.0)
            .unit("°C"),
        SignalDefinition::signed("JunctionBoxShuntTempMax", 16, 16, BE)
            .range(-128.0, 300.0)
            .unit("°C"),
        SignalDefinition::signed("JunctionBoxThermTempMeas", 32, 16, BE)
            .range(-128.0, 300.0)
            .unit("°C"),
        SignalDefinition::signed("JunctionBoxThermTempMax", 48, 16, BE)
            .range(-128.0, 300.0)
            .unit("°C"),
    ]
);

pub static VMU_STATS: MessageDefinition = wattalps_message!(
    ID_VMU_STATS,
    "BMS_VMU_STATS",
    8,
    "BMS",
    [
        SignalDefinition::unsigned("CounterCharge", 0, 32, BE)
            .scale(0.01, 0.0)
            .unit("Ah"),
        SignalDefinition::unsigned("CounterDischarge", 32, 32, BE)
            .scale(0.01, 0.0)
            .unit("Ah"),
    ]
);

pub static FAILURE: MessageDefinition = wattalps_message!(
    ID_FAILURE,
    "BMS_VMU_FAILURE",
    8,
    "BMS",
    [
        failure_flag("Safety_Generic", 0),
        failure_flag("ExternalCommunication", 1),
        failure_flag("uCCommunication", 2),
        failure_flag("AuxShunt", 3),
        failure_flag("Config", 4),
        failure_flag("Contactor", 5),
        failure_flag("PrechargeContactor", 6),
        failure_flag("InternalPowerAlimentation", 7),
        failure_flag("InternalTemperature", 8),
        failure_flag("Charger", 9),
        failure_flag("CurmaxFuse", 10),
        failure_field("Reserved", 11, 21).range(0.0, 0.0),
        failure_flag("Safety_TempmaxMod", 32),
        failure_flag("Safety_TempImbalance", 33),
        failure_flag("Safety_Voltmax", 34),
        failure_flag("Safety_Voltmin", 35),
        failure_flag("Safety_VoltImbalance", 36),
        failure_flag("Safety_Curmax2s", 37),
        failure_flag("Safety_Curmax5s", 38),
        failure_flag("Safety_Curmax10s", 39),
        failure_flag("Safety_Curmax30s", 40),
        failure_flag("Safety_Curmax60s", 41),
        failure_flag("Safety_Oil", 42),
        failure_flag("Safety_Contactor", 43),
        failure_flag("Safety_Config", 44),
        failure_flag("Safety_SlaveSpiComm", 45),
        failure_flag("Safety_SlaveComm", 46),
        failure_flag("Safety_SlaveNumber", 47),
        failure_flag("Safety_SlaveId", 48),
        failure_flag("Safety_SlaveMeasTimeout", 49),
        failure_flag("Safety_SlaveMaxim", 50),
        failure_flag("Safety_CommAuxShunt", 51),
        failure_flag("Safety_EmergencyStop", 52),
        failure_flag("Safety_Hvil", 53),
        failure_flag("Safety_VoltSensor", 54),
        failure_flag("Safety_TempSensor", 55),
        failure_flag("Safety_CurrSensor", 56),
        failure_flag("Safety_Vpack", 57),
        failure_flag("Safety_ContextAlim", 58),
        failure_flag("Safety_JunctionBoxTemperature", 59),
        failure_flag("Safety_ApplComm", 60),
        failure_field("Safety_Reserved", 61, 3).range(0.0, 0.0),
    ]
);

// Thermal and data-record commands

pub static FORCE_HEATING: MessageDefinition = wattalps_message!(
    ID_FORCE_HEATING,
    "VMU_BMS_FORCE_HEATING",
    8,
    "VMU",
    [
        SignalDefinition::flag("ForceOn", 0, LE),
        SignalDefinition::flag("ForceOff", 1, LE),
        SignalDefinition::unsigned("BmsDestAddr", 8, 8, LE),
    ]
);

pub static FORCE_COOLING: MessageDefinition = wattalps_message!(
    ID_FORCE_COOLING,
    "VMU_BMS_FORCE_COOLING",
    8,
    "VMU",
    [
        SignalDefinition::flag("ForceOn", 0, LE),
        SignalDefinition::flag("ForceOff", 1, LE),
        SignalDefinition::unsigned("BmsDestAddr", 8, 8, LE),
    ]
);

pub static FORCE_PUMPING: MessageDefinition = wattalps_message!(
    ID_FORCE_PUMPING,
    "VMU_BMS_FORCE_PUMPING",
    8,
    "VMU",
    [
        SignalDefinition::flag("ForceOn", 0, LE),
        SignalDefinition::unsigned("BmsDestAddr", 8, 8, LE),
    ]
);

pub static GEN_DATA_RECORD_1: MessageDefinition = wattalps_message!(
    ID_GEN_DATA_RECORD_1,
    "VMU_BMS_GEN_DATA_RECORD_1",
    8,
    "VMU",
    [
        SignalDefinition::signed("GenRecordValue1", 0, 32, BE),
        SignalDefinition::signed("GenRecordValue2", 32, 32, BE),
    ]
);

pub static GEN_DATA_RECORD_2: MessageDefinition = wattalps_message!(
    ID_GEN_DATA_RECORD_2,
    "VMU_BMS_GEN_DATA_RECORD_2",
    8,
    "VMU",
    [
        SignalDefinition::signed("GenRecordValue3", 0, 32, BE),
        SignalDefinition::signed("GenRecordValue4", 32, 32, BE),
    ]
);

pub static GEN_DATA_RECORD_3: MessageDefinition = wattalps_message!(
    ID_GEN_DATA_RECORD_3,
    "VMU_BMS_GEN_DATA_RECORD_3",
    8,
    "VMU",
    [
        SignalDefinition::signed("GenRecordValue5", 0, 32, BE),
        SignalDefinition::signed("GenRecordValue6", 32, 32, BE),
    ]
);

pub static MESSAGES: &[&MessageDefinition] = &[
    &SP_CHARGE,
    &SP_DRIVE,
    &CONF_VERSION,
    &SP_DETAIL_2S,
    &SP_DETAIL_5S,
    &SP_DETAIL_10S,
    &SP_DETAIL_30S,
    &SP_DETAIL_60S,
    &SP_DETAIL_RMS_1,
    &SP_DETAIL_RMS_2,
    &SP_DETAIL_RMS_3,
    &SP_DETAIL_RMS_4,
    &SP_DETAIL_RMS_5,
    &VMU_BMS_STATUS,
    &BMS_VMU_STATUS,
    &INFO,
    &INFO_CELLS,
    &INFO_TEMPERATURE,
    &INFO_INSULATION,
    &INFO_JB_TEMPERATURE,
    &VMU_STATS,
    &FAILURE,
    &FORCE_HEATING,
    &FORCE_COOLING,
    &FORCE_PUMPING,
    &GEN_DATA_RECORD_1,
    &GEN_DATA_RECORD_2,
    &GEN_DATA_RECORD_3,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_codec::MessageCodec;
    use crate::types::{CodecError, DecodedMessage, SignalValue};

    fn float(message: &DecodedMessage, name: &str) -> f64 {
        message.value(name).and_then(|v| v.as_f64()).unwrap()
    }

    #[test]
    fn test_decode_info() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x03, 0xE8, 0x32];
        let message = MessageCodec::decode(&INFO, &data).unwrap();

        assert_eq!(float(&message, "Current"), 0.0);
        assert_eq!(float(&message, "UpStreamVoltage"), 0.0);
        assert!((float(&message, "DownStreamVoltage") - 100.0).abs() < 1e-9);
        assert_eq!(message.value("SOH"), Some(&SignalValue::Integer(50)));
        assert_eq!(message.signal("DownStreamVoltage").unwrap().raw_value, 1000);
    }

    #[test]
    fn test_info_current_extremes() {
        let message = MessageCodec::decode(&INFO, &[0x80, 0x00, 0, 0, 0, 0, 0]).unwrap();
        assert!((float(&message, "Current") + 3276.8).abs() < 1e-9);

        let message = MessageCodec::decode(&INFO, &[0x7F, 0xFF, 0, 0, 0, 0, 0]).unwrap();
        assert!((float(&message, "Current") - 3276.7).abs() < 1e-9);

        let message = MessageCodec::decode(&INFO, &[0xFF, 0xFF, 0, 0, 0, 0, 0]).unwrap();
        assert!((float(&message, "Current") + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_encode_info() {
        let record = DecodedMessage::new(ID_INFO, "BMS_VMU_INFO")
            .with_signal("Current", -12.5)
            .with_signal("UpStreamVoltage", 400.0)
            .with_signal("DownStreamVoltage", 399.9)
            .with_signal("SOH", 98i64);
        let data = MessageCodec::encode(&INFO, &record).unwrap();
        // -125 = 0xFF83, 4000 = 0x0FA0, 3999 = 0x0F9F
        assert_eq!(data, vec![0xFF, 0x83, 0x0F, 0xA0, 0x0F, 0x9F, 98]);

        let record = record.with_signal("Current", 3300.0);
        assert!(matches!(
            MessageCodec::encode(&INFO, &record),
            Err(CodecError::Range { .. })
        ));
    }

    #[test]
    fn test_info_wrong_length() {
        let err = MessageCodec::decode(&INFO, &[0u8; 8]).unwrap_err();
        assert!(matches!(err, CodecError::Format { expected: 7, actual: 8, .. }));
    }

    #[test]
    fn test_decode_status() {
        // drive mode, 80 % SoC, warning + DC contactor closed, cooling, charge ended
        let data = [0x02, 80, 0b0010_0010, 0b0110_0001];
        let message = MessageCodec::decode(&BMS_VMU_STATUS, &data).unwrap();

        assert_eq!(message.value("Mode"), Some(&SignalValue::Integer(2)));
        assert_eq!(
            message.signal("Mode").and_then(|s| s.value_description.as_deref()),
            Some("DRIVE")
        );
        assert_eq!(message.value("Soc"), Some(&SignalValue::Integer(80)));
        assert_eq!(message.value("IsFailure"), Some(&SignalValue::Boolean(false)));
        assert_eq!(message.value("IsWarning"), Some(&SignalValue::Boolean(true)));
        assert_eq!(message.value("IsDcContactorClosed"), Some(&SignalValue::Boolean(true)));
        assert_eq!(message.value("IsCooling"), Some(&SignalValue::Boolean(true)));
        assert_eq!(message.value("IsThermalForcing"), Some(&SignalValue::Boolean(false)));
        assert_eq!(message.value("ChargePhase"), Some(&SignalValue::Integer(6)));
        assert_eq!(
            message
                .signal("ChargePhase")
                .and_then(|s| s.value_description.as_deref()),
            Some("CHARGE ENDED")
        );
    }

    #[test]
    fn test_encode_vmu_status() {
        let record = DecodedMessage::new(ID_VMU_BMS_STATUS, "VMU_BMS_STATUS")
            .with_signal("AskMode", AskMode::Charge.raw())
            .with_signal("InsuResMeasEn", true)
            .with_signal("BmsDestAddr", 0x1Ei64);
        let data = MessageCodec::encode(&VMU_BMS_STATUS, &record).unwrap();
        assert_eq!(data, vec![0x11, 0x1E, 0, 0, 0, 0, 0, 0]);

        let record = record.with_signal("AskMode", 3i64);
        assert!(matches!(
            MessageCodec::encode(&VMU_BMS_STATUS, &record),
            Err(CodecError::Range { ref signal, .. }) if signal == "AskMode"
        ));
    }

    #[test]
    fn test_failure_word_bits() {
        // Safety_Reserved = 0b101, Safety_TempmaxMod, Reserved = 1, Safety_Generic
        let data = [0xA0, 0x00, 0x00, 0x01, 0x00, 0x00, 0x08, 0x01];
        let message = MessageCodec::decode(&FAILURE, &data).unwrap();

        assert_eq!(message.value("Safety_Generic"), Some(&SignalValue::Boolean(true)));
        assert_eq!(message.value("ExternalCommunication"), Some(&SignalValue::Boolean(false)));
        assert_eq!(message.value("Safety_TempmaxMod"), Some(&SignalValue::Boolean(true)));
        assert_eq!(message.value("Safety_TempImbalance"), Some(&SignalValue::Boolean(false)));
        assert_eq!(message.value("Safety_ApplComm"), Some(&SignalValue::Boolean(false)));
        assert_eq!(message.value("Reserved"), Some(&SignalValue::Integer(1)));
        assert_eq!(message.value("Safety_Reserved"), Some(&SignalValue::Integer(0b101)));
    }

    #[test]
    fn test_failure_single_flags() {
        let cases: [(&str, [u8; 8]); 4] = [
            ("CurmaxFuse", [0, 0, 0, 0, 0, 0, 0x04, 0]),
            ("Safety_Curmax60s", [0, 0, 0x02, 0, 0, 0, 0, 0]),
            ("Safety_Hvil", [0, 0x20, 0, 0, 0, 0, 0, 0]),
            ("Safety_ApplComm", [0x10, 0, 0, 0, 0, 0, 0, 0]),
        ];
        for (name, data) in cases {
            let message = MessageCodec::decode(&FAILURE, &data).unwrap();
            let set: Vec<&str> = message
                .signals
                .iter()
                .filter(|s| s.value == SignalValue::Boolean(true))
                .map(|s| s.name.as_str())
                .collect();
            assert_eq!(set, vec![name]);
        }
    }

    #[test]
    fn test_cell_and_temperature_info() {
        let data = [0x0C, 0xE4, 0x0D, 0x05, 0x0D, 0x2A];
        let message = MessageCodec::decode(&INFO_CELLS, &data).unwrap();
        assert_eq!(message.value("MinimumCellVoltage"), Some(&SignalValue::Integer(3300)));
        assert_eq!(message.value("AverageCellVoltage"), Some(&SignalValue::Integer(3333)));
        assert_eq!(message.value("MaximumCellVoltage"), Some(&SignalValue::Integer(3370)));

        let message = MessageCodec::decode(&INFO_TEMPERATURE, &[0xF6, 0x14, 0x1E]).unwrap();
        assert_eq!(message.value("MinimumCellTemperature"), Some(&SignalValue::Integer(-10)));
        assert_eq!(message.value("AverageCellTemperature"), Some(&SignalValue::Integer(20)));
        assert_eq!(message.value("MaximumCellTemperature"), Some(&SignalValue::Integer(30)));

        let data = [0xFF, 0x80, 0x01, 0x2C, 0x00, 0x19, 0x00, 0x1E];
        let message = MessageCodec::decode(&INFO_JB_TEMPERATURE, &data).unwrap();
        assert_eq!(message.value("JunctionBoxShuntTempMeas"), Some(&SignalValue::Integer(-128)));
        assert_eq!(message.value("JunctionBoxShuntTempMax"), Some(&SignalValue::Integer(300)));
    }

    #[test]
    fn test_gen_data_record_round_trip() {
        let record = DecodedMessage::new(ID_GEN_DATA_RECORD_2, "VMU_BMS_GEN_DATA_RECORD_2")
            .with_signal("GenRecordValue3", -2i64)
            .with_signal("GenRecordValue4", 0x01020304i64);
        let data = MessageCodec::encode(&GEN_DATA_RECORD_2, &record).unwrap();
        assert_eq!(data, vec![0xFF, 0xFF, 0xFF, 0xFE, 0x01, 0x02, 0x03, 0x04]);

        let decoded = MessageCodec::decode(&GEN_DATA_RECORD_2, &data).unwrap();
        assert_eq!(decoded.value("GenRecordValue3"), Some(&SignalValue::Integer(-2)));
        assert_eq!(decoded.value("GenRecordValue4"), Some(&SignalValue::Integer(0x01020304)));
    }

    #[test]
    fn test_force_heating() {
        let record = DecodedMessage::new(ID_FORCE_HEATING, "VMU_BMS_FORCE_HEATING")
            .with_signal("ForceOn", false)
            .with_signal("ForceOff", true)
            .with_signal("BmsDestAddr", 0x1Ei64);
        let data = MessageCodec::encode(&FORCE_HEATING, &record).unwrap();
        assert_eq!(data, vec![0x02, 0x1E, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_set_points() {
        // 750.0 V, 125.5 A
        let message = MessageCodec::decode(&SP_CHARGE, &[0x1D, 0x4C, 0x04, 0xE7]).unwrap();
        assert!((float(&message, "ChargeVoltage") - 750.0).abs() < 1e-9);
        assert!((float(&message, "MaxChargeCurrent") - 125.5).abs() < 1e-9);

        let message = MessageCodec::decode(&SP_DETAIL_RMS_5, &[0x00, 0x64, 0x00, 0xC8]).unwrap();
        assert!((float(&message, "RmsMeasuredCurrent900s") - 10.0).abs() < 1e-9);
        assert!((float(&message, "RmsAlertThreshold900s") - 20.0).abs() < 1e-9);

        let raw = 123_456u32.to_be_bytes();
        let data = [raw[0], raw[1], raw[2], raw[3], 0, 0, 0, 0];
        let message = MessageCodec::decode(&VMU_STATS, &data).unwrap();
        assert!((float(&message, "CounterCharge") - 1234.56).abs() < 1e-9);
    }
}
