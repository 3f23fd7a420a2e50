//! ISO175 insulation monitoring device
//!
//! Four proprietary-B PGNs broadcast by the device, all 8 bytes,
//! little-endian. Resistances are in kΩ; 0xFFFF (or 0xFF for byte fields)
//! means the device has no valid reading yet.

use crate::signals::{ByteOrder, IdKind, MessageDefinition, SignalDefinition};

const LE: ByteOrder = ByteOrder::LittleEndian;

/// Source address the device claims by default
pub const DEFAULT_SOURCE_ADDRESS: u8 = 0xF4;

pub const PGN_INFO_GENERAL: u32 = 65281;
pub const PGN_INFO_ISOLATION_DETAIL: u32 = 65282;
pub const PGN_INFO_VOLTAGE: u32 = 65283;
pub const PGN_INFO_IT_SYSTEM: u32 = 65284;

/// Raw offset of the HV-to-earth voltages
const EARTH_VOLTAGE_OFFSET: i64 = 32128;

status_enum! {
    /// Quality of the reported isolation resistance
    IsolationStatus {
        EstimatedDuringStartup = 0xFC => "ESTIMATED ISOLATION VALUE DURING STARTUP",
        FirstMeasuredDuringStartup = 0xFD => "FIRST MEASURED ISOLATION VALUE DURING STARTUP",
        NormalOperation = 0xFE => "ISOLATION VALUE IN NORMAL OPERATION",
        NotValid = 0xFF => "SNV",
    }
    unknown => "UNKNOWN STATUS"
}

status_enum! {
    /// Operating state of the device
    DeviceActivity {
        Init = 0 => "Init",
        Normal = 1 => "Normal",
        SelfTest = 2 => "SelfTest",
    }
    unknown => "Unknown"
}

pub static INFO_GENERAL: MessageDefinition = MessageDefinition {
    id: PGN_INFO_GENERAL,
    id_kind: IdKind::Pgn,
    name: "ISO175_INFO_GENERAL",
    size: 8,
    sender: "ISO175",
    signals: &[
        SignalDefinition::unsigned("RIsoCorrected", 0, 16, LE)
            .range(0.0, 35000.0)
            .unit("kΩ")
            .not_valid(),
        SignalDefinition::unsigned("RIsoStatus", 16, 8, LE).lookup(IsolationStatus::text),
        SignalDefinition::unsigned("IsoMeasurementCounter", 24, 8, LE),
        SignalDefinition::flag("DeviceError", 32, LE),
        SignalDefinition::flag("HvPosConnectionFailure", 33, LE),
        SignalDefinition::flag("HvNegConnectionFailure", 34, LE),
        SignalDefinition::flag("EarthConnectionFailure", 35, LE),
        SignalDefinition::flag("IsoAlarm", 36, LE),
        SignalDefinition::flag("IsoWarning", 37, LE),
        SignalDefinition::flag("IsoOutdated", 38, LE),
        SignalDefinition::flag("UnbalanceAlarm", 39, LE),
        SignalDefinition::flag("UndervoltageAlarm", 40, LE),
        SignalDefinition::flag("UnsafeToStart", 41, LE),
        SignalDefinition::flag("EarthliftOpen", 42, LE),
        SignalDefinition::unsigned("DeviceActivity", 48, 8, LE).lookup(DeviceActivity::text),
    ],
};

pub static INFO_ISOLATION_DETAIL: MessageDefinition = MessageDefinition {
    id: PGN_INFO_ISOLATION_DETAIL,
    id_kind: IdKind::Pgn,
    name: "ISO175_INFO_ISOLATION_DETAIL",
    size: 8,
    sender: "ISO175",
    signals: &[
        SignalDefinition::unsigned("RIsoNegative", 0, 16, LE)
            .range(0.0, 50000.0)
            .unit("kΩ")
            .not_valid(),
        SignalDefinition::unsigned("RIsoPositive", 16, 16, LE)
            .range(0.0, 50000.0)
            .unit("kΩ")
            .not_valid(),
        SignalDefinition::unsigned("RIsoOriginal", 32, 16, LE)
            .range(0.0, 50000.0)
            .unit("kΩ")
            .not_valid(),
        SignalDefinition::unsigned("IsoMeasurementCounter", 48, 8, LE),
        SignalDefinition::unsigned("IsolationQuality", 56, 8, LE)
            .range(0.0, 100.0)
            .unit("%")
            .not_valid(),
    ],
};

pub static INFO_VOLTAGE: MessageDefinition = MessageDefinition {
    id: PGN_INFO_VOLTAGE,
    id_kind: IdKind::Pgn,
    name: "ISO175_INFO_VOLTAGE",
    size: 8,
    sender: "ISO175",
    signals: &[
        SignalDefinition::unsigned("HvSystemVoltage", 0, 16, LE)
            .scale(0.05, 0.0)
            .range(0.0, 3276.7)
            .unit("V")
            .not_valid(),
        SignalDefinition::unsigned("HvNegToEarthVoltage", 16, 16, LE)
            .offset_first(EARTH_VOLTAGE_OFFSET, 0.05)
            .range(-1606.4, 1670.3)
            .unit("V")
            .not_valid(),
        SignalDefinition::unsigned("HvPosToEarthVoltage", 32, 16, LE)
            .offset_first(EARTH_VOLTAGE_OFFSET, 0.05)
            .range(-1606.4, 1670.3)
            .unit("V")
            .not_valid(),
        SignalDefinition::unsigned("VoltageMeasurementCounter", 48, 8, LE),
    ],
};

pub static INFO_IT_SYSTEM: MessageDefinition = MessageDefinition {
    id: PGN_INFO_IT_SYSTEM,
    id_kind: IdKind::Pgn,
    name: "ISO175_INFO_IT_SYSTEM",
    size: 8,
    sender: "ISO175",
    signals: &[
        SignalDefinition::unsigned("CapacityMeasuredValue", 0, 16, LE)
            .scale(0.1, 0.0)
            .range(0.0, 6425.5)
            .unit("µF")
            .not_valid(),
        SignalDefinition::unsigned("CapacityMeasurementCounter", 16, 8, LE),
        SignalDefinition::unsigned("UnbalanceMeasuredValue", 24, 8, LE)
            .range(0.0, 100.0)
            .unit("%")
            .not_valid(),
        SignalDefinition::unsigned("UnbalanceMeasurementCounter", 32, 8, LE),
        SignalDefinition::unsigned("VoltageFrequency", 40, 16, LE)
            .scale(0.1, 0.0)
            .range(0.0, 6425.5)
            .unit("Hz")
            .not_valid(),
    ],
};

pub static MESSAGES: &[&MessageDefinition] = &[
    &INFO_GENERAL,
    &INFO_ISOLATION_DETAIL,
    &INFO_VOLTAGE,
    &INFO_IT_SYSTEM,
];
