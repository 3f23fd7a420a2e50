//! J1939 engine messages
//!
//! Telemetry broadcast by the engine controller, plus the two messages the
//! vehicle sends to it: the proprietary engine control command and CCVS.
//! All layouts are 8 bytes, little-endian, keyed by PGN.

use crate::signals::{ByteOrder, IdKind, MessageDefinition, SignalDefinition};

const LE: ByteOrder = ByteOrder::LittleEndian;

/// Electronic Engine Controller 1
pub const PGN_EEC1: u32 = 61444;
/// Electronic Engine Controller 2
pub const PGN_EEC2: u32 = 61443;
/// Electronic Engine Controller 3
pub const PGN_EEC3: u32 = 65247;
/// Engine Temperature 1
pub const PGN_ET1: u32 = 65262;
/// Fuel Economy (liquid)
pub const PGN_LFE: u32 = 65266;
/// Vehicle Electrical Power 1
pub const PGN_VEP1: u32 = 65271;
/// Ambient Conditions
pub const PGN_AMB: u32 = 65269;
/// Fuel Consumption (liquid)
pub const PGN_LFC: u32 = 65257;
/// Shutdown
pub const PGN_SHUTDN: u32 = 65252;
/// Cruise Control / Vehicle Speed
pub const PGN_CCVS: u32 = 65265;
/// Proprietary B engine control command
pub const PGN_ENGINE_CONTROL: u32 = 65280;

status_enum! {
    /// Engine starter mode (EEC1 byte 6, low nibble)
    StarterMode {
        StartNotRequested = 0 => "START NOT REQUESTED",
        StarterActive = 2 => "STARTER ACTIVE",
        StartInhibitedEngineRunning = 4 => "START INHIBITED - ENGINE ALREADY RUNNING",
        StartInhibited = 12 => "START INHIBITED",
    }
    unknown => "STATUS UNKNOWN"
}

status_enum! {
    /// Two-bit J1939 discrete command
    SwitchState {
        Off = 0 => "OFF",
        On = 1 => "ON",
        Error = 2 => "ERROR",
        NotAvailable = 3 => "NOT AVAILABLE",
    }
    unknown => "UNKNOWN"
}

const TORQUE_OFFSET: f64 = -125.0;
const MAX_ENGINE_SPEED: f64 = 8031.875;

pub static EEC1: MessageDefinition = MessageDefinition {
    id: PGN_EEC1,
    id_kind: IdKind::Pgn,
    name: "EEC1",
    size: 8,
    sender: "Engine",
    signals: &[
        SignalDefinition::unsigned("EngineTorqueMode", 0, 4, LE),
        SignalDefinition::unsigned("DriverDemandTorque", 8, 8, LE)
            .scale(1.0, TORQUE_OFFSET)
            .range(-125.0, 125.0)
            .unit("%"),
        SignalDefinition::unsigned("ActualEngineTorque", 16, 8, LE)
            .scale(1.0, TORQUE_OFFSET)
            .range(-125.0, 125.0)
            .unit("%"),
        SignalDefinition::unsigned("EngineSpeed", 24, 16, LE)
            .scale(0.125, 0.0)
            .range(0.0, MAX_ENGINE_SPEED)
            .unit("rpm"),
        SignalDefinition::unsigned("Tsc1SourceAddress", 40, 8, LE),
        SignalDefinition::unsigned("StarterMode", 48, 4, LE).lookup(StarterMode::text),
        SignalDefinition::unsigned("EngineDemandTorque", 56, 8, LE)
            .scale(1.0, TORQUE_OFFSET)
            .range(-125.0, 125.0)
            .unit("%"),
    ],
};

pub static EEC2: MessageDefinition = MessageDefinition {
    id: PGN_EEC2,
    id_kind: IdKind::Pgn,
    name: "EEC2",
    size: 8,
    sender: "Engine",
    signals: &[
        SignalDefinition::unsigned("AcceleratorPedalPosition", 8, 8, LE)
            .scale(0.4, 0.0)
            .range(0.0, 100.0)
            .unit("%"),
        SignalDefinition::unsigned("EngineLoad", 16, 8, LE)
            .range(0.0, 250.0)
            .unit("%"),
    ],
};

pub static EEC3: MessageDefinition = MessageDefinition {
    id: PGN_EEC3,
    id_kind: IdKind::Pgn,
    name: "EEC3",
    size: 8,
    sender: "Engine",
    signals: &[SignalDefinition::unsigned("DesiredOperatingSpeed", 8, 16, LE)
        .scale(0.125, 0.0)
        .range(0.0, MAX_ENGINE_SPEED)
        .unit("rpm")],
};

pub static ET1: MessageDefinition = MessageDefinition {
    id: PGN_ET1,
    id_kind: IdKind::Pgn,
    name: "ET1",
    size: 8,
    sender: "Engine",
    signals: &[SignalDefinition::unsigned("EngineCoolantTemperature", 0, 8, LE)
        .scale(1.0, -40.0)
        .range(-40.0, 210.0)
        .unit("°C")],
};

pub static LFE: MessageDefinition = MessageDefinition {
    id: PGN_LFE,
    id_kind: IdKind::Pgn,
    name: "LFE",
    size: 8,
    sender: "Engine",
    signals: &[
        SignalDefinition::unsigned("FuelRate", 0, 16, LE)
            .scale(0.05, 0.0)
            .range(0.0, 3212.75)
            .unit("L/h")
            .not_valid(),
        SignalDefinition::unsigned("ThrottlePosition", 48, 8, LE)
            .scale(0.4, 0.0)
            .range(0.0, 100.0)
            .unit("%"),
    ],
};

pub static VEP1: MessageDefinition = MessageDefinition {
    id: PGN_VEP1,
    id_kind: IdKind::Pgn,
    name: "VEP1",
    size: 8,
    sender: "Engine",
    signals: &[SignalDefinition::unsigned("BatteryPotential", 32, 16, LE)
        .scale(0.05, 0.0)
        .range(0.0, 3212.75)
        .unit("V")
        .not_valid()],
};

pub static AMB: MessageDefinition = MessageDefinition {
    id: PGN_AMB,
    id_kind: IdKind::Pgn,
    name: "AMB",
    size: 8,
    sender: "Engine",
    signals: &[SignalDefinition::unsigned("BarometricPressure", 0, 8, LE)
        .scale(0.5, 0.0)
        .range(0.0, 125.0)
        .unit("kPa")],
};

pub static LFC: MessageDefinition = MessageDefinition {
    id: PGN_LFC,
    id_kind: IdKind::Pgn,
    name: "LFC",
    size: 8,
    sender: "Engine",
    signals: &[SignalDefinition::unsigned("TotalFuelUsed", 32, 32, LE)
        .scale(0.5, 0.0)
        .range(0.0, 2_105_540_607.5)
        .unit("L")
        .not_valid()],
};

pub static SHUTDN: MessageDefinition = MessageDefinition {
    id: PGN_SHUTDN,
    id_kind: IdKind::Pgn,
    name: "SHUTDN",
    size: 8,
    sender: "Engine",
    signals: &[
        SignalDefinition::unsigned("WaitToStartLamp", 24, 2, LE).lookup(SwitchState::text),
        SignalDefinition::unsigned("EngineShutdownStatus", 32, 2, LE).lookup(SwitchState::text),
    ],
};

pub static CCVS: MessageDefinition = MessageDefinition {
    id: PGN_CCVS,
    id_kind: IdKind::Pgn,
    name: "CCVS",
    size: 8,
    sender: "Vehicle",
    signals: &[SignalDefinition::unsigned("WheelBasedVehicleSpeed", 8, 16, LE)
        .scale(1.0 / 256.0, 0.0)
        .range(0.0, 250.996)
        .unit("km/h")],
};

pub static ENGINE_CONTROL: MessageDefinition = MessageDefinition {
    id: PGN_ENGINE_CONTROL,
    id_kind: IdKind::Pgn,
    name: "ENGINE_CONTROL",
    size: 8,
    sender: "Vehicle",
    signals: &[
        SignalDefinition::unsigned("EngineStart", 0, 2, LE).lookup(SwitchState::text),
        SignalDefinition::unsigned("EngineStop", 2, 2, LE).lookup(SwitchState::text),
        SignalDefinition::unsigned("Preheat", 4, 2, LE).lookup(SwitchState::text),
        SignalDefinition::unsigned("ShutdownOverride", 6, 2, LE).lookup(SwitchState::text),
        SignalDefinition::unsigned("SpeedControlMode", 8, 4, LE),
        SignalDefinition::unsigned("GovernorMode", 12, 4, LE),
        SignalDefinition::unsigned("RequestedSpeed", 16, 16, LE)
            .scale(0.125, 0.0)
            .range(0.0, MAX_ENGINE_SPEED)
            .unit("rpm"),
        SignalDefinition::unsigned("RequestedTorque", 32, 8, LE)
            .scale(1.0, TORQUE_OFFSET)
            .range(-125.0, 125.0)
            .unit("%"),
        SignalDefinition::unsigned("ThrottleRequest", 40, 8, LE)
            .scale(0.4, 0.0)
            .range(0.0, 100.0)
            .unit("%"),
    ],
};

pub static MESSAGES: &[&MessageDefinition] = &[
    &EEC1,
    &EEC2,
    &EEC3,
    &ET1,
    &LFE,
    &VEP1,
    &AMB,
    &LFC,
    &SHUTDN,
    &CCVS,
    &ENGINE_CONTROL,
];
