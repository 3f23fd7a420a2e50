//! Built-in message catalog
//!
//! Signal tables for every device family the codec speaks to:
//! - `engine`: J1939 engine telemetry and the outbound engine control command
//! - `insulation`: ISO175 insulation monitoring device
//! - `battery`: Wattalps battery management system
//! - `current_sensor`: IVT-S current/voltage sensor (multiplexed)
//!
//! Enumerated status fields are backed by closed enums with an explicit
//! `Unknown` variant; their `as_str` text is attached to decoded signals as
//! `value_description`.

use crate::signals::MessageDefinition;

/// Declares a status enum with a fixed raw-code table and an `Unknown` fallback.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $raw:literal => $text:literal,)+
        }
        unknown => $unknown_text:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Code outside the documented table
            Unknown(i64),
        }

        impl $name {
            /// Map a raw code to its status; unlisted codes become `Unknown`
            pub fn from_raw(raw: i64) -> Self {
                match raw {
                    $($raw => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            /// Raw code of this status
            pub fn raw(&self) -> i64 {
                match self {
                    $($name::$variant => $raw,)+
                    $name::Unknown(raw) => *raw,
                }
            }

            /// Human-readable status text
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Unknown(_) => $unknown_text,
                }
            }

            pub(crate) fn text(raw: i64) -> &'static str {
                Self::from_raw(raw).as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod battery;
pub mod current_sensor;
pub mod engine;
pub mod insulation;

/// Every built-in message definition
pub fn all() -> impl Iterator<Item = &'static MessageDefinition> {
    engine::MESSAGES
        .iter()
        .chain(insulation::MESSAGES.iter())
        .chain(battery::MESSAGES.iter())
        .chain(current_sensor::MESSAGES.iter())
        .copied()
}
