//! CAN Signal Codec Library
//!
//! A stateless codec between fixed-length CAN/J1939 payloads and named,
//! scaled signal values for the devices on a vehicle bus: engine controller,
//! insulation monitor, battery management system and current sensor.
//!
//! # Architecture
//!
//! - `scaling`: raw integer reads/writes and linear physical conversion
//! - `signals`: declarative signal tables and the immutable message catalog
//! - `message_codec`: the one generic routine that interprets a table
//! - `messages`: the built-in tables, one module per device family
//! - `dispatcher`: ID-based routing, bus frame resolution, filters
//! - `j1939`: 29-bit identifier slicing and composition
//!
//! The library does NOT talk to a bus, keep state between frames, or decide
//! anything based on the values it decodes.
//!
//! # Example Usage
//!
//! ```
//! use can_signal_codec::{CanFrame, CodecConfig, Dispatcher, SignalValue};
//!
//! let dispatcher = Dispatcher::new()
//!     .with_config(CodecConfig::new().with_channel_filter(vec![0]));
//!
//! // BMS INFO: 0 A, 0 V upstream, 100 V downstream, 50 % SOH
//! let frame = CanFrame::new(0x18FF201E, vec![0, 0, 0, 0, 0x03, 0xE8, 0x32]);
//! let decoded = dispatcher.decode_frame(&frame).unwrap().unwrap();
//! assert_eq!(decoded.message.value("SOH"), Some(&SignalValue::Integer(50)));
//!
//! // And back again
//! let payload = dispatcher.encode(&decoded.message).unwrap();
//! assert_eq!(payload, frame.data);
//! ```

// Public modules
pub mod config;
pub mod dispatcher;
pub mod j1939;
pub mod message_codec;
pub mod messages;
pub mod scaling;
pub mod signals;
pub mod types;

// Re-export main types for convenience
pub use config::{load_config, CodecConfig};
pub use dispatcher::Dispatcher;
pub use message_codec::MessageCodec;
pub use signals::{CatalogStats, MessageCatalog, MessageDefinition, SignalDefinition};
pub use types::{
    CanFrame, CodecError, DecodeError, DecodedFrame, DecodedMessage, DecodedSignal,
    EncodeError, Result, SignalValue, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
