//! Property tests: every catalog message survives encode followed by decode
//!
//! Values are generated on the raw side, inside each signal's valid range and
//! away from its sentinel, then lifted to physical values the same way the
//! codec does.

use can_signal_codec::scaling;
use can_signal_codec::{
    messages, DecodedMessage, Dispatcher, MessageDefinition, SignalDefinition, SignalValue,
};
use proptest::prelude::*;

const MAX_SIGNALS: usize = 64;

fn definitions() -> Vec<&'static MessageDefinition> {
    messages::all().collect()
}

/// Raw bounds that stay inside the physical range after scaling
fn valid_raw_bounds(signal: &SignalDefinition) -> (i64, i64) {
    let (raw_min, raw_max) = signal.raw_bounds();
    let (min, max) = signal.physical_range();
    let a = scaling::remove_scale(min, signal.conversion);
    let b = scaling::remove_scale(max, signal.conversion);
    let lo = (a.min(b) - 1e-6).ceil().max(raw_min as f64) as i64;
    let hi = (a.max(b) + 1e-6).floor().min(raw_max as f64) as i64;
    (lo, hi)
}

fn pick_raw(signal: &SignalDefinition, seed: u64) -> i64 {
    let (lo, hi) = valid_raw_bounds(signal);
    let span = (hi as i128 - lo as i128 + 1) as u128;
    let raw = (lo as i128 + (seed as u128 % span) as i128) as i64;

    let bits = (raw as u64) & ((1u64 << signal.length) - 1);
    if signal.sentinel() == Some(bits) {
        lo
    } else {
        raw
    }
}

fn physical_value(signal: &SignalDefinition, raw: i64) -> SignalValue {
    if signal.is_flag() {
        SignalValue::Boolean(raw != 0)
    } else if signal.conversion.is_identity() {
        SignalValue::Integer(raw)
    } else {
        SignalValue::Float(scaling::apply_scale(raw, signal.conversion))
    }
}

fn build_record(
    message_def: &MessageDefinition,
    multiplexer: Option<u64>,
    seeds: &[u64],
) -> DecodedMessage {
    let mut record = DecodedMessage::new(message_def.id, message_def.name);
    if let Some(value) = multiplexer {
        record = record.with_multiplexer(value);
    }

    for (signal, seed) in message_def.signals.iter().zip(seeds) {
        if signal.is_multiplexer || !signal.is_active(multiplexer) {
            continue;
        }
        let raw = pick_raw(signal, *seed);
        record = record.with_signal(signal.name, physical_value(signal, raw));
    }
    record
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_encode_then_decode_preserves_values(
        index in 0usize..1024,
        channel_seed in any::<u64>(),
        seeds in prop::collection::vec(any::<u64>(), MAX_SIGNALS),
    ) {
        let definitions = definitions();
        let message_def = definitions[index % definitions.len()];
        prop_assume!(message_def.signals.len() <= MAX_SIGNALS);

        let multiplexer = if message_def.is_multiplexed() {
            let channels = message_def.multiplexer_values();
            Some(channels[(channel_seed % channels.len() as u64) as usize])
        } else {
            None
        };

        let record = build_record(message_def, multiplexer, &seeds);
        let dispatcher = Dispatcher::new();

        let payload = dispatcher.encode(&record).unwrap();
        prop_assert_eq!(payload.len(), message_def.size);

        let decoded = dispatcher.decode(message_def.id, &payload).unwrap();
        prop_assert_eq!(decoded.multiplexer_value, multiplexer);
        for signal in &record.signals {
            prop_assert_eq!(
                decoded.value(&signal.name),
                Some(&signal.value),
                "{}.{}",
                message_def.name,
                signal.name
            );
        }

        // The decoded record encodes back to the same bytes
        prop_assert_eq!(dispatcher.encode(&decoded).unwrap(), payload);
    }

    #[test]
    fn prop_wrong_length_is_format_error(
        index in 0usize..1024,
        extra in 1usize..8,
        shorter in any::<bool>(),
    ) {
        let definitions = definitions();
        let message_def = definitions[index % definitions.len()];
        let len = if shorter {
            message_def.size.saturating_sub(extra)
        } else {
            message_def.size + extra
        };
        prop_assume!(len != message_def.size);

        let err = Dispatcher::new().decode(message_def.id, &vec![0u8; len]).unwrap_err();
        prop_assert!(err.is_format_error(), "{}: {:?}", message_def.name, err);
    }

    #[test]
    fn prop_decode_never_panics(
        id in prop_oneof![
            any::<u32>(),
            (0usize..1024).prop_map(|i| {
                let definitions = definitions();
                definitions[i % definitions.len()].id
            }),
        ],
        payload in prop::collection::vec(any::<u8>(), 0..12),
    ) {
        let _ = Dispatcher::new().decode(id, &payload);
    }
}

#[test]
fn test_every_message_is_reachable_by_id() {
    let dispatcher = Dispatcher::new();
    for message_def in definitions() {
        let found = dispatcher.definition(message_def.id).map(|d| d.name);
        assert_eq!(found, Some(message_def.name));
    }
}
