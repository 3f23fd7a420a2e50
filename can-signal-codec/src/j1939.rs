//! J1939 identifier helpers
//!
//! Slicing of 29-bit arbitration IDs into priority, PGN and source address,
//! and the inverse composition used when a message is put on the bus.
//!
//! ```text
//!  28..26     25   24   23..16   15..8    7..0
//! priority   R    DP     PF      PS      SA
//! ```

/// Default priority for non-control messages
pub const DEFAULT_PRIORITY: u8 = 6;

/// Global destination address
pub const GLOBAL_ADDRESS: u8 = 0xFF;

/// PDU format values below this are destination specific (PDU1)
const PDU2_THRESHOLD: u32 = 0xF0;

/// Extract the PGN of a 29-bit identifier.
///
/// Returns `None` when the reserved or data-page bit is set; only page-0
/// parameter groups are recognised. For PDU1 formats the PDU-specific byte is
/// a destination address and not part of the PGN.
pub fn pgn_from_can_id(can_id: u32) -> Option<u32> {
    let reserved = (can_id >> 25) & 0x1;
    let data_page = (can_id >> 24) & 0x1;
    if reserved != 0 || data_page != 0 {
        return None;
    }

    let pdu_format = (can_id >> 16) & 0xFF;
    let pdu_specific = (can_id >> 8) & 0xFF;
    if pdu_format < PDU2_THRESHOLD {
        Some(pdu_format << 8)
    } else {
        Some((pdu_format << 8) | pdu_specific)
    }
}

/// Source address (lowest byte) of an identifier
pub fn source_address(can_id: u32) -> u8 {
    (can_id & 0xFF) as u8
}

/// Priority (bits 26..28) of an identifier
pub fn priority(can_id: u32) -> u8 {
    ((can_id >> 26) & 0x7) as u8
}

/// Destination address of a PDU1 identifier; `None` for broadcast (PDU2) PGNs
pub fn destination_address(can_id: u32) -> Option<u8> {
    let pdu_format = (can_id >> 16) & 0xFF;
    if pdu_format < PDU2_THRESHOLD {
        Some(((can_id >> 8) & 0xFF) as u8)
    } else {
        None
    }
}

/// True if the PGN is destination specific
pub fn is_pdu1(pgn: u32) -> bool {
    ((pgn >> 8) & 0xFF) < PDU2_THRESHOLD
}

/// Compose a 29-bit identifier from priority, PGN and source address.
///
/// PDU1 PGNs are addressed to the global destination.
///
/// # Example
/// ```
/// use can_signal_codec::j1939::can_id_from_pgn;
///
/// assert_eq!(can_id_from_pgn(0xFF01, 6, 0xF4), 0x18FF01F4);
/// ```
pub fn can_id_from_pgn(pgn: u32, priority: u8, source_address: u8) -> u32 {
    let pgn = pgn & 0xFFFF;
    let pgn = if is_pdu1(pgn) {
        (pgn & 0xFF00) | GLOBAL_ADDRESS as u32
    } else {
        pgn
    };
    ((priority as u32 & 0x7) << 26) | (pgn << 8) | source_address as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdu2_identifier() {
        // EEC1 from engine controller 0x00
        let id = 0x0CF00400;
        assert_eq!(pgn_from_can_id(id), Some(61444));
        assert_eq!(source_address(id), 0x00);
        assert_eq!(priority(id), 3);
        assert_eq!(destination_address(id), None);

        // ISO175 general from 0xF4
        assert_eq!(pgn_from_can_id(0x18FF01F4), Some(65281));
        assert_eq!(source_address(0x18FF01F4), 0xF4);
    }

    #[test]
    fn test_pdu1_identifier_drops_destination() {
        // TSC1 (PGN 0) to engine 0x00 from 0x03
        let id = 0x0C000003;
        assert_eq!(pgn_from_can_id(id), Some(0));
        assert_eq!(destination_address(id), Some(0x00));

        let id = 0x18EAFF21;
        assert_eq!(pgn_from_can_id(id), Some(0xEA00));
        assert_eq!(destination_address(id), Some(0xFF));
    }

    #[test]
    fn test_reserved_and_data_page_rejected() {
        assert_eq!(pgn_from_can_id(0x19FF0100), None);
        assert_eq!(pgn_from_can_id(0x1AFF0100), None);
    }

    #[test]
    fn test_compose_identifier() {
        assert_eq!(can_id_from_pgn(0xFF01, DEFAULT_PRIORITY, 0xF4), 0x18FF01F4);
        assert_eq!(can_id_from_pgn(0xFEF1, DEFAULT_PRIORITY, 0x27), 0x18FEF127);
        assert_eq!(can_id_from_pgn(0xEA00, DEFAULT_PRIORITY, 0x21), 0x18EAFF21);

        let id = can_id_from_pgn(61444, 3, 0x00);
        assert_eq!(pgn_from_can_id(id), Some(61444));
        assert_eq!(priority(id), 3);
    }
}
