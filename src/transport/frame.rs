//! Packet framing for the Rewind transport layer.
//!
//! Every Rewind datagram opens with a 14-byte header:
//!
//! ```text
//! +------------+--------+--------+----------------+--------+
//! | Signature  | Type   | Flags  | Sequence       | Length |
//! | "REWIND01" | LE16   | LE16   | LE32           | LE16   |
//! +------------+--------+--------+----------------+--------+
//! ```
//!
//! The sequence number is scoped to one of two real-time channels, selected
//! by bit 0 of the flags field. The two channels exist solely to keep two
//! concurrent logical streams from corrupting each other's sequence space.

use crate::core::{
    ClientError, ClientResult, FLAG_REAL_TIME_1, HEADER_SIZE, PROTOCOL_SIGN, SIGN_LENGTH,
};

/// Decoded packet header, signature stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Packet type code (`TYPE_*`).
    pub packet_type: u16,
    /// Flags bitset (`FLAG_*`).
    pub flags: u16,
    /// Channel-scoped sequence number.
    pub sequence: u32,
    /// Declared payload length in bytes.
    pub length: u16,
}

impl PacketHeader {
    /// Serialize the header, signature included (14 bytes).
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..SIGN_LENGTH].copy_from_slice(PROTOCOL_SIGN);
        buf[8..10].copy_from_slice(&self.packet_type.to_le_bytes());
        buf[10..12].copy_from_slice(&self.flags.to_le_bytes());
        buf[12..16].copy_from_slice(&self.sequence.to_le_bytes());
        buf[16..18].copy_from_slice(&self.length.to_le_bytes());
        buf
    }

    /// Parse a header from the start of a datagram.
    ///
    /// Fails with [`ClientError::WrongData`] if fewer than 14 bytes are
    /// present or the signature does not match.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ClientError::WrongData("short packet header"));
        }
        if &bytes[..SIGN_LENGTH] != PROTOCOL_SIGN {
            return Err(ClientError::WrongData("bad protocol signature"));
        }

        Ok(Self {
            packet_type: u16::from_le_bytes([bytes[8], bytes[9]]),
            flags: u16::from_le_bytes([bytes[10], bytes[11]]),
            sequence: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            length: u16::from_le_bytes([bytes[16], bytes[17]]),
        })
    }
}

/// A received packet with its payload copied out of the receive buffer.
#[derive(Debug, Clone)]
pub struct Packet {
    /// The decoded header.
    pub header: PacketHeader,
    /// Payload bytes, bounded by the header's declared length.
    pub payload: Vec<u8>,
}

/// The two per-channel sequence counters owned by a session.
///
/// Channel selection is a pure function of the flags value: bit 0
/// ([`FLAG_REAL_TIME_1`]) picks counter 1, everything else counter 0.
/// Within one channel, values strictly increase by 1 per encoded packet;
/// the unselected channel is never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceCounters {
    counters: [u32; 2],
}

impl SequenceCounters {
    /// Create a fresh counter pair, both channels at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel index selected by a flags value.
    pub fn channel(flags: u16) -> usize {
        (flags & FLAG_REAL_TIME_1) as usize
    }

    /// Current value of the channel a flags value selects, without
    /// advancing it.
    pub fn peek(&self, flags: u16) -> u32 {
        self.counters[Self::channel(flags)]
    }

    /// Take the current value of the selected channel and advance it.
    pub fn next(&mut self, flags: u16) -> u32 {
        let index = Self::channel(flags);
        let value = self.counters[index];
        self.counters[index] = value.wrapping_add(1);
        value
    }
}

/// Encode a complete datagram: header followed by payload.
///
/// The payload length must fit the header's 16-bit length field; the
/// session's transmit path enforces this before encoding.
pub fn encode(packet_type: u16, flags: u16, sequence: u32, payload: &[u8]) -> Vec<u8> {
    let header = PacketHeader {
        packet_type,
        flags,
        sequence,
        length: payload.len() as u16,
    };

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.to_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode a received datagram into its header and payload view.
///
/// The payload slice is bounded by the header's declared length, never by
/// the buffer capacity; a declared length past the end of the datagram is
/// rejected rather than over-read.
pub fn decode(bytes: &[u8]) -> ClientResult<(PacketHeader, &[u8])> {
    let header = PacketHeader::from_bytes(bytes)?;

    let end = HEADER_SIZE + header.length as usize;
    if bytes.len() < end {
        return Err(ClientError::WrongData("payload shorter than declared length"));
    }

    Ok((header, &bytes[HEADER_SIZE..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FLAG_NONE, TYPE_DMR_AUDIO_FRAME, TYPE_KEEP_ALIVE};

    #[test]
    fn test_header_roundtrip() {
        let header = PacketHeader {
            packet_type: TYPE_DMR_AUDIO_FRAME,
            flags: FLAG_REAL_TIME_1,
            sequence: 0xDEAD_BEEF,
            length: 27,
        };

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[..SIGN_LENGTH], PROTOCOL_SIGN);

        let parsed = PacketHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_known_byte_layout() {
        // Signature, then type/flags/sequence/length, all little-endian.
        let header = PacketHeader {
            packet_type: TYPE_KEEP_ALIVE,
            flags: FLAG_NONE,
            sequence: 0x0102_0304,
            length: 5,
        };
        assert_eq!(
            hex::encode(header.to_bytes()),
            "524557494e44303100000000040302010500"
        );
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = b"descriptor bytes";
        let datagram = encode(TYPE_KEEP_ALIVE, FLAG_NONE, 42, payload);

        let (header, body) = decode(&datagram).unwrap();
        assert_eq!(header.packet_type, TYPE_KEEP_ALIVE);
        assert_eq!(header.flags, FLAG_NONE);
        assert_eq!(header.sequence, 42);
        assert_eq!(header.length as usize, payload.len());
        assert_eq!(body, payload);
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let err = decode(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, ClientError::WrongData(_)));
    }

    #[test]
    fn test_decode_rejects_bad_signature() {
        let mut datagram = encode(TYPE_KEEP_ALIVE, FLAG_NONE, 0, b"data");
        datagram[0] = b'X';
        let err = decode(&datagram).unwrap_err();
        assert!(matches!(err, ClientError::WrongData("bad protocol signature")));

        // Any first-8-bytes mismatch fails, regardless of the remainder.
        let mut other = encode(TYPE_KEEP_ALIVE, FLAG_NONE, 0, b"data");
        other[..SIGN_LENGTH].copy_from_slice(b"REWIND02");
        assert!(decode(&other).is_err());
    }

    #[test]
    fn test_decode_rejects_overlong_declared_length() {
        let mut datagram = encode(TYPE_KEEP_ALIVE, FLAG_NONE, 0, b"abcd");
        // Declare more payload than the datagram carries.
        datagram[16..18].copy_from_slice(&100u16.to_le_bytes());
        let err = decode(&datagram).unwrap_err();
        assert!(matches!(err, ClientError::WrongData(_)));
    }

    #[test]
    fn test_decode_bounds_payload_by_declared_length() {
        // Trailing garbage past the declared length is not part of the payload.
        let mut datagram = encode(TYPE_KEEP_ALIVE, FLAG_NONE, 0, b"abcd");
        datagram.extend_from_slice(b"garbage");
        let (header, body) = decode(&datagram).unwrap();
        assert_eq!(header.length, 4);
        assert_eq!(body, b"abcd");
    }

    #[test]
    fn test_counters_select_by_flag_bit() {
        assert_eq!(SequenceCounters::channel(FLAG_NONE), 0);
        assert_eq!(SequenceCounters::channel(FLAG_REAL_TIME_1), 1);
        // Channel selection ignores every other bit.
        assert_eq!(SequenceCounters::channel(crate::core::FLAG_BUFFERING), 0);
        assert_eq!(
            SequenceCounters::channel(FLAG_REAL_TIME_1 | crate::core::FLAG_BUFFERING),
            1
        );
    }

    #[test]
    fn test_counters_independent_channels() {
        let mut counters = SequenceCounters::new();

        assert_eq!(counters.next(FLAG_NONE), 0);
        assert_eq!(counters.next(FLAG_NONE), 1);
        // The real-time channel is untouched by control traffic.
        assert_eq!(counters.peek(FLAG_REAL_TIME_1), 0);

        assert_eq!(counters.next(FLAG_REAL_TIME_1), 0);
        assert_eq!(counters.next(FLAG_REAL_TIME_1), 1);
        assert_eq!(counters.next(FLAG_REAL_TIME_1), 2);
        // And vice versa.
        assert_eq!(counters.peek(FLAG_NONE), 2);
    }

    #[test]
    fn test_counters_never_skip_or_repeat() {
        let mut counters = SequenceCounters::new();
        for expected in 0..100u32 {
            assert_eq!(counters.next(FLAG_REAL_TIME_1), expected);
        }
    }

    #[test]
    fn test_counters_wrap_at_u32_max() {
        let mut counters = SequenceCounters::new();
        for _ in 0..3 {
            counters.next(FLAG_NONE);
        }
        // Simulate reaching the top of the range.
        let mut near_max = SequenceCounters {
            counters: [u32::MAX, 0],
        };
        assert_eq!(near_max.next(FLAG_NONE), u32::MAX);
        assert_eq!(near_max.next(FLAG_NONE), 0);
    }
}
