//! Fixed-layout payload records carried inside Rewind packets.
//!
//! All records are little-endian with no padding. Records with trailing
//! variable-length fields validate the declared length against the real
//! buffer before slicing; they never over-read. Records are transient
//! values passed through transmit/receive, never owned by the session.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::core::{
    CALL_LENGTH, ClientError, ClientResult, REDIRECTION_FAMILY_INET, REDIRECTION_FAMILY_INET6,
    REDIRECTION_FAMILY_UNSPEC,
};

/// Text message option bit marking a talk-group destination.
pub const TEXT_MESSAGE_GROUP_DESTINATION: u16 = 128;

/// Keep-alive payload identifying the client: remote ID, service role, and
/// a free-text software description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Remote (client) ID.
    pub number: u32,
    /// Service role byte (`SERVICE_*`).
    pub service: u8,
    /// Software name, version, and host information.
    pub description: String,
}

impl ServiceDescriptor {
    /// Fixed prefix before the description text.
    pub const FIXED_SIZE: usize = 5;

    /// Serialize: number, service byte, then the raw description bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::FIXED_SIZE + self.description.len());
        buf.extend_from_slice(&self.number.to_le_bytes());
        buf.push(self.service);
        buf.extend_from_slice(self.description.as_bytes());
        buf
    }

    /// Parse from a payload slice; the description runs to the end.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::FIXED_SIZE {
            return Err(ClientError::WrongData("short service descriptor"));
        }
        Ok(Self {
            number: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            service: bytes[4],
            description: String::from_utf8_lossy(&bytes[Self::FIXED_SIZE..]).into_owned(),
        })
    }
}

/// Session option request (`TYPE_CONFIGURATION` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationData {
    /// Requested option bits (`OPTION_*`).
    pub options: u32,
}

impl ConfigurationData {
    /// Wire size.
    pub const SIZE: usize = 4;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.options.to_le_bytes()
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short configuration record"));
        }
        Ok(Self {
            options: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }
}

/// Talk group subscription (`TYPE_SUBSCRIPTION` / `TYPE_CANCELLING`
/// payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionData {
    /// Session type (`SESSION_TYPE_*`).
    pub session_type: u32,
    /// Destination ID.
    pub number: u32,
}

impl SubscriptionData {
    /// Wire size.
    pub const SIZE: usize = 8;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[..4].copy_from_slice(&self.session_type.to_le_bytes());
        buf[4..].copy_from_slice(&self.number.to_le_bytes());
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short subscription record"));
        }
        Ok(Self {
            session_type: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            number: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Session activity poll (`TYPE_SESSION_POLL` payload).
///
/// Sent as a request describing the target session; echoed back by the
/// server with `state` filled in. A zero state means no matching session
/// is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPollData {
    /// Session type (`SESSION_TYPE_*`).
    pub session_type: u32,
    /// Session flag filter.
    pub flag: u32,
    /// Destination ID.
    pub number: u32,
    /// Activity state reported by the server; 0 means inactive.
    pub state: u32,
}

impl SessionPollData {
    /// Wire size.
    pub const SIZE: usize = 16;

    /// Whether the server reported the target session inactive.
    pub fn is_inactive(&self) -> bool {
        self.state == 0
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[..4].copy_from_slice(&self.session_type.to_le_bytes());
        buf[4..8].copy_from_slice(&self.flag.to_le_bytes());
        buf[8..12].copy_from_slice(&self.number.to_le_bytes());
        buf[12..].copy_from_slice(&self.state.to_le_bytes());
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short session poll record"));
        }
        Ok(Self {
            session_type: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            flag: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            number: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            state: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

/// Call identification header (`TYPE_SUPER_HEADER` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperHeader {
    /// Session type (`SESSION_TYPE_*`).
    pub session_type: u32,
    /// Source ID, or 0.
    pub source_id: u32,
    /// Destination ID, or 0.
    pub destination_id: u32,
    /// Source call sign, zero-padded.
    pub source_call: [u8; CALL_LENGTH],
    /// Destination call sign, zero-padded.
    pub destination_call: [u8; CALL_LENGTH],
}

/// Build a zero-padded call sign field, truncating over-long input.
pub fn call_field(call: &str) -> [u8; CALL_LENGTH] {
    let mut field = [0u8; CALL_LENGTH];
    let bytes = call.as_bytes();
    let len = bytes.len().min(CALL_LENGTH);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

impl SuperHeader {
    /// Wire size.
    pub const SIZE: usize = 12 + 2 * CALL_LENGTH;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[..4].copy_from_slice(&self.session_type.to_le_bytes());
        buf[4..8].copy_from_slice(&self.source_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.destination_id.to_le_bytes());
        buf[12..12 + CALL_LENGTH].copy_from_slice(&self.source_call);
        buf[12 + CALL_LENGTH..].copy_from_slice(&self.destination_call);
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short super header"));
        }
        let mut source_call = [0u8; CALL_LENGTH];
        source_call.copy_from_slice(&bytes[12..12 + CALL_LENGTH]);
        let mut destination_call = [0u8; CALL_LENGTH];
        destination_call.copy_from_slice(&bytes[12 + CALL_LENGTH..Self::SIZE]);

        Ok(Self {
            session_type: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            source_id: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            destination_id: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            source_call,
            destination_call,
        })
    }
}

/// Server redirection target (`TYPE_REDIRECTION` payload).
///
/// The address field occupies 16 bytes on the wire regardless of family;
/// an IPv4 target uses only the first 4 of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectionData {
    /// No target; the redirection is a no-op.
    Unspecified,
    /// Redirect to an IPv4 address and UDP port.
    V4(Ipv4Addr, u16),
    /// Redirect to an IPv6 address and UDP port.
    V6(Ipv6Addr, u16),
}

impl RedirectionData {
    /// Wire size: family, port, and the 16-byte address field.
    pub const SIZE: usize = 20;

    /// The redirection target as a socket address, if one is specified.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match *self {
            RedirectionData::Unspecified => None,
            RedirectionData::V4(ip, port) => Some(SocketAddr::new(IpAddr::V4(ip), port)),
            RedirectionData::V6(ip, port) => Some(SocketAddr::new(IpAddr::V6(ip), port)),
        }
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        match *self {
            RedirectionData::Unspecified => {
                buf[..2].copy_from_slice(&REDIRECTION_FAMILY_UNSPEC.to_le_bytes());
            }
            RedirectionData::V4(ip, port) => {
                buf[..2].copy_from_slice(&REDIRECTION_FAMILY_INET.to_le_bytes());
                buf[2..4].copy_from_slice(&port.to_le_bytes());
                buf[4..8].copy_from_slice(&ip.octets());
            }
            RedirectionData::V6(ip, port) => {
                buf[..2].copy_from_slice(&REDIRECTION_FAMILY_INET6.to_le_bytes());
                buf[2..4].copy_from_slice(&port.to_le_bytes());
                buf[4..20].copy_from_slice(&ip.octets());
            }
        }
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < 4 {
            return Err(ClientError::WrongData("short redirection record"));
        }
        let family = u16::from_le_bytes([bytes[0], bytes[1]]);
        let port = u16::from_le_bytes([bytes[2], bytes[3]]);

        match family {
            REDIRECTION_FAMILY_UNSPEC => Ok(RedirectionData::Unspecified),
            REDIRECTION_FAMILY_INET => {
                if bytes.len() < 8 {
                    return Err(ClientError::WrongData("short redirection v4 address"));
                }
                let octets: [u8; 4] = [bytes[4], bytes[5], bytes[6], bytes[7]];
                Ok(RedirectionData::V4(Ipv4Addr::from(octets), port))
            }
            REDIRECTION_FAMILY_INET6 => {
                if bytes.len() < Self::SIZE {
                    return Err(ClientError::WrongData("short redirection v6 address"));
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&bytes[4..20]);
                Ok(RedirectionData::V6(Ipv6Addr::from(octets), port))
            }
            _ => Err(ClientError::WrongData("unknown redirection family")),
        }
    }
}

/// Server address notice payload (`TYPE_ADDRESS_NOTICE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressData {
    /// IPv4 address as seen by the server.
    pub address: Ipv4Addr,
    /// UDP port as seen by the server.
    pub port: u16,
}

impl AddressData {
    /// Wire size.
    pub const SIZE: usize = 6;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[..4].copy_from_slice(&self.address.octets());
        buf[4..].copy_from_slice(&self.port.to_le_bytes());
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short address notice"));
        }
        Ok(Self {
            address: Ipv4Addr::from([bytes[0], bytes[1], bytes[2], bytes[3]]),
            port: u16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }
}

/// Server port binding notice payload (`TYPE_BINDING_NOTICE`): a bare list
/// of UDP ports sized by the packet header's length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingData {
    /// Bound UDP ports.
    pub ports: Vec<u16>,
}

impl BindingData {
    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.ports.len() * 2);
        for port in &self.ports {
            buf.extend_from_slice(&port.to_le_bytes());
        }
        buf
    }

    /// Parse from a payload slice; a trailing odd byte is malformed.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() % 2 != 0 {
            return Err(ClientError::WrongData("odd binding notice length"));
        }
        let ports = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { ports })
    }
}

/// Text message payload (`TYPE_MESSAGE_TEXT`), Open DMR Terminal class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessageData {
    /// Source ID.
    pub source_id: u32,
    /// Destination ID.
    pub destination_id: u32,
    /// [`TEXT_MESSAGE_GROUP_DESTINATION`] for group messages, 0 for
    /// private ones.
    pub option: u16,
    /// Message text; UTF-16LE on the wire, trailing, sized by the record's
    /// own length field.
    pub text: String,
}

impl TextMessageData {
    /// Fixed prefix before the message text: reserved, source,
    /// destination, option, length.
    pub const FIXED_SIZE: usize = 16;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let text: Vec<u8> = self
            .text
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();

        let mut buf = Vec::with_capacity(Self::FIXED_SIZE + text.len());
        buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
        buf.extend_from_slice(&self.source_id.to_le_bytes());
        buf.extend_from_slice(&self.destination_id.to_le_bytes());
        buf.extend_from_slice(&self.option.to_le_bytes());
        buf.extend_from_slice(&(text.len() as u16).to_le_bytes());
        buf.extend_from_slice(&text);
        buf
    }

    /// Parse from a payload slice, validating the declared text length.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::FIXED_SIZE {
            return Err(ClientError::WrongData("short text message record"));
        }
        let length = u16::from_le_bytes([bytes[14], bytes[15]]) as usize;
        if length % 2 != 0 {
            return Err(ClientError::WrongData("odd text message length"));
        }
        if bytes.len() < Self::FIXED_SIZE + length {
            return Err(ClientError::WrongData("truncated text message"));
        }

        let units: Vec<u16> = bytes[Self::FIXED_SIZE..Self::FIXED_SIZE + length]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16(&units)
            .map_err(|_| ClientError::WrongData("invalid utf-16 text message"))?;

        Ok(Self {
            source_id: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            destination_id: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            option: u16::from_le_bytes([bytes[12], bytes[13]]),
            text,
        })
    }
}

/// Text message delivery status (`TYPE_MESSAGE_STATUS` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMessageStatus {
    /// Source ID.
    pub source_id: u32,
    /// Destination ID.
    pub destination_id: u32,
    /// Status byte from the DMR data call response header.
    pub status: u8,
}

impl TextMessageStatus {
    /// Wire size.
    pub const SIZE: usize = 13;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[4..8].copy_from_slice(&self.source_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.destination_id.to_le_bytes());
        buf[12] = self.status;
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short message status record"));
        }
        Ok(Self {
            source_id: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            destination_id: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            status: bytes[12],
        })
    }
}

/// Location report request kinds (`TYPE_LOCATION_REQUEST` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LocationRequestKind {
    /// Single immediate report.
    Shot = 0,
    /// Start timed reporting.
    TimedStart = 1,
    /// Stop timed reporting.
    TimedStop = 2,
}

/// Location report request (`TYPE_LOCATION_REQUEST` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Kind of request.
    pub kind: LocationRequestKind,
    /// Interval of timed reports in seconds.
    pub interval: u32,
}

impl LocationRequest {
    /// Wire size.
    pub const SIZE: usize = 12;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[4..8].copy_from_slice(&(self.kind as u32).to_le_bytes());
        buf[8..].copy_from_slice(&self.interval.to_le_bytes());
        buf
    }

    /// Parse from a payload slice.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ClientError::WrongData("short location request"));
        }
        let kind = match u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) {
            0 => LocationRequestKind::Shot,
            1 => LocationRequestKind::TimedStart,
            2 => LocationRequestKind::TimedStop,
            _ => return Err(ClientError::WrongData("unknown location request kind")),
        };
        Ok(Self {
            kind,
            interval: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// Location report (`TYPE_LOCATION_REPORT` payload): NMEA position data,
/// trailing, sized by the record's own length field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReport {
    /// Position format; 0 is NMEA, the only defined value.
    pub format: u32,
    /// NMEA sentence bytes.
    pub data: Vec<u8>,
}

impl LocationReport {
    /// Fixed prefix before the position data: reserved, format, length.
    pub const FIXED_SIZE: usize = 10;

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::FIXED_SIZE + self.data.len());
        buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
        buf.extend_from_slice(&self.format.to_le_bytes());
        buf.extend_from_slice(&(self.data.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Parse from a payload slice, validating the declared data length.
    pub fn from_bytes(bytes: &[u8]) -> ClientResult<Self> {
        if bytes.len() < Self::FIXED_SIZE {
            return Err(ClientError::WrongData("short location report"));
        }
        let length = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        if bytes.len() < Self::FIXED_SIZE + length {
            return Err(ClientError::WrongData("truncated location report"));
        }
        Ok(Self {
            format: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            data: bytes[Self::FIXED_SIZE..Self::FIXED_SIZE + length].to_vec(),
        })
    }
}
