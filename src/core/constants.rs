//! Rewind protocol constants.
//!
//! These values are the wire contract of the Rewind protocol and MUST NOT
//! be changed: DMR master servers validate every one of them.

use std::time::Duration;

// =============================================================================
// TRANSPORT HEADER
// =============================================================================

/// Length of the fixed ASCII signature that opens every packet.
pub const SIGN_LENGTH: usize = 8;

/// The protocol signature, literal `"REWIND01"`.
pub const PROTOCOL_SIGN: &[u8; SIGN_LENGTH] = b"REWIND01";

/// Packet header size: signature + type + flags + sequence + length.
pub const HEADER_SIZE: usize = SIGN_LENGTH + 2 + 2 + 4 + 2;

/// Receive buffer capacity; bounds every datagram the engine accepts.
pub const RECV_BUFFER_SIZE: usize = 2048;

// =============================================================================
// PACKET TYPE CLASSES
// =============================================================================

/// Rewind control class base.
pub const CLASS_REWIND_CONTROL: u16 = 0x0000;

/// System console class base.
pub const CLASS_SYSTEM_CONSOLE: u16 = 0x0100;

/// Server notice class base.
pub const CLASS_SERVER_NOTICE: u16 = 0x0200;

/// Device data class base.
pub const CLASS_DEVICE_DATA: u16 = 0x0800;

/// Kairos device data sub-class.
pub const CLASS_KAIROS_DATA: u16 = CLASS_DEVICE_DATA;

/// Hytera device data sub-class.
pub const CLASS_HYTERA_DATA: u16 = CLASS_DEVICE_DATA + 0x10;

/// Simple application class base.
pub const CLASS_APPLICATION: u16 = 0x0900;

/// Open DMR terminal class base.
pub const CLASS_TERMINAL: u16 = 0x0a00;

// =============================================================================
// PACKET TYPES - CONTROL
// =============================================================================

/// Keep-alive carrying the client's service descriptor.
pub const TYPE_KEEP_ALIVE: u16 = CLASS_REWIND_CONTROL;

/// Graceful session close.
pub const TYPE_CLOSE: u16 = CLASS_REWIND_CONTROL + 1;

/// Server-issued authentication challenge.
pub const TYPE_CHALLENGE: u16 = CLASS_REWIND_CONTROL + 2;

/// Client's SHA-256 digest answering a challenge.
pub const TYPE_AUTHENTICATION: u16 = CLASS_REWIND_CONTROL + 3;

/// Server redirection to another address.
pub const TYPE_REDIRECTION: u16 = CLASS_REWIND_CONTROL + 8;

// =============================================================================
// PACKET TYPES - CONSOLE AND NOTICES
// =============================================================================

/// System console report.
pub const TYPE_REPORT: u16 = CLASS_SYSTEM_CONSOLE;

/// Server busy notice.
pub const TYPE_BUSY_NOTICE: u16 = CLASS_SERVER_NOTICE;

/// Server address notice.
pub const TYPE_ADDRESS_NOTICE: u16 = CLASS_SERVER_NOTICE + 1;

/// Server port binding notice.
pub const TYPE_BINDING_NOTICE: u16 = CLASS_SERVER_NOTICE + 2;

// =============================================================================
// PACKET TYPES - DEVICE DATA
// =============================================================================

/// Kairos external server data.
pub const TYPE_EXTERNAL_SERVER: u16 = CLASS_KAIROS_DATA;

/// Kairos remote control data.
pub const TYPE_REMOTE_CONTROL: u16 = CLASS_KAIROS_DATA + 1;

/// Kairos SNMP trap data.
pub const TYPE_SNMP_TRAP: u16 = CLASS_KAIROS_DATA + 2;

/// Hytera peer data.
pub const TYPE_PEER_DATA: u16 = CLASS_HYTERA_DATA;

/// Hytera RDAC data.
pub const TYPE_RDAC_DATA: u16 = CLASS_HYTERA_DATA + 1;

/// Hytera media data.
pub const TYPE_MEDIA_DATA: u16 = CLASS_HYTERA_DATA + 2;

// =============================================================================
// PACKET TYPES - SIMPLE APPLICATION
// =============================================================================

/// Session option configuration.
pub const TYPE_CONFIGURATION: u16 = CLASS_APPLICATION;

/// Talk group subscription.
pub const TYPE_SUBSCRIPTION: u16 = CLASS_APPLICATION + 0x01;

/// Subscription cancellation.
pub const TYPE_CANCELLING: u16 = CLASS_APPLICATION + 0x02;

/// Session activity poll.
pub const TYPE_SESSION_POLL: u16 = CLASS_APPLICATION + 0x03;

/// Base code for DMR data frames.
pub const TYPE_DMR_DATA_BASE: u16 = CLASS_APPLICATION + 0x10;

/// DMR audio frame.
pub const TYPE_DMR_AUDIO_FRAME: u16 = CLASS_APPLICATION + 0x20;

/// DMR embedded data.
pub const TYPE_DMR_EMBEDDED_DATA: u16 = CLASS_APPLICATION + 0x27;

/// Call super header (source/destination identification).
pub const TYPE_SUPER_HEADER: u16 = CLASS_APPLICATION + 0x28;

/// Server failure code.
pub const TYPE_FAILURE_CODE: u16 = CLASS_APPLICATION + 0x29;

// =============================================================================
// PACKET TYPES - OPEN DMR TERMINAL
// =============================================================================

/// Terminal idle.
pub const TYPE_TERMINAL_IDLE: u16 = CLASS_TERMINAL;

/// Terminal attach.
pub const TYPE_TERMINAL_ATTACH: u16 = CLASS_TERMINAL + 0x02;

/// Terminal detach.
pub const TYPE_TERMINAL_DETACH: u16 = CLASS_TERMINAL + 0x03;

/// Text message.
pub const TYPE_MESSAGE_TEXT: u16 = CLASS_TERMINAL + 0x10;

/// Text message delivery status.
pub const TYPE_MESSAGE_STATUS: u16 = CLASS_TERMINAL + 0x11;

/// Location report (NMEA).
pub const TYPE_LOCATION_REPORT: u16 = CLASS_TERMINAL + 0x20;

/// Location report request.
pub const TYPE_LOCATION_REQUEST: u16 = CLASS_TERMINAL + 0x21;

// =============================================================================
// FLAGS
// =============================================================================

/// No flags set.
pub const FLAG_NONE: u16 = 0;

/// Real-time channel A; also selects the sequence counter.
pub const FLAG_REAL_TIME_1: u16 = 1 << 0;

/// Real-time channel B.
pub const FLAG_REAL_TIME_2: u16 = 1 << 1;

/// Buffering hint.
pub const FLAG_BUFFERING: u16 = 1 << 2;

/// Default flag set for plain control traffic.
pub const FLAG_DEFAULT_SET: u16 = FLAG_NONE;

// =============================================================================
// SERVICE ROLES
// =============================================================================

/// Repeater agent role base.
pub const ROLE_REPEATER_AGENT: u8 = 0x10;

/// Application role base.
pub const ROLE_APPLICATION: u8 = 0x20;

/// Cronos repeater agent.
pub const SERVICE_CRONOS_AGENT: u8 = ROLE_REPEATER_AGENT;

/// Tellus repeater agent.
pub const SERVICE_TELLUS_AGENT: u8 = ROLE_REPEATER_AGENT + 1;

/// Simple application client (the role this engine registers as).
pub const SERVICE_SIMPLE_APPLICATION: u8 = ROLE_APPLICATION;

/// Open DMR terminal client.
pub const SERVICE_OPEN_TERMINAL: u8 = ROLE_APPLICATION + 1;

// =============================================================================
// SESSION OPTIONS
// =============================================================================

/// Request super headers ahead of audio streams.
pub const OPTION_SUPER_HEADER: u32 = 1 << 0;

/// Request linear audio frames instead of vocoder frames.
pub const OPTION_LINEAR_FRAME: u32 = 1 << 1;

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Private voice call session.
pub const SESSION_TYPE_PRIVATE_VOICE: u32 = 5;

/// Group voice call session.
pub const SESSION_TYPE_GROUP_VOICE: u32 = 7;

/// Length of a DMR call sign field.
pub const CALL_LENGTH: usize = 10;

// =============================================================================
// REDIRECTION ADDRESS FAMILIES
// =============================================================================

/// Redirection family: unspecified.
pub const REDIRECTION_FAMILY_UNSPEC: u16 = 0;

/// Redirection family: IPv4.
pub const REDIRECTION_FAMILY_INET: u16 = 2;

/// Redirection family: IPv6.
pub const REDIRECTION_FAMILY_INET6: u16 = 10;

// =============================================================================
// TIMING
// =============================================================================

/// Per-attempt receive timeout; also the poll waiter's throttle pause and
/// the floor for the poll waiter's maximum wait.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall deadline for the authentication handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Authentication attempts before giving up on the password.
pub const AUTH_ATTEMPT_LIMIT: usize = 3;

/// Interval at which a connected client is expected to send keep-alives.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(5);
