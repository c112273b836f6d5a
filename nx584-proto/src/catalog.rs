//! Closed enumeration of NX-584 message-type codes, their fixed payload
//! lengths, and the decoders/encoders for the subset of messages the
//! controller actually exchanges with the panel.
//!
//! Bit assignments for the flag sets below are taken from the original
//! Python implementation's `model.py`, which is the authoritative source
//! for values spec.md leaves to "the source enumerations".

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ControllerError, ProtocolError};

/// Closed set of message-type codes understood by the panel interface.
/// Responses/indications occupy 0x01..0x1F, requests 0x21..0x3F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    InterfaceConfigRsp = 0x01,
    ZoneNameRsp = 0x03,
    ZoneStatusRsp = 0x04,
    ZonesSnapshotRsp = 0x05,
    PartitionStatusRsp = 0x06,
    PartitionSnapshotRsp = 0x07,
    SystemStatusRsp = 0x08,
    X10MessageInd = 0x09,
    LogEventInd = 0x0a,
    KeypadButtonInd = 0x0b,
    ProgramDataRsp = 0x10,
    UserInfoRsp = 0x12,
    Failed = 0x1c,
    Ack = 0x1d,
    Nack = 0x1e,
    Rejected = 0x1f,
    InterfaceConfigReq = 0x21,
    ZoneNameReq = 0x23,
    ZoneStatusReq = 0x24,
    ZonesSnapshotReq = 0x25,
    PartitionStatusReq = 0x26,
    PartitionSnapshotReq = 0x27,
    SystemStatusReq = 0x28,
    X10MessageReq = 0x29,
    LogEventReq = 0x2a,
    KeypadTextMsgReq = 0x2b,
    KeypadTerminalModeReq = 0x2c,
    ProgramDataReq = 0x30,
    ProgramDataCmd = 0x31,
    UserInfoReqPin = 0x32,
    UserInfoReqNoPin = 0x33,
    SetUserCodePin = 0x34,
    SetUserCodeNoPin = 0x35,
    SetUserAuthorityPin = 0x36,
    SetUserAuthorityNoPin = 0x37,
    SetClockCalendar = 0x3b,
    PrimaryKeypadFuncPin = 0x3c,
    PrimaryKeypadFuncNoPin = 0x3d,
    SecondaryKeypadFunc = 0x3e,
    ZoneBypassToggle = 0x3f,
}

impl MessageType {
    pub fn from_code(code: u8) -> Option<MessageType> {
        use MessageType::*;
        Some(match code {
            0x01 => InterfaceConfigRsp,
            0x03 => ZoneNameRsp,
            0x04 => ZoneStatusRsp,
            0x05 => ZonesSnapshotRsp,
            0x06 => PartitionStatusRsp,
            0x07 => PartitionSnapshotRsp,
            0x08 => SystemStatusRsp,
            0x09 => X10MessageInd,
            0x0a => LogEventInd,
            0x0b => KeypadButtonInd,
            0x10 => ProgramDataRsp,
            0x12 => UserInfoRsp,
            0x1c => Failed,
            0x1d => Ack,
            0x1e => Nack,
            0x1f => Rejected,
            0x21 => InterfaceConfigReq,
            0x23 => ZoneNameReq,
            0x24 => ZoneStatusReq,
            0x25 => ZonesSnapshotReq,
            0x26 => PartitionStatusReq,
            0x27 => PartitionSnapshotReq,
            0x28 => SystemStatusReq,
            0x29 => X10MessageReq,
            0x2a => LogEventReq,
            0x2b => KeypadTextMsgReq,
            0x2c => KeypadTerminalModeReq,
            0x30 => ProgramDataReq,
            0x31 => ProgramDataCmd,
            0x32 => UserInfoReqPin,
            0x33 => UserInfoReqNoPin,
            0x34 => SetUserCodePin,
            0x35 => SetUserCodeNoPin,
            0x36 => SetUserAuthorityPin,
            0x37 => SetUserAuthorityNoPin,
            0x3b => SetClockCalendar,
            0x3c => PrimaryKeypadFuncPin,
            0x3d => PrimaryKeypadFuncNoPin,
            0x3e => SecondaryKeypadFunc,
            0x3f => ZoneBypassToggle,
            _ => return None,
        })
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Total on-wire length (type byte + payload) per the catalog table in
    /// spec.md section 6.
    pub fn catalog_length(self) -> usize {
        use MessageType::*;
        match self {
            InterfaceConfigRsp => 11,
            ZoneNameRsp => 18,
            ZoneStatusRsp => 8,
            ZonesSnapshotRsp => 10,
            PartitionStatusRsp => 9,
            PartitionSnapshotRsp => 9,
            SystemStatusRsp => 12,
            X10MessageInd => 4,
            LogEventInd => 10,
            KeypadButtonInd => 3,
            ProgramDataRsp => 13,
            UserInfoRsp => 17,
            Failed | Ack | Nack | Rejected => 1,
            InterfaceConfigReq => 1,
            ZoneNameReq => 2,
            ZoneStatusReq => 2,
            ZonesSnapshotReq => 2,
            PartitionStatusReq => 2,
            PartitionSnapshotReq => 1,
            SystemStatusReq => 1,
            X10MessageReq => 4,
            LogEventReq => 2,
            KeypadTextMsgReq => 12,
            KeypadTerminalModeReq => 3,
            ProgramDataReq => 4,
            ProgramDataCmd => 13,
            UserInfoReqPin => 5,
            UserInfoReqNoPin => 2,
            SetUserCodePin => 8,
            SetUserCodeNoPin => 5,
            SetUserAuthorityPin => 7,
            SetUserAuthorityNoPin => 4,
            SetClockCalendar => 7,
            PrimaryKeypadFuncPin => 6,
            PrimaryKeypadFuncNoPin => 4,
            SecondaryKeypadFunc => 3,
            ZoneBypassToggle => 2,
        }
    }
}

/// Total on-wire length for a raw type code, or an error if the code isn't
/// in the closed catalog.
pub fn catalog_length(code: u8) -> Result<usize, ProtocolError> {
    MessageType::from_code(code)
        .map(MessageType::catalog_length)
        .ok_or(ProtocolError::UnknownType(code))
}

/// Validate that an inbound frame's total length agrees with its catalog
/// entry. `total_len` is type-byte-plus-payload, matching `catalog_length`.
pub fn validate_length(code: u8, total_len: usize) -> Result<MessageType, ProtocolError> {
    let msg_type = MessageType::from_code(code).ok_or(ProtocolError::UnknownType(code))?;
    let expected = msg_type.catalog_length();
    if expected != total_len {
        return Err(ProtocolError::LengthMismatch {
            msg_type: code,
            expected,
            actual: total_len,
        });
    }
    Ok(msg_type)
}

bitflags! {
    /// Transition/broadcast message enable mask, from the Interface
    /// Configuration response (16 bits, little-endian on the wire).
    pub struct TransitionFlags: u16 {
        const INTERFACE_CONFIG = 0x0002;
        const ZONE_STATUS = 0x0010;
        const ZONE_SNAPSHOT = 0x0020;
        const PARTITION_STATUS = 0x0040;
        const PARTITION_SNAPSHOT = 0x0080;
        const SYSTEM_STATUS = 0x0100;
        const X10_MESSAGE = 0x0200;
        const LOG_EVENT = 0x0400;
        const KEYPAD_BUTTON = 0x0800;
    }
}

bitflags! {
    /// Request-command enable mask, from the Interface Configuration
    /// response (32 bits, little-endian on the wire).
    pub struct RequestFlags: u32 {
        const INTERFACE_CONFIG = 0x0000_0002;
        const ZONE_NAME = 0x0000_0008;
        const ZONE_STATUS = 0x0000_0010;
        const ZONE_SNAPSHOT = 0x0000_0020;
        const PARTITION_STATUS = 0x0000_0040;
        const PARTITION_SNAPSHOT = 0x0000_0080;
        const SYSTEM_STATUS = 0x0000_0100;
        const X10_MESSAGE = 0x0000_0200;
        const LOG_EVENT = 0x0000_0400;
        const KEYPAD_TEXT_MESSAGE = 0x0000_0800;
        const KEYPAD_TERMINAL_MODE = 0x0000_1000;
        const PROGRAM_DATA = 0x0001_0000;
        const PROGRAM_DATA_COMMAND = 0x0002_0000;
        const USER_INFO_PIN = 0x0004_0000;
        const USER_INFO_NO_PIN = 0x0008_0000;
        const SET_USER_CODE_PIN = 0x0010_0000;
        const SET_USER_CODE_NO_PIN = 0x0020_0000;
        const SET_USER_AUTHORITY_PIN = 0x0040_0000;
        const SET_USER_AUTHORITY_NO_PIN = 0x0080_0000;
        const SET_CLOCK_CALENDAR = 0x0800_0000;
        const PRIMARY_KEYPAD_PIN = 0x1000_0000;
        const PRIMARY_KEYPAD_NO_PIN = 0x2000_0000;
        const SECONDARY_KEYPAD = 0x4000_0000;
        const ZONE_BYPASS_TOGGLE = 0x8000_0000;
    }
}

bitflags! {
    /// Zone type bitmap (24 bits, little-endian across 3 bytes on the wire).
    pub struct ZoneTypeFlags: u32 {
        const FIRE = 0x01;
        const HOUR24 = 0x02;
        const KEY_SWITCH = 0x04;
        const FOLLOWER = 0x08;
        const ENTRY_EXIT_DELAY1 = 0x10;
        const ENTRY_EXIT_DELAY2 = 0x20;
        const INTERIOR = 0x40;
        const LOCAL_ONLY = 0x80;
        const KEYPAD_SOUNDER = 0x100;
        const YELPING_SIREN = 0x200;
        const STEADY_SIREN = 0x400;
        const CHIME = 0x800;
        const BYPASSABLE = 0x1000;
        const GROUP_BYPASSABLE = 0x2000;
        const FORCE_ARMABLE = 0x4000;
        const ENTRY_GUARD = 0x8000;
        const FAST_LOOP_RESPONSE = 0x1_0000;
        const DOUBLE_EOL_TAMPER = 0x2_0000;
        const TROUBLE = 0x4_0000;
        const CROSS_ZONE = 0x8_0000;
        const DIALER_DELAY = 0x10_0000;
        const SWINGER_SHUTDOWN = 0x20_0000;
        const RESTORABLE = 0x40_0000;
        const LISTEN_IN = 0x80_0000;
    }
}

bitflags! {
    /// Zone condition bitmap (16 bits).
    pub struct ZoneConditionFlags: u16 {
        const FAULTED = 0x01;
        const TAMPERED = 0x02;
        const TROUBLE = 0x04;
        const BYPASSED = 0x08;
        const INHIBITED = 0x10;
        const LOW_BATTERY = 0x20;
        const SUPERVISION_LOST = 0x40;
        const ALARM_MEMORY = 0x100;
        const BYPASS_MEMORY = 0x200;
    }
}

bitflags! {
    /// Partition condition bitmap (48 bits, assembled from a 32-bit low
    /// field and a 16-bit high field shifted left by 32 — see
    /// `entity::decode_partition_status`).
    pub struct PartitionConditionFlags: u64 {
        const BYPASS_CODE_REQUIRED = 0x1;
        const FIRE_TROUBLE = 0x2;
        const FIRE = 0x4;
        const PULSING_BUZZER = 0x8;
        const TLM_FAULT_MEMORY = 0x10;
        const ARMED = 0x40;
        const INSTANT = 0x80;
        const PREVIOUS_ALARM = 0x100;
        const SIREN_ON = 0x200;
        const STEADY_SIREN_ON = 0x400;
        const ALARM_MEMORY = 0x800;
        const TAMPER = 0x1000;
        const CANCEL_ENTERED = 0x2000;
        const CODE_ENTERED = 0x4000;
        const CANCEL_PENDING = 0x8000;
        const SILENT_EXIT_ENABLED = 0x2_0000;
        const ENTRY_GUARD = 0x4_0000;
        const CHIME_MODE = 0x8_0000;
        const ENTRY = 0x10_0000;
        const DELAY_EXPIRATION_WARN = 0x20_0000;
        const EXIT1 = 0x40_0000;
        const EXIT2 = 0x80_0000;
        const LED_EXTINGUISH = 0x100_0000;
        const CROSS_TIMING = 0x200_0000;
        const RECENT_CLOSE_TIMED = 0x400_0000;
        const EXIT_ERROR_TRIGGERED = 0x1000_0000;
        const AUTO_HOME_INHIBITED = 0x2000_0000;
        const SENSOR_LOW_BATTERY = 0x4000_0000;
        const SENSOR_LOST_SUPERVISION = 0x8000_0000;
        const ZONE_BYPASSED = 0x1_0000_0000;
        const FORCE_ARM_TRIGGERED = 0x2_0000_0000;
        const READY_TO_ARM = 0x4_0000_0000;
        const READY_TO_FORCE_ARM = 0x8_0000_0000;
        const VALID_PIN_ACCEPTED = 0x10_0000_0000;
        const CHIME_ON = 0x20_0000_0000;
        const ERROR_BEEP = 0x40_0000_0000;
        const TONE_ON = 0x80_0000_0000;
        const ENTRY1 = 0x100_0000_0000;
        const OPEN_PERIOD = 0x200_0000_0000;
        const ALARM_SENT_PHONE1 = 0x400_0000_0000;
        const ALARM_SENT_PHONE2 = 0x800_0000_0000;
        const ALARM_SENT_PHONE3 = 0x1000_0000_0000;
        const CANCEL_IN_STACK = 0x2000_0000_0000;
        const KEYSWITCH_ARMED = 0x4000_0000_0000;
        const DELAY_TRIP_IN_PROGRESS = 0x8000_0000_0000;
    }
}

/// Primary Keypad Function codes (spec.md section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrimaryKeypadFunction {
    TurnOffAlarm = 0,
    Disarm = 1,
    ArmAway = 2,
    ArmStay = 3,
    Cancel = 4,
    InitiateAutoArm = 5,
    StartWalkTest = 6,
    StopWalkTest = 7,
}

/// Decoded Interface Configuration response payload.
#[derive(Debug, Clone)]
pub struct InterfaceConfig {
    pub firmware_version: [u8; 4],
    pub transition_flags: TransitionFlags,
    pub request_flags: RequestFlags,
}

pub fn decode_interface_config(payload: &[u8]) -> Result<InterfaceConfig, ProtocolError> {
    expect_len(MessageType::InterfaceConfigRsp, payload, 10)?;
    let mut firmware_version = [0u8; 4];
    firmware_version.copy_from_slice(&payload[0..4]);
    Ok(InterfaceConfig {
        firmware_version,
        transition_flags: TransitionFlags::from_bits_truncate(LittleEndian::read_u16(&payload[4..6])),
        request_flags: RequestFlags::from_bits_truncate(LittleEndian::read_u32(&payload[6..10])),
    })
}

/// Decoded Zone Name response payload.
#[derive(Debug, Clone)]
pub struct ZoneName {
    /// 0-based panel zone index.
    pub panel_zone: u8,
    pub name: String,
}

pub fn decode_zone_name(payload: &[u8]) -> Result<ZoneName, ProtocolError> {
    expect_len(MessageType::ZoneNameRsp, payload, 17)?;
    let name_bytes = &payload[1..17];
    let trimmed_len = name_bytes
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let name = String::from_utf8_lossy(&name_bytes[..trimmed_len]).into_owned();
    Ok(ZoneName {
        panel_zone: payload[0],
        name,
    })
}

/// Encode a Zone Name request for the given 0-based panel zone index.
pub fn encode_zone_name_request(panel_zone: u8) -> Vec<u8> {
    vec![panel_zone]
}

/// Decoded Zone Status response payload.
#[derive(Debug, Clone)]
pub struct ZoneStatus {
    /// 0-based panel zone index.
    pub panel_zone: u8,
    pub partition_mask: u8,
    pub type_flags: ZoneTypeFlags,
    pub condition_flags: ZoneConditionFlags,
}

pub fn decode_zone_status(payload: &[u8]) -> Result<ZoneStatus, ProtocolError> {
    expect_len(MessageType::ZoneStatusRsp, payload, 7)?;
    let type_bits = u32::from(payload[2]) | (u32::from(payload[3]) << 8) | (u32::from(payload[4]) << 16);
    Ok(ZoneStatus {
        panel_zone: payload[0],
        partition_mask: payload[1],
        type_flags: ZoneTypeFlags::from_bits_truncate(type_bits),
        condition_flags: ZoneConditionFlags::from_bits_truncate(LittleEndian::read_u16(&payload[5..7])),
    })
}

/// Encode a Zone Status request for the given 0-based panel zone index.
pub fn encode_zone_status_request(panel_zone: u8) -> Vec<u8> {
    vec![panel_zone]
}

/// Decoded Partition Status response payload.
#[derive(Debug, Clone)]
pub struct PartitionStatus {
    /// 0-based panel partition index.
    pub panel_partition: u8,
    pub condition_flags: PartitionConditionFlags,
}

pub fn decode_partition_status(payload: &[u8]) -> Result<PartitionStatus, ProtocolError> {
    expect_len(MessageType::PartitionStatusRsp, payload, 8)?;
    let low = LittleEndian::read_u32(&payload[1..5]);
    // payload[5] is skipped per spec.md 4.3.
    let high = LittleEndian::read_u16(&payload[6..8]);
    let bits = u64::from(low) | (u64::from(high) << 32);
    Ok(PartitionStatus {
        panel_partition: payload[0],
        condition_flags: PartitionConditionFlags::from_bits_truncate(bits),
    })
}

/// Encode a Partition Status request for the given 0-based panel partition
/// index.
pub fn encode_partition_status_request(panel_partition: u8) -> Vec<u8> {
    vec![panel_partition]
}

/// Decoded System Status response payload. Only the fields the controller
/// needs (panel id, partition mask) are broken out; the remaining
/// diagnostic bytes are carried through unexamined, matching the
/// non-goal of not interpreting panel diagnostics beyond acknowledging.
#[derive(Debug, Clone)]
pub struct SystemStatus {
    pub panel_id: u8,
    pub partition_mask: u8,
    pub raw: [u8; 9],
}

pub fn decode_system_status(payload: &[u8]) -> Result<SystemStatus, ProtocolError> {
    expect_len(MessageType::SystemStatusRsp, payload, 11)?;
    let mut raw = [0u8; 9];
    raw.copy_from_slice(&payload[2..11]);
    Ok(SystemStatus {
        panel_id: payload[0],
        partition_mask: payload[1],
        raw,
    })
}

/// Zones Snapshot and Partition Snapshot payloads are treated as advisory
/// per the spec's open question (a): bit extraction is unspecified, so the
/// decoder validates length and hands back the raw bytes as a
/// "something changed, re-request status" signal.
#[derive(Debug, Clone)]
pub struct ZonesSnapshot {
    pub raw: [u8; 9],
}

pub fn decode_zones_snapshot(payload: &[u8]) -> Result<ZonesSnapshot, ProtocolError> {
    expect_len(MessageType::ZonesSnapshotRsp, payload, 9)?;
    let mut raw = [0u8; 9];
    raw.copy_from_slice(payload);
    Ok(ZonesSnapshot { raw })
}

#[derive(Debug, Clone)]
pub struct PartitionSnapshot {
    pub raw: [u8; 8],
}

pub fn decode_partition_snapshot(payload: &[u8]) -> Result<PartitionSnapshot, ProtocolError> {
    expect_len(MessageType::PartitionSnapshotRsp, payload, 8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(payload);
    Ok(PartitionSnapshot { raw })
}

/// Encode the Set Clock/Calendar request payload. `weekday` is
/// standard-Monday-is-0 (`chrono::Weekday::num_days_from_monday`) and is
/// remapped to the panel's Monday=2..Sunday=1 numbering.
pub fn encode_set_clock(year_2000: u8, month: u8, day: u8, hour: u8, minute: u8, weekday_mon0: u8) -> Vec<u8> {
    const PANEL_WEEKDAY: [u8; 7] = [2, 3, 4, 5, 6, 7, 1];
    vec![
        year_2000,
        month,
        day,
        hour,
        minute,
        PANEL_WEEKDAY[weekday_mon0 as usize % 7],
    ]
}

/// BCD-pack a 4 or 6 decimal digit PIN into 3 bytes, e.g. `"1234"` ->
/// `[0x12, 0x34, 0x00]`, `"123456"` -> `[0x12, 0x34, 0x56]`.
pub fn encode_pin(pin: &str) -> Result<[u8; 3], ControllerError> {
    if pin.len() != 4 && pin.len() != 6 {
        return Err(ControllerError::InvalidPinLength(pin.len()));
    }
    if !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ControllerError::InvalidPinDigit(pin.to_string()));
    }

    let mut digits: Vec<u8> = pin.bytes().map(|b| b - b'0').collect();
    digits.resize(6, 0);

    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = (digits[i * 2] << 4) | digits[i * 2 + 1];
    }
    Ok(out)
}

/// Encode a Primary Keypad Function request without PIN: {function,
/// partition-bitmap, user-number}.
pub fn encode_primary_keypad_no_pin(
    function: PrimaryKeypadFunction,
    partition_bitmap: u8,
    user_number: u8,
) -> Vec<u8> {
    vec![function as u8, partition_bitmap, user_number]
}

/// Encode a Primary Keypad Function request with PIN: {PIN(3 BCD bytes),
/// function, partition-bitmap}.
pub fn encode_primary_keypad_pin(function: PrimaryKeypadFunction, partition_bitmap: u8, pin: [u8; 3]) -> Vec<u8> {
    vec![pin[0], pin[1], pin[2], function as u8, partition_bitmap]
}

fn expect_len(msg_type: MessageType, payload: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if payload.len() != expected {
        return Err(ProtocolError::LengthMismatch {
            msg_type: msg_type.code(),
            expected: expected + 1,
            actual: payload.len() + 1,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_encoding_scenarios() {
        assert_eq!(encode_pin("1234").unwrap(), [0x12, 0x34, 0x00]);
        assert_eq!(encode_pin("123456").unwrap(), [0x12, 0x34, 0x56]);
        assert!(matches!(encode_pin("12345"), Err(ControllerError::InvalidPinLength(5))));
        assert!(encode_pin("12a4").is_err());
    }

    #[test]
    fn catalog_lengths_match_spec_table() {
        assert_eq!(MessageType::InterfaceConfigRsp.catalog_length(), 11);
        assert_eq!(MessageType::ZoneNameRsp.catalog_length(), 18);
        assert_eq!(MessageType::ZoneStatusRsp.catalog_length(), 8);
        assert_eq!(MessageType::PartitionStatusRsp.catalog_length(), 9);
        assert_eq!(MessageType::SystemStatusRsp.catalog_length(), 12);
        assert_eq!(MessageType::Ack.catalog_length(), 1);
        assert_eq!(MessageType::SetClockCalendar.catalog_length(), 7);
        assert_eq!(MessageType::PrimaryKeypadFuncPin.catalog_length(), 6);
        assert_eq!(MessageType::PrimaryKeypadFuncNoPin.catalog_length(), 4);
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(MessageType::from_code(0x02).is_none());
        assert!(matches!(catalog_length(0x02), Err(ProtocolError::UnknownType(0x02))));
    }

    #[test]
    fn zone_name_trims_trailing_padding() {
        let mut payload = vec![4u8];
        payload.extend_from_slice(b"Front Door      ");
        let zn = decode_zone_name(&payload).unwrap();
        assert_eq!(zn.panel_zone, 4);
        assert_eq!(zn.name, "Front Door");
    }

    #[test]
    fn zone_status_decodes_little_endian_bitmaps() {
        // type flags = FIRE | INTERIOR (0x01 | 0x40 = 0x41), condition = FAULTED | TAMPERED (0x03).
        let payload = [2u8, 0b0000_0001, 0x41, 0x00, 0x00, 0x03, 0x00];
        let zs = decode_zone_status(&payload).unwrap();
        assert_eq!(zs.panel_zone, 2);
        assert_eq!(zs.partition_mask, 0b0000_0001);
        assert!(zs.type_flags.contains(ZoneTypeFlags::FIRE));
        assert!(zs.type_flags.contains(ZoneTypeFlags::INTERIOR));
        assert!(zs.condition_flags.contains(ZoneConditionFlags::FAULTED));
        assert!(zs.condition_flags.contains(ZoneConditionFlags::TAMPERED));
    }

    #[test]
    fn partition_status_assembles_48_bit_bitmap_from_low_and_high() {
        // low = ARMED (0x40), high = READY_TO_ARM's high word (0x4 at bit 34 -> high u16 bit 2 = 0x4).
        let payload = [0u8, 0x40, 0x00, 0x00, 0x00, 0xff, 0x04, 0x00];
        let ps = decode_partition_status(&payload).unwrap();
        assert!(ps.condition_flags.contains(PartitionConditionFlags::ARMED));
        assert!(ps.condition_flags.contains(PartitionConditionFlags::READY_TO_ARM));
    }

    #[test]
    fn set_clock_remaps_weekday() {
        // Monday (mon0=0) -> panel value 2; Sunday (mon0=6) -> panel value 1.
        assert_eq!(encode_set_clock(26, 7, 28, 10, 30, 0)[5], 2);
        assert_eq!(encode_set_clock(26, 7, 28, 10, 30, 6)[5], 1);
    }

    #[test]
    fn primary_keypad_payload_shapes() {
        let no_pin = encode_primary_keypad_no_pin(PrimaryKeypadFunction::Disarm, 1 << 0, 5);
        assert_eq!(no_pin, vec![1, 1, 5]);

        let with_pin = encode_primary_keypad_pin(PrimaryKeypadFunction::ArmAway, 1 << 1, [0x12, 0x34, 0x00]);
        assert_eq!(with_pin, vec![0x12, 0x34, 0x00, 2, 0b10]);
    }
}
