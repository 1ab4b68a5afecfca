//! Wire format of the slider.
//!
//! Outgoing frames are `address ++ instruction ++ payload` in ASCII, without
//! terminator. Incoming frames are `address(1) ++ tag(2) ++ data`, and reach
//! [`decode`] with the CR LF end marker already stripped.

use std::fmt;

/// Width of a numeric payload: 32 bits rendered as 8 hex digits.
const PAYLOAD_DIGITS: usize = 8;

/// Shortest frame that still carries an address and a tag.
const MIN_FRAME_LEN: usize = 3;

/// Single character device address on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address(char);

impl Address {
    /// Addresses are one hex digit, `0` to `F`.
    pub fn new(address: char) -> Option<Self> {
        address
            .is_ascii_hexdigit()
            .then(|| Self(address.to_ascii_uppercase()))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for Address {
    fn default() -> Self {
        Self('0')
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MoveHome,
    MoveForward,
    MoveBackward,
    MoveAbsolute,
    GetStatus,
}

impl Instruction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::MoveHome => "ho",
            Instruction::MoveForward => "fw",
            Instruction::MoveBackward => "bw",
            Instruction::MoveAbsolute => "ma",
            Instruction::GetStatus => "gs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// Motor step count, sent as 8 uppercase hex digits.
    Steps(u32),
}

impl Payload {
    fn render(self) -> String {
        match self {
            Payload::Empty => String::new(),
            Payload::Steps(steps) => format!("{steps:0width$X}", width = PAYLOAD_DIGITS),
        }
    }
}

pub fn encode(address: Address, instruction: Instruction, payload: Payload) -> Vec<u8> {
    format!("{}{}{}", address, instruction.as_str(), payload.render()).into_bytes()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Position,
    Status,
}

impl Tag {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PO" => Some(Tag::Position),
            "GS" => Some(Tag::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Position => "PO",
            Tag::Status => "GS",
        }
    }
}

/// Status codes reported by the device in a `GS` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Ready,
    CommunicationTimeout,
    MechanicalTimeout,
    CommandError,
    ValueOutOfRange,
    ModuleIsolated,
    ModuleOutOfIsolation,
    InitializingError,
    ThermalError,
    Busy,
    SensorError,
    MotorError,
    OutOfRange,
    OverCurrent,
}

const STATUS_TABLE: [(&str, DeviceStatus); 14] = [
    ("00", DeviceStatus::Ready),
    ("01", DeviceStatus::CommunicationTimeout),
    ("02", DeviceStatus::MechanicalTimeout),
    ("03", DeviceStatus::CommandError),
    ("04", DeviceStatus::ValueOutOfRange),
    ("05", DeviceStatus::ModuleIsolated),
    ("06", DeviceStatus::ModuleOutOfIsolation),
    ("07", DeviceStatus::InitializingError),
    ("08", DeviceStatus::ThermalError),
    ("09", DeviceStatus::Busy),
    ("0A", DeviceStatus::SensorError),
    ("0B", DeviceStatus::MotorError),
    ("0C", DeviceStatus::OutOfRange),
    ("0D", DeviceStatus::OverCurrent),
];

impl DeviceStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        STATUS_TABLE
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, status)| *status)
    }

    pub fn code(self) -> &'static str {
        STATUS_TABLE
            .iter()
            .find(|(_, status)| *status == self)
            .map_or("??", |(code, _)| code)
    }

    pub fn message(self) -> &'static str {
        match self {
            DeviceStatus::Ready => "ready",
            DeviceStatus::CommunicationTimeout => "communication time out",
            DeviceStatus::MechanicalTimeout => "mechanical time out",
            DeviceStatus::CommandError => "command error or command not supported",
            DeviceStatus::ValueOutOfRange => "value out of range",
            DeviceStatus::ModuleIsolated => "module isolated",
            DeviceStatus::ModuleOutOfIsolation => "module out of isolation",
            DeviceStatus::InitializingError => "initializing error",
            DeviceStatus::ThermalError => "thermal error",
            DeviceStatus::Busy => "busy",
            DeviceStatus::SensorError => "sensor error",
            DeviceStatus::MotorError => "motor error",
            DeviceStatus::OutOfRange => "out of range",
            DeviceStatus::OverCurrent => "over current error",
        }
    }

    pub fn is_ready(self) -> bool {
        self == DeviceStatus::Ready
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Known(DeviceStatus),
    UnknownCode(String),
}

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Motor position in steps.
    Position(u32),
    Status(StatusOutcome),
    /// Well formed frame with a tag we do not know. Carries the tag.
    Unrecognized(String),
    /// Frame that could not be parsed at all. Carries the raw frame.
    Malformed(String),
}

pub fn decode(frame: &[u8]) -> Response {
    let raw = String::from_utf8_lossy(frame).to_string();
    if frame.len() < MIN_FRAME_LEN || !frame.is_ascii() {
        return Response::Malformed(raw);
    }

    let tag = &raw[1..MIN_FRAME_LEN];
    let data = &raw[MIN_FRAME_LEN..];

    match Tag::from_code(tag) {
        Some(Tag::Position) => match decode_position(data) {
            Some(steps) => Response::Position(steps),
            None => Response::Malformed(raw.clone()),
        },
        Some(Tag::Status) => Response::Status(match DeviceStatus::from_code(data) {
            Some(status) => StatusOutcome::Known(status),
            None => StatusOutcome::UnknownCode(data.to_string()),
        }),
        None => Response::Unrecognized(tag.to_string()),
    }
}

/// The device drops leading zeros at times, an empty field means zero.
fn decode_position(data: &str) -> Option<u32> {
    if data.is_empty() {
        return Some(0);
    }
    if data.len() > PAYLOAD_DIGITS || !data.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(data, 16).ok()
}
