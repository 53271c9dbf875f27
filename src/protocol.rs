//! Line protocol spoken with the joystick/LED/buzzer microcontroller.
//!
//! Both directions carry a CSV payload followed by `!` and the decimal
//! CRC-8 of the payload:
//! ```text
//! inbound:  <jstkX>,<jstkY>,<jstkZ>!<crc8>
//! outbound: <subject>=<action>[,<subject>=<action>]!<crc8>\n
//! ```
//! Inbound lines without a `!` are accepted unverified for older firmware
//! that never appended a checksum.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{JOYSTICK_CENTRE, JOYSTICK_MAX};
use crate::crc8;
use crate::error::{FrameError, FrameResult};

/// Separates payload and checksum.
pub const DELIMITER: char = '!';

/// One decoded joystick sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorFrame {
    /// 0..=1023, 512 centred
    pub joystick_x: u16,
    /// 0..=1023, 512 centred
    pub joystick_y: u16,
    /// Joystick push button: 0 pressed, 1 released
    pub button: u8,
}

impl Default for SensorFrame {
    fn default() -> Self {
        Self {
            joystick_x: JOYSTICK_CENTRE,
            joystick_y: JOYSTICK_CENTRE,
            button: 1,
        }
    }
}

impl SensorFrame {
    pub fn button_pressed(&self) -> bool {
        self.button == 0
    }
}

/// How much an accepted frame can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trust {
    /// Checksum present and correct
    Verified,
    /// Legacy line without a checksum; nothing was verified
    Unverified,
}

/// Result of decoding one inbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub frame: SensorFrame,
    pub trust: Trust,
}

/// Decode one inbound line. Trailing CR/LF is ignored.
pub fn decode_line(line: &[u8]) -> FrameResult<Decoded> {
    let text = std::str::from_utf8(line)?.trim_end_matches(['\r', '\n']);

    let (payload, trust) = match text.split_once(DELIMITER) {
        Some((payload, digits)) => {
            verify_checksum(payload, digits)?;
            (payload, Trust::Verified)
        }
        None => (text, Trust::Unverified),
    };

    Ok(Decoded {
        frame: parse_payload(payload)?,
        trust,
    })
}

fn verify_checksum(payload: &str, digits: &str) -> FrameResult<()> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::BadChecksumDigits {
            digits: digits.to_string(),
        });
    }

    let computed = crc8::compute(payload.as_bytes());
    // Too many digits to fit can never match an 8-bit checksum.
    let matches = digits
        .parse::<u32>()
        .is_ok_and(|claimed| claimed == u32::from(computed));

    if matches {
        Ok(())
    } else {
        Err(FrameError::ChecksumMismatch {
            claimed: digits.to_string(),
            computed,
        })
    }
}

fn parse_payload(payload: &str) -> FrameResult<SensorFrame> {
    let fields: Vec<&str> = payload.split(',').collect();
    let &[x, y, z] = fields.as_slice() else {
        return Err(FrameError::FieldCount {
            got: fields.len(),
            payload: payload.to_string(),
        });
    };

    let button = parse_field("button", z, 1)?;
    Ok(SensorFrame {
        joystick_x: parse_field("joystick x", x, JOYSTICK_MAX)?,
        joystick_y: parse_field("joystick y", y, JOYSTICK_MAX)?,
        button: button as u8,
    })
}

fn parse_field(field: &'static str, raw: &str, max: u16) -> FrameResult<u16> {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|value| *value <= max)
        .ok_or_else(|| FrameError::BadField {
            field,
            value: raw.to_string(),
        })
}

/// Holds the last accepted sensor frame.
///
/// Rejected lines leave the held frame untouched.
#[derive(Debug, Clone, Default)]
pub struct SensorLink {
    current: SensorFrame,
    accepted: u64,
    unverified: u64,
    rejected: u64,
}

impl SensorLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `line` and, if valid, make it the current frame
    pub fn ingest(&mut self, line: &[u8]) -> FrameResult<Trust> {
        match decode_line(line) {
            Ok(decoded) => {
                self.current = decoded.frame;
                self.accepted += 1;
                if decoded.trust == Trust::Unverified {
                    self.unverified += 1;
                    log::trace!("Accepted unchecked sensor line: {:?}", decoded.frame);
                }
                Ok(decoded.trust)
            }
            Err(e) => {
                self.rejected += 1;
                Err(e)
            }
        }
    }

    /// Last-known frame (centred joystick, button released before any input)
    pub fn current(&self) -> SensorFrame {
        self.current
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn unverified(&self) -> u64 {
        self.unverified
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

/// Buzzer tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    /// Zone change / game over
    Low,
    /// Wall bounce
    High,
}

impl Tone {
    pub fn letter(&self) -> char {
        match self {
            Tone::Low => 'L',
            Tone::High => 'H',
        }
    }
}

/// A single subject/action instruction for the microcontroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Binary LED display showing a zone id (0 = no zone / game over)
    Leds(u8),
    /// Buzzer tone; a zero duration is silent
    Beep { tone: Tone, duration_ms: u32 },
}

impl Command {
    pub fn subject(&self) -> &'static str {
        match self {
            Command::Leds(_) => "LEDs",
            Command::Beep { .. } => "Beep",
        }
    }

    pub fn action(&self) -> String {
        match self {
            Command::Leds(zone) => zone.to_string(),
            Command::Beep { tone, duration_ms } => format!("{}{duration_ms}", tone.letter()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.subject(), self.action())
    }
}

/// Ordered list of commands sent as one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCommand {
    commands: Vec<Command>,
}

impl OutboundCommand {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// `subject=action` pairs joined with commas, no checksum
    pub fn payload(&self) -> String {
        let pairs: Vec<String> = self.commands.iter().map(Command::to_string).collect();
        pairs.join(",")
    }

    /// Complete wire line: payload, `!`, decimal CRC-8, newline
    pub fn encode(&self) -> String {
        encode_payload(&self.payload())
    }
}

/// Append the delimiter, checksum and line terminator to `payload`.
pub fn encode_payload(payload: &str) -> String {
    let crc = crc8::compute(payload.as_bytes());
    format!("{payload}{DELIMITER}{crc}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_crc(payload: &str) -> Vec<u8> {
        format!("{payload}!{}", crc8::compute(payload.as_bytes())).into_bytes()
    }

    #[test]
    fn decodes_checked_line() {
        let decoded = decode_line(&with_crc("512,512,1")).unwrap();
        assert_eq!(decoded.trust, Trust::Verified);
        assert_eq!(decoded.frame, SensorFrame { joystick_x: 512, joystick_y: 512, button: 1 });
    }

    #[test]
    fn strips_line_terminator() {
        let mut line = with_crc("100,900,0");
        line.extend_from_slice(b"\r\n");
        let decoded = decode_line(&line).unwrap();
        assert_eq!(decoded.frame, SensorFrame { joystick_x: 100, joystick_y: 900, button: 0 });
    }

    #[test]
    fn legacy_line_is_unverified() {
        let decoded = decode_line(b"0,1023,0").unwrap();
        assert_eq!(decoded.trust, Trust::Unverified);
        assert_eq!(decoded.frame.joystick_y, 1023);
        assert!(decoded.frame.button_pressed());
    }

    #[test]
    fn corrupted_checksum_keeps_previous_frame() {
        let mut link = SensorLink::new();
        link.ingest(&with_crc("300,700,1")).unwrap();
        let held = link.current();

        let crc = crc8::compute(b"512,512,1");
        let bad = format!("512,512,1!{}", crc.wrapping_add(1));
        let err = link.ingest(bad.as_bytes()).unwrap_err();

        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
        assert_eq!(link.current(), held);
        assert_eq!(link.rejected(), 1);
        assert_eq!(link.accepted(), 1);
    }

    #[test]
    fn non_numeric_checksum_rejected() {
        assert!(matches!(
            decode_line(b"512,512,1!abc"),
            Err(FrameError::BadChecksumDigits { .. })
        ));
        assert!(matches!(
            decode_line(b"512,512,1!"),
            Err(FrameError::BadChecksumDigits { .. })
        ));
        assert!(matches!(
            decode_line(b"512,512,1!-5"),
            Err(FrameError::BadChecksumDigits { .. })
        ));
    }

    #[test]
    fn oversized_checksum_is_mismatch() {
        assert!(matches!(
            decode_line(b"512,512,1!99999999999999"),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn malformed_payload_after_good_checksum() {
        let mut link = SensorLink::new();
        assert!(matches!(
            link.ingest(&with_crc("512,512")),
            Err(FrameError::FieldCount { got: 2, .. })
        ));
        assert!(matches!(
            link.ingest(&with_crc("512,abc,1")),
            Err(FrameError::BadField { field: "joystick y", .. })
        ));
        assert!(matches!(
            link.ingest(&with_crc("2000,512,1")),
            Err(FrameError::BadField { field: "joystick x", .. })
        ));
        assert!(matches!(
            link.ingest(&with_crc("512,512,7")),
            Err(FrameError::BadField { field: "button", .. })
        ));
        assert_eq!(link.current(), SensorFrame::default());
        assert_eq!(link.rejected(), 4);
    }

    #[test]
    fn second_delimiter_is_rejected() {
        assert!(decode_line(b"512,512,1!12!34").is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(matches!(decode_line(&[0xFF, 0xFE, b'!', b'1']), Err(FrameError::NotUtf8(_))));
    }

    #[test]
    fn unverified_lines_are_counted() {
        let mut link = SensorLink::new();
        assert_eq!(link.ingest(b"10,20,1").unwrap(), Trust::Unverified);
        assert_eq!(link.ingest(&with_crc("10,20,1")).unwrap(), Trust::Verified);
        assert_eq!(link.unverified(), 1);
        assert_eq!(link.accepted(), 2);
    }

    #[test]
    fn encodes_zone_change() {
        let cmd = OutboundCommand::new(vec![
            Command::Leds(3),
            Command::Beep { tone: Tone::Low, duration_ms: 150 },
        ]);
        assert_eq!(cmd.payload(), "LEDs=3,Beep=L150");
        let crc = crc8::compute(b"LEDs=3,Beep=L150");
        assert_eq!(cmd.encode(), format!("LEDs=3,Beep=L150!{crc}\n"));
    }

    #[test]
    fn encodes_standalone_beep() {
        let cmd = OutboundCommand::new(vec![Command::Beep { tone: Tone::High, duration_ms: 20 }]);
        let line = cmd.encode();
        let (payload, rest) = line.split_once('!').unwrap();
        assert_eq!(payload, "Beep=H20");
        assert!(rest.ends_with('\n'));
        let crc: u8 = rest.trim_end().parse().unwrap();
        assert!(crc8::validate(payload.as_bytes(), crc));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_valid_triple_decodes(x in 0u16..=1023, y in 0u16..=1023, z in 0u8..=1) {
                let payload = format!("{x},{y},{z}");
                let decoded = decode_line(&with_crc(&payload)).unwrap();
                prop_assert_eq!(decoded.trust, Trust::Verified);
                prop_assert_eq!(decoded.frame, SensorFrame { joystick_x: x, joystick_y: y, button: z });
            }

            #[test]
            fn encoded_lines_carry_valid_checksum(zone in 0u8..=7, ms in 0u32..2000) {
                let cmd = OutboundCommand::new(vec![
                    Command::Leds(zone),
                    Command::Beep { tone: Tone::Low, duration_ms: ms },
                ]);
                let line = cmd.encode();
                let (payload, crc) = line.trim_end().split_once('!').unwrap();
                prop_assert!(crc8::validate(payload.as_bytes(), crc.parse().unwrap()));
            }
        }
    }
}
