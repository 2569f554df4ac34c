//! Command/response APDU codec.
//!
//! Only short APDUs are understood (`Lc`/`Le` of at most one byte), which is
//! all the applet's commands ever need: the largest request is a verify
//! carrying a message and a DER signature in at most 255 bytes.

use crate::{CryptoReason, Error, Result};
use alloc::vec::Vec;
use core::fmt;

/// Length of the `CLA INS P1 P2` header.
const HEADER_LEN: usize = 4;

/// ISO 7816 status word (`SW1 SW2`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StatusWord(pub u16);

impl StatusWord {
    /// `90 00`: command completed.
    pub const SUCCESS: Self = Self(0x9000);

    /// `67 20`: wrong command data length, e.g. a sign request that is not
    /// exactly one digest long.
    pub const WRONG_DATA_LENGTH: Self = Self(0x6720);

    /// `69 85`: conditions of use not satisfied.
    pub const CONDITIONS_NOT_SATISFIED: Self = Self(0x6985);

    /// `6B 00`: incorrect parameters `P1`/`P2`.
    pub const INCORRECT_P1P2: Self = Self(0x6B00);

    /// `6D 00`: instruction not supported.
    pub const INS_NOT_SUPPORTED: Self = Self(0x6D00);

    /// `6F xx`: cryptographic failure, `SW2` carries the reason code.
    pub const fn crypto_failure(reason: CryptoReason) -> Self {
        Self(0x6F00 | reason.code() as u16)
    }

    /// First status byte.
    pub const fn sw1(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Second status byte.
    pub const fn sw2(self) -> u8 {
        self.0 as u8
    }

    /// Did the command succeed?
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Big endian encoding as sent on the wire.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Decode the trailing `SW1 SW2` of a response APDU.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1(), self.sw2())
    }
}

/// Instructions understood by the applet once it is selected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    /// Fixed greeting.
    Hello = 0x40,
    /// Sign a precomputed SHA-256 digest.
    Sign = 0xEA,
    /// Verify a signature over a message.
    Verify = 0xEB,
    /// Export a key or domain parameter.
    GetParameter = 0xEC,
    /// Replace the keypair with a freshly generated one.
    GenerateKey = 0xED,
}

impl TryFrom<u8> for Instruction {
    type Error = Error;

    fn try_from(ins: u8) -> Result<Self> {
        match ins {
            0x40 => Ok(Self::Hello),
            0xEA => Ok(Self::Sign),
            0xEB => Ok(Self::Verify),
            0xEC => Ok(Self::GetParameter),
            0xED => Ok(Self::GenerateKey),
            other => Err(Error::UnsupportedInstruction(other)),
        }
    }
}

/// Command APDU borrowed from the transport buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Command<'a> {
    /// Class byte.
    pub cla: u8,
    /// Instruction byte.
    pub ins: u8,
    /// First parameter byte.
    pub p1: u8,
    /// Second parameter byte.
    pub p2: u8,
    /// Command data (`Lc` bytes).
    pub data: &'a [u8],
}

impl<'a> Command<'a> {
    /// ISO 7816-4 `SELECT` instruction.
    pub const INS_SELECT: u8 = 0xA4;

    /// `SELECT` `P1` for selection by DF name (AID).
    pub const P1_SELECT_BY_NAME: u8 = 0x04;

    /// Build a command with class byte `00`.
    pub const fn new(ins: u8, p1: u8, p2: u8, data: &'a [u8]) -> Self {
        Self {
            cla: 0x00,
            ins,
            p1,
            p2,
            data,
        }
    }

    /// Decode a short command APDU.
    ///
    /// Accepts the four ISO 7816-3 cases:
    ///
    /// ```text
    /// case 1: CLA INS P1 P2
    /// case 2: CLA INS P1 P2 Le
    /// case 3: CLA INS P1 P2 Lc data
    /// case 4: CLA INS P1 P2 Lc data Le
    /// ```
    ///
    /// `Le` is accepted but ignored: responses are always sent in full.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (header, body) = match bytes.split_first_chunk::<HEADER_LEN>() {
            Some(split) => split,
            None => {
                return Err(Error::WrongDataLength {
                    expected: HEADER_LEN,
                    actual: bytes.len(),
                });
            }
        };
        let [cla, ins, p1, p2] = *header;

        let data = match body {
            [] | [_] => &[][..],
            [lc, rest @ ..] => {
                let lc = usize::from(*lc);

                if rest.len() != lc && rest.len() != lc + 1 {
                    return Err(Error::WrongDataLength {
                        expected: lc,
                        actual: rest.len(),
                    });
                }

                &rest[..lc]
            }
        };

        Ok(Self {
            cla,
            ins,
            p1,
            p2,
            data,
        })
    }

    /// Is this an interindustry `SELECT` by name?
    ///
    /// Proprietary classes (`CLA` other than `00`) are ordinary commands.
    pub fn is_select_by_name(&self) -> bool {
        self.cla == 0x00 && self.ins == Self::INS_SELECT && self.p1 == Self::P1_SELECT_BY_NAME
    }

    /// Is this a `SELECT` by AID for `aid`?
    pub fn is_select_of(&self, aid: &[u8]) -> bool {
        self.is_select_by_name() && self.data == aid
    }
}

/// Response APDU.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    /// Response data.
    pub data: Vec<u8>,
    /// Completion status.
    pub status: StatusWord,
}

impl Response {
    /// Successful response carrying `data`.
    pub fn success(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            status: StatusWord::SUCCESS,
        }
    }

    /// Serialize as `data ‖ SW1 SW2`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() + 2);
        bytes.extend_from_slice(&self.data);
        bytes.extend_from_slice(&self.status.to_bytes());
        bytes
    }
}

impl From<Error> for Response {
    fn from(err: Error) -> Self {
        Self {
            data: Vec::new(),
            status: err.status_word(),
        }
    }
}

impl From<Result<Vec<u8>>> for Response {
    fn from(result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn parse_case_1() {
        let cmd = Command::parse(&[0x00, 0x40, 0x00, 0x00]).unwrap();
        assert_eq!(cmd, Command::new(0x40, 0, 0, &[]));
    }

    #[test]
    fn parse_case_2() {
        let cmd = Command::parse(&[0x00, 0xEC, 0x01, 0x00, 0x40]).unwrap();
        assert_eq!(cmd, Command::new(0xEC, 0x01, 0, &[]));
    }

    #[test]
    fn parse_case_3_and_4() {
        let case3 = Command::parse(&[0x00, 0xEB, 0x02, 0x01, 0x03, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(case3.p1, 0x02);
        assert_eq!(case3.p2, 0x01);
        assert_eq!(case3.data, &[0xAA, 0xBB, 0xCC]);

        let case4 = Command::parse(&[0x80, 0xEA, 0x00, 0x00, 0x02, 0x01, 0x02, 0x00]).unwrap();
        assert_eq!(case4.cla, 0x80);
        assert_eq!(case4.data, &[0x01, 0x02]);
    }

    #[test]
    fn parse_rejects_short_header() {
        assert_eq!(
            Command::parse(&[0x00, 0x40]),
            Err(Error::WrongDataLength {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn parse_rejects_inconsistent_lc() {
        assert_eq!(
            Command::parse(&[0x00, 0xEA, 0x00, 0x00, 0x05, 0x01, 0x02]),
            Err(Error::WrongDataLength {
                expected: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn instruction_decoding() {
        assert_eq!(Instruction::try_from(0xEA), Ok(Instruction::Sign));
        assert_eq!(
            Instruction::try_from(0xFF),
            Err(Error::UnsupportedInstruction(0xFF))
        );
    }

    #[test]
    fn response_encoding() {
        assert_eq!(Response::success(vec![0x01]).to_bytes(), [0x01, 0x90, 0x00]);
        assert_eq!(
            Response::from(Error::UnsupportedInstruction(0xFF)).to_bytes(),
            [0x6D, 0x00]
        );
    }

    #[test]
    fn select_detection() {
        let aid = [0xA0, 0x00, 0x01];
        let apdu = [0x00, 0xA4, 0x04, 0x00, 0x03, 0xA0, 0x00, 0x01];
        assert!(Command::parse(&apdu).unwrap().is_select_of(&aid));
        assert!(!Command::new(0xA4, 0x00, 0x00, &aid).is_select_of(&aid));

        let apdu = [0x80, 0xA4, 0x04, 0x00, 0x03, 0xA0, 0x00, 0x01];
        let proprietary = Command::parse(&apdu).unwrap();
        assert!(!proprietary.is_select_by_name());
        assert!(!proprietary.is_select_of(&aid));
    }

    #[test]
    fn status_word_bytes() {
        let sw = StatusWord::from_bytes([0x6F, 0x05]);
        assert_eq!(sw, StatusWord::crypto_failure(CryptoReason::IllegalUse));
        assert_eq!((sw.sw1(), sw.sw2()), (0x6F, 0x05));
        assert!(!sw.is_success());
        assert!(StatusWord::from_bytes([0x90, 0x00]).is_success());
        assert_eq!(sw.to_bytes(), [0x6F, 0x05]);
    }
}
