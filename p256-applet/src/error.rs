//! Error types.

use crate::apdu::StatusWord;

/// Result type with the `p256-applet` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Reason attached to a [`Error::CryptographicFailure`].
///
/// The numeric codes follow the `javacard.security.CryptoException` reason
/// codes so a host can decode them from the low byte of the status word.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[repr(u8)]
pub enum CryptoReason {
    /// A value (scalar, point, signature encoding) was rejected.
    #[error("illegal value")]
    IllegalValue = 0x01,

    /// The key involved is missing or does not decode as a valid key.
    #[error("uninitialized key")]
    UninitializedKey = 0x02,

    /// The requested algorithm is unavailable on this provider.
    #[error("no such algorithm")]
    NoSuchAlgorithm = 0x03,

    /// The primitive was initialized inconsistently.
    #[error("invalid init")]
    InvalidInit = 0x04,

    /// The primitive was used in a way it does not support.
    #[error("illegal use")]
    IllegalUse = 0x05,

    /// The entropy source failed to produce random bytes.
    #[error("random number generator failure")]
    RandomFailure = 0x06,
}

impl CryptoReason {
    /// Reason code as reported in `SW2`.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Errors raised while processing a command.
///
/// Every variant aborts the current command; none of them leaves the key
/// store modified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The instruction byte does not name a supported command.
    #[error("instruction {0:#04x} is not supported")]
    UnsupportedInstruction(u8),

    /// `P1` of a parameter export is outside the known selectors.
    #[error("parameter selector {0:#04x} is out of range")]
    InvalidParameterSelector(u8),

    /// The command data does not have the length the instruction requires.
    #[error("expected {expected} bytes of command data, got {actual}")]
    WrongDataLength {
        /// Number of bytes the command requires.
        expected: usize,
        /// Number of bytes actually received.
        actual: usize,
    },

    /// A lower-level cryptographic primitive failed.
    #[error("cryptographic failure: {0}")]
    CryptographicFailure(#[from] CryptoReason),

    /// A command arrived before the applet was selected.
    #[error("applet is not selected")]
    NotSelected,
}

impl Error {
    /// ISO 7816 status word reported to the host for this error.
    pub const fn status_word(&self) -> StatusWord {
        match self {
            Self::UnsupportedInstruction(_) => StatusWord::INS_NOT_SUPPORTED,
            Self::InvalidParameterSelector(_) => StatusWord::INCORRECT_P1P2,
            Self::WrongDataLength { .. } => StatusWord::WRONG_DATA_LENGTH,
            Self::CryptographicFailure(reason) => StatusWord::crypto_failure(*reason),
            Self::NotSelected => StatusWord::CONDITIONS_NOT_SATISFIED,
        }
    }
}
