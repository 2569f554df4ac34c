//! NIST P-256 domain parameters and the known-answer default keypair.
//!
//! All values are big endian. Points are SEC1 uncompressed: `04 ‖ X ‖ Y`.

use hex_literal::hex;

/// Size of a serialized field element or scalar.
pub const FIELD_SIZE: usize = 32;

/// Size of an uncompressed SEC1 point including its tag byte.
pub const POINT_SIZE: usize = 1 + 2 * FIELD_SIZE;

/// SEC1 tag of an uncompressed point.
pub const UNCOMPRESSED_TAG: u8 = 0x04;

/// Serialized field element or scalar.
pub type FieldBytes = [u8; FIELD_SIZE];

/// Serialized uncompressed curve point.
pub type PointBytes = [u8; POINT_SIZE];

/// Elliptic curve domain parameters in the form the card key objects hold
/// them: each field is the exact byte string handed to the key builder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DomainParameters {
    /// Prime `p` of the base field.
    pub field: FieldBytes,
    /// Coefficient `a`, as a field element (`p - 3`).
    pub a: FieldBytes,
    /// Coefficient `b`.
    pub b: FieldBytes,
    /// Base point `G`, uncompressed.
    pub g: PointBytes,
    /// Order `r` of `G`.
    pub r: FieldBytes,
}

/// NIST P-256 as specified in SP 800-186.
///
/// ```text
/// p = FFFFFFFF 00000001 00000000 00000000 00000000 FFFFFFFF FFFFFFFF FFFFFFFF
/// r = FFFFFFFF 00000000 FFFFFFFF FFFFFFFF BCE6FAAD A7179E84 F3B9CAC2 FC632551
/// ```
pub static P256: DomainParameters = DomainParameters {
    field: hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    a: hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
    b: hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    g: hex!(
        "04 6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296
            4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
    ),
    r: hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
};

/// Private scalar loaded at install time.
///
/// Together with [`DEFAULT_PUBLIC_POINT`] this is a fixed test vector that
/// lets hosts check sign/verify interoperability before any key generation.
pub const DEFAULT_PRIVATE_SCALAR: FieldBytes =
    hex!("65427b12cf91f31e4ff7555168f70ffe07bd723f94677a2a526b9fedb6bc13a6");

/// `DEFAULT_PRIVATE_SCALAR · G`.
pub const DEFAULT_PUBLIC_POINT: PointBytes = hex!(
    "04 729f6f01072e3418bed3ccdf1db0ed8b76ad38b29acece53928de4f3f8ec7600
        c39ae0f5716c299cfe21b238af65e901f73a3dd1a0a66e2f1799ae0ebc22a62b"
);
