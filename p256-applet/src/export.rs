//! Key and domain parameter export.
//!
//! Scalars and field elements go out exactly as stored. Points are stored
//! uncompressed (`04 ‖ X ‖ Y`) but exported as bare `X ‖ Y`: hosts parse the
//! two halves as coordinates and never see the tag.

use crate::{keystore::KeyStore, Error, Result};

/// Value selected by `P1` of a parameter export.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Selector {
    /// Private scalar `d`.
    PrivateScalar = 0x00,
    /// Public point `Q`.
    PublicPoint = 0x01,
    /// Field prime `p`.
    Field = 0x02,
    /// Curve coefficient `a`.
    CoeffA = 0x03,
    /// Curve coefficient `b`.
    CoeffB = 0x04,
    /// Base point `G`.
    Generator = 0x05,
    /// Order `r` of `G`.
    Order = 0x06,
}

impl Selector {
    /// Is the selected value a curve point?
    pub const fn is_point(self) -> bool {
        matches!(self, Self::PublicPoint | Self::Generator)
    }
}

impl TryFrom<u8> for Selector {
    type Error = Error;

    fn try_from(p1: u8) -> Result<Self> {
        match p1 {
            0x00 => Ok(Self::PrivateScalar),
            0x01 => Ok(Self::PublicPoint),
            0x02 => Ok(Self::Field),
            0x03 => Ok(Self::CoeffA),
            0x04 => Ok(Self::CoeffB),
            0x05 => Ok(Self::Generator),
            0x06 => Ok(Self::Order),
            other => Err(Error::InvalidParameterSelector(other)),
        }
    }
}

/// Borrow the bytes to send for `selector`.
pub fn export(store: &KeyStore, selector: Selector) -> &[u8] {
    let keys = store.current();
    let domain = store.domain();

    let stored: &[u8] = match selector {
        Selector::PrivateScalar => keys.private_scalar(),
        Selector::PublicPoint => keys.public_point(),
        Selector::Field => &domain.field,
        Selector::CoeffA => &domain.a,
        Selector::CoeffB => &domain.b,
        Selector::Generator => &domain.g,
        Selector::Order => &domain.r,
    };

    if selector.is_point() {
        &stored[1..]
    } else {
        stored
    }
}
