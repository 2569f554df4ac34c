//! Cryptographic capabilities the applet depends on.
//!
//! On a card these are hardware engines (TRNG, EC accelerator, hash core).
//! [`CryptoProvider`] is the seam between them and the applet logic;
//! [`SoftwareProvider`] implements it in pure Rust on top of the `p256`
//! crate so the key store and signature engine run anywhere.

use crate::{
    params::{FieldBytes, PointBytes},
    CryptoReason,
};
use alloc::vec::Vec;
use ecdsa_core::signature::hazmat::{PrehashSigner, PrehashVerifier};
use elliptic_curve::sec1::ToEncodedPoint;
use p256::{
    ecdsa::{Signature, SigningKey, VerifyingKey},
    SecretKey,
};
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 digest.
pub type DigestBytes = [u8; DIGEST_SIZE];

/// Hardware-bound primitives over NIST P-256.
///
/// Scalars and points use the serializations from [`crate::params`];
/// signatures are ASN.1 DER `SEQUENCE { r INTEGER, s INTEGER }`.
pub trait CryptoProvider {
    /// Fill `dest` from the entropy source.
    fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), CryptoReason>;

    /// Compute `scalar · G`.
    ///
    /// Fails with [`CryptoReason::IllegalValue`] when `scalar` is zero or not
    /// below the group order.
    fn public_point(&self, scalar: &FieldBytes) -> Result<PointBytes, CryptoReason>;

    /// SHA-256 of `data`.
    fn sha256(&self, data: &[u8]) -> DigestBytes;

    /// Sign a precomputed digest with `scalar`.
    fn sign_prehash(&self, scalar: &FieldBytes, digest: &DigestBytes)
        -> Result<Vec<u8>, CryptoReason>;

    /// Check a DER signature over a precomputed digest against `point`.
    ///
    /// A signature that does not verify, whatever the reason, is `Ok(false)`.
    /// Errors are reserved for an unusable public key.
    fn verify_prehash(
        &self,
        point: &PointBytes,
        digest: &DigestBytes,
        signature: &[u8],
    ) -> Result<bool, CryptoReason>;
}

/// Pure software [`CryptoProvider`].
///
/// Signatures are deterministic ([RFC 6979]), so signing the same digest
/// with the same key always yields the same bytes.
///
/// [RFC 6979]: https://datatracker.ietf.org/doc/html/rfc6979
#[derive(Clone, Debug)]
pub struct SoftwareProvider<R> {
    rng: R,
}

impl<R: CryptoRngCore> SoftwareProvider<R> {
    /// Create a provider drawing randomness from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

#[cfg(feature = "getrandom")]
impl SoftwareProvider<rand_core::OsRng> {
    /// Create a provider backed by the operating system's RNG.
    pub fn from_os_rng() -> Self {
        Self::new(rand_core::OsRng)
    }
}

impl<R: CryptoRngCore> CryptoProvider for SoftwareProvider<R> {
    fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), CryptoReason> {
        self.rng
            .try_fill_bytes(dest)
            .map_err(|_| CryptoReason::RandomFailure)
    }

    fn public_point(&self, scalar: &FieldBytes) -> Result<PointBytes, CryptoReason> {
        let secret = SecretKey::from_bytes(p256::FieldBytes::from_slice(scalar))
            .map_err(|_| CryptoReason::IllegalValue)?;
        let encoded = secret.public_key().to_encoded_point(false);
        PointBytes::try_from(encoded.as_bytes()).map_err(|_| CryptoReason::IllegalValue)
    }

    fn sha256(&self, data: &[u8]) -> DigestBytes {
        Sha256::digest(data).into()
    }

    fn sign_prehash(
        &self,
        scalar: &FieldBytes,
        digest: &DigestBytes,
    ) -> Result<Vec<u8>, CryptoReason> {
        let key = SigningKey::from_bytes(p256::FieldBytes::from_slice(scalar))
            .map_err(|_| CryptoReason::UninitializedKey)?;
        let signature: Signature = key
            .sign_prehash(digest)
            .map_err(|_| CryptoReason::IllegalValue)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_prehash(
        &self,
        point: &PointBytes,
        digest: &DigestBytes,
        signature: &[u8],
    ) -> Result<bool, CryptoReason> {
        let key =
            VerifyingKey::from_sec1_bytes(point).map_err(|_| CryptoReason::UninitializedKey)?;

        let Ok(signature) = Signature::from_der(signature) else {
            return Ok(false);
        };

        Ok(key.verify_prehash(digest, &signature).is_ok())
    }
}

/// Provider whose entropy source and signer are broken.
#[cfg(test)]
pub(crate) struct Faulty {
    inner: SoftwareProvider<rand_chacha::ChaCha20Rng>,
}

#[cfg(test)]
impl Faulty {
    pub(crate) fn new() -> Self {
        use rand_chacha::rand_core::SeedableRng;
        Self {
            inner: SoftwareProvider::new(rand_chacha::ChaCha20Rng::seed_from_u64(0)),
        }
    }
}

#[cfg(test)]
impl CryptoProvider for Faulty {
    fn fill_random(&mut self, _dest: &mut [u8]) -> Result<(), CryptoReason> {
        Err(CryptoReason::RandomFailure)
    }

    fn public_point(&self, scalar: &FieldBytes) -> Result<PointBytes, CryptoReason> {
        self.inner.public_point(scalar)
    }

    fn sha256(&self, data: &[u8]) -> DigestBytes {
        self.inner.sha256(data)
    }

    fn sign_prehash(
        &self,
        _scalar: &FieldBytes,
        _digest: &DigestBytes,
    ) -> Result<Vec<u8>, CryptoReason> {
        Err(CryptoReason::IllegalUse)
    }

    fn verify_prehash(
        &self,
        point: &PointBytes,
        digest: &DigestBytes,
        signature: &[u8],
    ) -> Result<bool, CryptoReason> {
        self.inner.verify_prehash(point, digest, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DEFAULT_PRIVATE_SCALAR, DEFAULT_PUBLIC_POINT, P256};
    use hex_literal::hex;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    /// RFC 6979 A.2.5: NIST P-256, SHA-256, message "sample".
    const RFC6979_KEY: FieldBytes =
        hex!("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
    const RFC6979_SIGNATURE: [u8; 72] = hex!(
        "3046
         022100 efd48b2aacb6a8fd1140dd9cd45e81d69d2c877b56aaf991c34d0ea84eaf3716
         022100 f7cb1c942d657c41d436c7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8"
    );

    fn provider() -> SoftwareProvider<ChaCha20Rng> {
        SoftwareProvider::new(ChaCha20Rng::seed_from_u64(0))
    }

    #[test]
    fn default_keypair_is_consistent() {
        let point = provider().public_point(&DEFAULT_PRIVATE_SCALAR).unwrap();
        assert_eq!(point, DEFAULT_PUBLIC_POINT);
    }

    #[test]
    fn scalar_one_maps_to_generator() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(provider().public_point(&one).unwrap(), P256.g);
    }

    #[test]
    fn out_of_range_scalars_are_rejected() {
        let provider = provider();
        assert_eq!(
            provider.public_point(&[0u8; 32]),
            Err(CryptoReason::IllegalValue)
        );
        assert_eq!(provider.public_point(&P256.r), Err(CryptoReason::IllegalValue));
    }

    #[test]
    fn rfc6979_sample() {
        let provider = provider();
        let digest = provider.sha256(b"sample");
        let signature = provider.sign_prehash(&RFC6979_KEY, &digest).unwrap();
        assert_eq!(signature, RFC6979_SIGNATURE);

        let point = provider.public_point(&RFC6979_KEY).unwrap();
        assert!(provider.verify_prehash(&point, &digest, &signature).unwrap());
    }

    #[test]
    fn garbage_signature_does_not_verify() {
        let provider = provider();
        let digest = provider.sha256(b"sample");
        let verified = provider
            .verify_prehash(&DEFAULT_PUBLIC_POINT, &digest, &[0x30, 0x03, 0x02, 0x01, 0x00])
            .unwrap();
        assert!(!verified);
    }

    #[test]
    fn invalid_public_point() {
        let mut point = DEFAULT_PUBLIC_POINT;
        point[64] ^= 1;
        let digest = [0u8; 32];
        assert_eq!(
            provider().verify_prehash(&point, &digest, &RFC6979_SIGNATURE),
            Err(CryptoReason::UninitializedKey)
        );
    }

    #[test]
    fn randomness_fills_buffer() {
        let mut provider = provider();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        provider.fill_random(&mut a).unwrap();
        provider.fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
